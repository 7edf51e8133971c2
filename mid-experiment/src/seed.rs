use crate::config::ExperimentSettings;
use crate::error::ConfigurationError;
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeedMode {
    /// Seed derived from the subject identifier.
    #[default]
    #[serde(alias = "indiv")]
    Individual,
    /// `fixed_seed` for every subject, for debugging and replication.
    #[serde(alias = "global")]
    Fixed,
}

impl fmt::Display for SeedMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SeedMode::Individual => "individual",
            SeedMode::Fixed => "fixed",
        })
    }
}

impl FromStr for SeedMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "individual" | "indiv" => Ok(SeedMode::Individual),
            "fixed" | "global" => Ok(SeedMode::Fixed),
            other => Err(format!("unknown seed mode `{other}`")),
        }
    }
}

/// Subject intake fields in entry order; the first non-blank one is the ID.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectData {
    pub fields: Vec<String>,
}

impl SubjectData {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            fields: vec![id.into()],
        }
    }

    pub fn from_fields(fields: Vec<String>) -> Self {
        Self { fields }
    }

    pub fn id(&self) -> Option<&str> {
        self.fields
            .iter()
            .map(|f| f.trim())
            .find(|f| !f.is_empty())
    }
}

/// Fills `seed` and `session_block_seeds` on the settings before trial generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedProvider {
    pub mode: SeedMode,
}

impl SeedProvider {
    pub fn new(mode: SeedMode) -> Self {
        Self { mode }
    }

    pub fn from_settings(settings: &ExperimentSettings) -> Self {
        Self::new(settings.seed_mode)
    }

    /// Computes the seed without touching any settings.
    pub fn derive(
        &self,
        subject: &SubjectData,
        fixed_seed: u64,
    ) -> Result<u64, ConfigurationError> {
        match self.mode {
            SeedMode::Individual => subject
                .id()
                .map(subject_seed)
                .ok_or(ConfigurationError::MissingSubjectId),
            SeedMode::Fixed => Ok(fixed_seed),
        }
    }

    /// Writes the seed and one seed per block into `settings`, returning the seed.
    ///
    /// Block seeds are derived afresh from the new seed on every call unless
    /// `block_seeds` pins them, in which case there must be one per block.
    pub fn setup(
        &self,
        settings: &mut ExperimentSettings,
        subject: &SubjectData,
    ) -> Result<u64, ConfigurationError> {
        settings.refresh_counts();
        let pinned = settings.block_seeds.len();
        if pinned > 0 && pinned != settings.total_blocks {
            return Err(ConfigurationError::BlockSeedCount {
                expected: settings.total_blocks,
                found: pinned,
            });
        }
        let seed = self.derive(subject, settings.fixed_seed)?;
        settings.seed_mode = self.mode;
        settings.seed = Some(seed);
        settings.session_block_seeds = if pinned > 0 {
            debug!("using {pinned} pinned block seeds");
            settings.block_seeds.clone()
        } else {
            derive_block_seeds(seed, settings.total_blocks)
        };
        info!(
            mode = %self.mode,
            subject = subject.id().unwrap_or("-"),
            seed,
            "seed ready"
        );
        Ok(seed)
    }
}

/// Stable across runs, platforms and toolchains: FNV-1a over the bytes,
/// then a splitmix64 finaliser so short IDs spread over the full range.
pub fn subject_seed(id: &str) -> u64 {
    mix64(fnv1a(id.trim().as_bytes()))
}

/// Per-block seeds drawn from a ChaCha stream keyed by the master seed.
pub fn derive_block_seeds(seed: u64, blocks: usize) -> Vec<u64> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..blocks).map(|_| rng.next_u64()).collect()
}

fn fnv1a(input: &[u8]) -> u64 {
    let mut hash = 0xcbf2_9ce4_8422_2325_u64;
    for byte in input {
        hash ^= u64::from(*byte);
        hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
    }
    hash
}

fn mix64(mut x: u64) -> u64 {
    x = (x ^ (x >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    x = (x ^ (x >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    x ^ (x >> 31)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fnv_matches_reference_vectors() {
        assert_eq!(fnv1a(b""), 0xcbf29ce484222325);
        assert_eq!(fnv1a(b"a"), 0xaf63dc4c8601ec8c);
    }

    #[test]
    fn subject_seed_ignores_surrounding_whitespace() {
        assert_eq!(subject_seed(" 007 "), subject_seed("007"));
    }

    #[test]
    fn id_is_first_non_blank_field() {
        let s = SubjectData::from_fields(vec!["  ".into(), "12".into(), "F".into()]);
        assert_eq!(s.id(), Some("12"));
        assert_eq!(SubjectData::default().id(), None);
    }

    #[test]
    fn modes_parse_with_aliases() {
        assert_eq!("indiv".parse::<SeedMode>(), Ok(SeedMode::Individual));
        assert_eq!("Fixed".parse::<SeedMode>(), Ok(SeedMode::Fixed));
        assert!("random".parse::<SeedMode>().is_err());
    }

    #[test]
    fn block_seeds_are_deterministic_and_distinct() {
        let a = derive_block_seeds(9, 4);
        assert_eq!(a, derive_block_seeds(9, 4));
        assert_eq!(a.len(), 4);
        let mut sorted = a.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), 4);
        assert_eq!(derive_block_seeds(9, 2), a[..2].to_vec());
    }

    #[test]
    fn setup_keeps_pinned_block_seeds() {
        let mut settings = ExperimentSettings::default();
        settings.block_seeds = vec![5, 6];
        SeedProvider::new(SeedMode::Fixed)
            .setup(&mut settings, &SubjectData::default())
            .unwrap();
        assert_eq!(settings.block_seeds, vec![5, 6]);
        assert_eq!(settings.session_block_seeds, vec![5, 6]);
        assert_eq!(settings.seed, Some(42));
    }
}
