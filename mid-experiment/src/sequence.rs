use crate::config::ExperimentSettings;
use crate::error::ConfigurationError;
use crate::seed::derive_block_seeds;
use crate::trial::{TrialSequence, TrialSpec};
use mid_core::Condition;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::marker::PhantomData;
use tracing::{debug, info, warn};

/// `n` conditions with counts as equal as possible, shuffled by `rng`.
///
/// `n / k` copies of every cue type come first; the `n % k` leftover slots go
/// to the first cue types in declared order, one each, before the shuffle.
pub fn balanced_block<R: Rng + ?Sized>(
    cue_types: &[Condition],
    n: usize,
    rng: &mut R,
) -> Vec<Condition> {
    if cue_types.is_empty() {
        return Vec::new();
    }
    let per_type = n / cue_types.len();
    let remainder = n % cue_types.len();

    let mut block = Vec::with_capacity(n);
    for &cue in cue_types {
        block.extend(std::iter::repeat_n(cue, per_type));
    }
    block.extend(cue_types.iter().take(remainder).copied());
    block.shuffle(rng);
    block
}

/// Builds the session's trial order. Blocks run in sequence; trials inside a
/// block are shuffled with a generator of type `R` seeded per block.
#[derive(Debug, Clone)]
pub struct TrialSequenceGenerator<R = ChaCha8Rng> {
    _rng: PhantomData<R>,
}

impl TrialSequenceGenerator<ChaCha8Rng> {
    pub fn new() -> Self {
        Self::with_rng()
    }
}

impl Default for TrialSequenceGenerator<ChaCha8Rng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> TrialSequenceGenerator<R> {
    /// Same algorithm driven by another seedable generator.
    pub fn with_rng() -> Self {
        Self { _rng: PhantomData }
    }
}

impl<R: Rng + SeedableRng> TrialSequenceGenerator<R> {
    pub fn generate(
        &self,
        settings: &ExperimentSettings,
    ) -> Result<TrialSequence, ConfigurationError> {
        let layout = settings.validate()?;
        let seed = settings.seed.ok_or(ConfigurationError::MissingSeed)?;

        if layout.dropped > 0 {
            warn!(
                total_trials = settings.total_trials,
                total_blocks = layout.total_blocks,
                dropped = layout.dropped,
                "trials do not divide evenly into blocks; extra trials dropped"
            );
        }

        let block_seeds = if settings.has_pinned_block_seeds() {
            settings.block_seeds.clone()
        } else {
            derive_block_seeds(seed, layout.total_blocks)
        };

        let mut trials = Vec::with_capacity(layout.total());
        for (block_idx, &block_seed) in block_seeds.iter().enumerate() {
            let mut rng = R::seed_from_u64(block_seed);
            let conditions =
                balanced_block(&settings.cue_types, layout.trials_per_block, &mut rng);
            debug!(block = block_idx + 1, block_seed, ?conditions, "block shuffled");

            let last = conditions.len().saturating_sub(1);
            for (i, condition) in conditions.into_iter().enumerate() {
                trials.push(TrialSpec {
                    index: trials.len(),
                    block: block_idx + 1,
                    trial_in_block: i,
                    condition,
                    block_end: i == last,
                    target_ms: None,
                });
            }
        }

        info!(
            seed,
            blocks = layout.total_blocks,
            trials_per_block = layout.trials_per_block,
            total = trials.len(),
            "trial sequence generated"
        );

        Ok(TrialSequence {
            seed,
            total_blocks: layout.total_blocks,
            trials_per_block: layout.trials_per_block,
            trials,
        })
    }
}

/// [`TrialSequenceGenerator`] with the default ChaCha8 generator.
pub fn generate_trial_sequence(
    settings: &ExperimentSettings,
) -> Result<TrialSequence, ConfigurationError> {
    TrialSequenceGenerator::new().generate(settings)
}
