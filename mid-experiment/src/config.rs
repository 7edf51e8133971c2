use crate::error::ConfigurationError;
use crate::seed::SeedMode;
use mid_core::{Condition, TrialPhase};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tracing::debug;

/// What to do when `total_trials` does not split evenly into blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RemainderPolicy {
    /// Floor division; the leftover trials are dropped with a warning.
    #[default]
    Truncate,
    Reject,
}

/// Phase durations in milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimingConfig {
    #[serde(default = "TimingConfig::default_fixation_ms")]
    pub fixation_ms: u64,
    #[serde(default = "TimingConfig::default_cue_ms")]
    pub cue_ms: u64,
    #[serde(default = "TimingConfig::default_anticipation_ms")]
    pub anticipation_ms: u64,
    /// Starting target duration; the staircase moves it per condition.
    #[serde(default = "TimingConfig::default_target_ms")]
    pub target_ms: u64,
    #[serde(default = "TimingConfig::default_feedback_ms")]
    pub feedback_ms: u64,
    #[serde(default = "TimingConfig::default_iti_ms")]
    pub iti_ms: u64,
    #[serde(default = "TimingConfig::default_trial_ms")]
    pub trial_ms: u64,
}

impl TimingConfig {
    fn default_fixation_ms() -> u64 {
        500
    }
    fn default_cue_ms() -> u64 {
        1000
    }
    fn default_anticipation_ms() -> u64 {
        2000
    }
    fn default_target_ms() -> u64 {
        500
    }
    fn default_feedback_ms() -> u64 {
        1500
    }
    fn default_iti_ms() -> u64 {
        1000
    }
    fn default_trial_ms() -> u64 {
        3000
    }

    /// Duration of `phase`, with the target window supplied by the caller.
    pub fn duration_of(&self, phase: TrialPhase, target_ms: u64) -> u64 {
        match phase {
            TrialPhase::Fixation => self.fixation_ms,
            TrialPhase::Cue => self.cue_ms,
            TrialPhase::Anticipation => self.anticipation_ms,
            TrialPhase::Target => target_ms,
            TrialPhase::Feedback => self.feedback_ms,
            TrialPhase::Iti => self.iti_ms,
        }
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            fixation_ms: Self::default_fixation_ms(),
            cue_ms: Self::default_cue_ms(),
            anticipation_ms: Self::default_anticipation_ms(),
            target_ms: Self::default_target_ms(),
            feedback_ms: Self::default_feedback_ms(),
            iti_ms: Self::default_iti_ms(),
            trial_ms: Self::default_trial_ms(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaircaseConfig {
    #[serde(default = "StaircaseConfig::default_step_ms")]
    pub step_ms: u64,
    #[serde(default = "StaircaseConfig::default_min_ms")]
    pub min_ms: u64,
    #[serde(default = "StaircaseConfig::default_max_ms")]
    pub max_ms: u64,
    #[serde(default = "StaircaseConfig::default_target_hit_rate")]
    pub target_hit_rate: f64,
}

impl StaircaseConfig {
    fn default_step_ms() -> u64 {
        50
    }
    fn default_min_ms() -> u64 {
        100
    }
    fn default_max_ms() -> u64 {
        1500
    }
    fn default_target_hit_rate() -> f64 {
        0.66
    }
}

impl Default for StaircaseConfig {
    fn default() -> Self {
        Self {
            step_ms: Self::default_step_ms(),
            min_ms: Self::default_min_ms(),
            max_ms: Self::default_max_ms(),
            target_hit_rate: Self::default_target_hit_rate(),
        }
    }
}

/// Window parameters handed to the presentation layer untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default = "DisplayConfig::default_size")]
    pub size: [u32; 2],
    #[serde(default = "DisplayConfig::default_monitor")]
    pub monitor: String,
    #[serde(default = "DisplayConfig::default_units")]
    pub units: String,
    #[serde(default = "DisplayConfig::default_screen")]
    pub screen: u32,
    #[serde(default = "DisplayConfig::default_background")]
    pub background: String,
    #[serde(default = "DisplayConfig::default_fullscreen")]
    pub fullscreen: bool,
}

impl DisplayConfig {
    fn default_size() -> [u32; 2] {
        [1920, 1080]
    }
    fn default_monitor() -> String {
        "testMonitor".to_string()
    }
    fn default_units() -> String {
        "deg".to_string()
    }
    fn default_screen() -> u32 {
        1
    }
    fn default_background() -> String {
        "white".to_string()
    }
    fn default_fullscreen() -> bool {
        true
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            size: Self::default_size(),
            monitor: Self::default_monitor(),
            units: Self::default_units(),
            screen: Self::default_screen(),
            background: Self::default_background(),
            fullscreen: Self::default_fullscreen(),
        }
    }
}

/// Block arithmetic after validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockLayout {
    pub total_blocks: usize,
    pub trials_per_block: usize,
    /// Trials lost to floor division under [`RemainderPolicy::Truncate`].
    pub dropped: usize,
}

impl BlockLayout {
    pub fn total(&self) -> usize {
        self.total_blocks * self.trials_per_block
    }
}

/// Everything one run needs, created once at startup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentSettings {
    #[serde(default = "ExperimentSettings::default_total_blocks")]
    pub total_blocks: usize,
    #[serde(default = "ExperimentSettings::default_total_trials")]
    pub total_trials: usize,
    /// Derived from the totals; refreshed by [`ExperimentSettings::set_counts`].
    #[serde(skip_deserializing)]
    pub trials_per_block: usize,
    #[serde(default = "ExperimentSettings::default_cue_types")]
    pub cue_types: Vec<Condition>,
    #[serde(default)]
    pub remainder_policy: RemainderPolicy,
    #[serde(default)]
    pub timing: TimingConfig,
    #[serde(default)]
    pub staircase: StaircaseConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default = "ExperimentSettings::default_response_key")]
    pub response_key: String,
    /// Keys accepted as a response; empty means only `response_key`.
    #[serde(default)]
    pub key_list: Vec<String>,
    #[serde(default)]
    pub seed_mode: SeedMode,
    #[serde(default = "ExperimentSettings::default_fixed_seed")]
    pub fixed_seed: u64,
    #[serde(default)]
    pub seed: Option<u64>,
    /// Seeds pinned for replication, one per block; empty means derive from `seed`.
    #[serde(default)]
    pub block_seeds: Vec<u64>,
    /// Seeds the last seed setup resolved for each block. Rewritten on every setup.
    #[serde(skip_deserializing)]
    pub session_block_seeds: Vec<u64>,
}

impl ExperimentSettings {
    fn default_total_blocks() -> usize {
        2
    }
    fn default_total_trials() -> usize {
        20
    }
    fn default_cue_types() -> Vec<Condition> {
        Condition::ALL.to_vec()
    }
    fn default_response_key() -> String {
        "space".to_string()
    }
    fn default_fixed_seed() -> u64 {
        42
    }

    pub fn new(total_blocks: usize, total_trials: usize) -> Self {
        let mut settings = Self::default();
        settings.set_counts(total_blocks, total_trials);
        settings
    }

    pub fn with_cue_types(mut self, cue_types: Vec<Condition>) -> Self {
        self.cue_types = cue_types;
        self
    }

    /// Sets both totals and re-derives `trials_per_block` by floor division.
    pub fn set_counts(&mut self, total_blocks: usize, total_trials: usize) {
        self.total_blocks = total_blocks;
        self.total_trials = total_trials;
        self.trials_per_block = total_trials.checked_div(total_blocks).unwrap_or(0);
    }

    /// Re-derives `trials_per_block` after the totals were assigned directly.
    pub fn refresh_counts(&mut self) {
        self.set_counts(self.total_blocks, self.total_trials);
    }

    pub fn has_pinned_block_seeds(&self) -> bool {
        !self.block_seeds.is_empty()
    }

    pub fn key_list(&self) -> Vec<String> {
        if self.key_list.is_empty() {
            vec![self.response_key.clone()]
        } else {
            self.key_list.clone()
        }
    }

    /// Checks block arithmetic, cue types and staircase bounds.
    pub fn validate(&self) -> Result<BlockLayout, ConfigurationError> {
        if self.total_blocks == 0 {
            return Err(ConfigurationError::NoBlocks);
        }
        if self.cue_types.is_empty() {
            return Err(ConfigurationError::NoCueTypes);
        }
        let mut seen = HashSet::new();
        if let Some(dup) = self.cue_types.iter().find(|c| !seen.insert(**c)) {
            return Err(ConfigurationError::DuplicateCueType(*dup));
        }

        let trials_per_block = self.total_trials / self.total_blocks;
        let dropped = self.total_trials % self.total_blocks;
        if dropped > 0 && self.remainder_policy == RemainderPolicy::Reject {
            return Err(ConfigurationError::UnevenBlocks {
                total_trials: self.total_trials,
                total_blocks: self.total_blocks,
                dropped,
            });
        }
        if trials_per_block < self.cue_types.len() {
            return Err(ConfigurationError::CannotBalance {
                trials_per_block,
                cue_types: self.cue_types.len(),
            });
        }
        if self.has_pinned_block_seeds() && self.block_seeds.len() != self.total_blocks {
            return Err(ConfigurationError::BlockSeedCount {
                expected: self.total_blocks,
                found: self.block_seeds.len(),
            });
        }
        if self.staircase.min_ms > self.staircase.max_ms {
            return Err(ConfigurationError::StaircaseBounds {
                min_ms: self.staircase.min_ms,
                max_ms: self.staircase.max_ms,
            });
        }

        Ok(BlockLayout {
            total_blocks: self.total_blocks,
            trials_per_block,
            dropped,
        })
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigurationError> {
        let mut settings: Self = toml::from_str(contents)?;
        settings.refresh_counts();
        Ok(settings)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigurationError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|err| ConfigurationError::Io {
            path: path.display().to_string(),
            message: err.to_string(),
        })?;
        Self::from_toml_str(&contents)
    }

    /// Missing file means defaults; an unreadable or malformed one is an error.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigurationError> {
        let path = path.as_ref();
        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        Self::load(path)
    }
}

impl Default for ExperimentSettings {
    fn default() -> Self {
        let total_blocks = Self::default_total_blocks();
        let total_trials = Self::default_total_trials();
        Self {
            total_blocks,
            total_trials,
            trials_per_block: total_trials / total_blocks,
            cue_types: Self::default_cue_types(),
            remainder_policy: RemainderPolicy::default(),
            timing: TimingConfig::default(),
            staircase: StaircaseConfig::default(),
            display: DisplayConfig::default(),
            response_key: Self::default_response_key(),
            key_list: Vec::new(),
            seed_mode: SeedMode::default(),
            fixed_seed: Self::default_fixed_seed(),
            seed: None,
            block_seeds: Vec::new(),
            session_block_seeds: Vec::new(),
        }
    }
}
