use mid_core::Condition;
use thiserror::Error;

/// Setup-time failures. All of them are raised before the first trial is shown.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("subject data has no identifier; individual seeding needs one")]
    MissingSubjectId,
    #[error("no seed set; run seed setup before generating trials")]
    MissingSeed,
    #[error("total_blocks must be at least 1")]
    NoBlocks,
    #[error("cue type set is empty")]
    NoCueTypes,
    #[error("cue type `{0}` listed more than once")]
    DuplicateCueType(Condition),
    #[error(
        "{total_trials} trials cannot be split evenly into {total_blocks} blocks ({dropped} left over)"
    )]
    UnevenBlocks {
        total_trials: usize,
        total_blocks: usize,
        dropped: usize,
    },
    #[error("{trials_per_block} trials per block cannot balance {cue_types} cue types")]
    CannotBalance {
        trials_per_block: usize,
        cue_types: usize,
    },
    #[error("expected {expected} block seeds, found {found}")]
    BlockSeedCount { expected: usize, found: usize },
    #[error("staircase bounds are inverted: min {min_ms} ms > max {max_ms} ms")]
    StaircaseBounds { min_ms: u64, max_ms: u64 },
    #[error("invalid configuration file: {0}")]
    Parse(String),
    #[error("cannot read {path}: {message}")]
    Io { path: String, message: String },
}

impl From<toml::de::Error> for ConfigurationError {
    fn from(err: toml::de::Error) -> Self {
        ConfigurationError::Parse(err.to_string())
    }
}
