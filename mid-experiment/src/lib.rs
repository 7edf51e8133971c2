pub mod config;
pub mod error;
pub mod scoring;
pub mod seed;
pub mod sequence;
pub mod session;
pub mod staircase;
pub mod trial;

pub use config::{
    BlockLayout, DisplayConfig, ExperimentSettings, RemainderPolicy, StaircaseConfig,
    TimingConfig,
};
pub use error::ConfigurationError;
pub use seed::{SeedMode, SeedProvider, SubjectData, derive_block_seeds, subject_seed};
pub use sequence::{TrialSequenceGenerator, balanced_block, generate_trial_sequence};
pub use session::{BlockSummary, SessionLog, TrialRecord};
pub use staircase::{ConditionTrack, TargetStaircase};
pub use trial::{TrialSequence, TrialSpec};
