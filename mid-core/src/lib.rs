pub mod condition;
pub mod phase;
pub mod stimulus;
pub mod trial;

pub use condition::{Condition, UnknownCondition};
pub use phase::{Phase, TrialPhase};
pub use stimulus::{Stimulus, StimulusType};
pub use trial::{ResultRow, TrialOutcome, csv_field};
