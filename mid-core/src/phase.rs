use serde::{Deserialize, Serialize};

/// Defines the screens a trial steps through
pub trait Phase: Copy + Clone + PartialEq + Send + Sync + std::fmt::Debug + Default {
    fn allows_input(&self) -> bool;
    fn next(&self) -> Option<Self>;

    fn shows_cue(&self) -> bool {
        false
    }
    fn shows_target(&self) -> bool {
        false
    }
}

#[derive(Copy, Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrialPhase {
    #[default]
    Fixation,
    Cue,
    Anticipation,
    Target,
    Feedback,
    Iti,
}

impl TrialPhase {
    pub const ORDER: [TrialPhase; 6] = [
        TrialPhase::Fixation,
        TrialPhase::Cue,
        TrialPhase::Anticipation,
        TrialPhase::Target,
        TrialPhase::Feedback,
        TrialPhase::Iti,
    ];
}

impl Phase for TrialPhase {
    fn allows_input(&self) -> bool {
        matches!(self, Self::Target)
    }

    fn next(&self) -> Option<Self> {
        use TrialPhase::*;
        Some(match self {
            Fixation => Cue,
            Cue => Anticipation,
            Anticipation => Target,
            Target => Feedback,
            Feedback => Iti,
            Iti => return None,
        })
    }

    fn shows_cue(&self) -> bool {
        matches!(self, TrialPhase::Cue)
    }

    fn shows_target(&self) -> bool {
        matches!(self, TrialPhase::Target)
    }
}
