use crate::stimulus::{BLACK, CYAN, MAGENTA, StimulusType, YELLOW};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Incentive condition signalled by the cue shown before the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Condition {
    /// Reward cue, magenta circle.
    #[serde(rename = "win", alias = "1")]
    Win,
    /// Punishment cue, yellow square.
    #[serde(rename = "lose", alias = "2")]
    Lose,
    /// Neutral cue, cyan triangle.
    #[serde(rename = "neut", alias = "neutral", alias = "3")]
    Neutral,
}

impl Condition {
    pub const ALL: [Condition; 3] = [Condition::Win, Condition::Lose, Condition::Neutral];

    /// Numeric cue identifier (1 = circle, 2 = square, 3 = triangle).
    pub fn id(self) -> u8 {
        match self {
            Condition::Win => 1,
            Condition::Lose => 2,
            Condition::Neutral => 3,
        }
    }

    pub fn from_id(id: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.id() == id)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Condition::Win => "win",
            Condition::Lose => "lose",
            Condition::Neutral => "neut",
        }
    }

    pub fn cue(self) -> StimulusType {
        match self {
            Condition::Win => StimulusType::Circle {
                radius: 4.0,
                color: MAGENTA,
            },
            Condition::Lose => StimulusType::Square {
                width: 8.0,
                height: 8.0,
                color: YELLOW,
            },
            Condition::Neutral => StimulusType::Triangle {
                size: 8.0,
                color: CYAN,
            },
        }
    }

    /// Target shares the cue's shape but is drawn black.
    pub fn target(self) -> StimulusType {
        self.cue().with_color(BLACK)
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown cue type `{0}`")]
pub struct UnknownCondition(pub String);

impl FromStr for Condition {
    type Err = UnknownCondition;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "win" | "1" | "circle" => Ok(Condition::Win),
            "lose" | "2" | "square" => Ok(Condition::Lose),
            "neut" | "neutral" | "3" | "triangle" => Ok(Condition::Neutral),
            _ => Err(UnknownCondition(s.to_string())),
        }
    }
}
