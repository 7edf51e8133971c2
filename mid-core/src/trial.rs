use crate::condition::Condition;
use serde::{Deserialize, Serialize};

/// What the presentation layer observed during one target window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TrialOutcome {
    pub responded: bool,
    pub reaction_ms: Option<u64>,
}

impl TrialOutcome {
    pub fn hit(reaction_ms: u64) -> Self {
        Self {
            responded: true,
            reaction_ms: Some(reaction_ms),
        }
    }

    pub fn miss() -> Self {
        Self::default()
    }
}

/// Recorded result per trial
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRow {
    pub subject_id: String,
    pub block: usize,
    pub trial: usize,
    pub condition: Condition,
    pub cue: String,
    /// Response key name on a hit, `"0"` otherwise.
    pub response: String,
    pub rt_ms: u64,
    pub points: i32,
    pub target_ms: u64,
}

impl ResultRow {
    pub const CSV_HEADER: &'static str =
        "Subject,Block,Trial,Condition,Cue,Response,RT,TrialPoints,TargetDur";

    pub fn is_hit(&self) -> bool {
        self.response != "0"
    }

    pub fn to_csv_line(&self) -> String {
        [
            csv_field(&self.subject_id),
            self.block.to_string(),
            self.trial.to_string(),
            self.condition.to_string(),
            csv_field(&self.cue),
            csv_field(&self.response),
            self.rt_ms.to_string(),
            self.points.to_string(),
            self.target_ms.to_string(),
        ]
        .join(",")
    }
}

/// Quotes a field when it carries a delimiter, quote or newline.
pub fn csv_field(raw: &str) -> String {
    if raw.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", raw.replace('"', "\"\""))
    } else {
        raw.to_string()
    }
}
