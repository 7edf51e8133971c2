use mid_core::{Condition, Stimulus, StimulusType, csv_field};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::{self, Write};

/// One entry of the generated sequence. Immutable once generated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialSpec {
    /// Position in the whole session, from 0.
    pub index: usize,
    /// Block number, from 1.
    pub block: usize,
    /// Position inside the block, from 0.
    pub trial_in_block: usize,
    pub condition: Condition,
    /// Last trial of its block.
    pub block_end: bool,
    /// Overrides the staircase target duration for this trial only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_ms: Option<u64>,
}

impl TrialSpec {
    pub fn cue(&self) -> StimulusType {
        self.condition.cue()
    }

    pub fn target(&self) -> StimulusType {
        self.condition.target()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialSequence {
    pub seed: u64,
    pub total_blocks: usize,
    pub trials_per_block: usize,
    pub trials: Vec<TrialSpec>,
}

impl TrialSequence {
    pub const CSV_HEADER: &'static str = "Index,Block,Trial,Condition,Cue,BlockEnd";

    pub fn len(&self) -> usize {
        self.trials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trials.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TrialSpec> {
        self.trials.iter()
    }

    pub fn conditions(&self) -> Vec<Condition> {
        self.trials.iter().map(|t| t.condition).collect()
    }

    /// Trials grouped by block, in block order.
    pub fn blocks(&self) -> impl Iterator<Item = &[TrialSpec]> {
        self.trials.chunks(self.trials_per_block.max(1))
    }

    /// Per-condition counts for block `block` (1-based).
    pub fn condition_counts(&self, block: usize) -> BTreeMap<Condition, usize> {
        let mut counts = BTreeMap::new();
        for t in self.trials.iter().filter(|t| t.block == block) {
            *counts.entry(t.condition).or_insert(0) += 1;
        }
        counts
    }

    pub fn write_csv<W: Write>(&self, mut out: W) -> io::Result<()> {
        writeln!(out, "{}", Self::CSV_HEADER)?;
        for t in &self.trials {
            writeln!(
                out,
                "{},{},{},{},{},{}",
                t.index,
                t.block,
                t.trial_in_block,
                t.condition,
                csv_field(t.cue().label()),
                u8::from(t.block_end)
            )?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a TrialSequence {
    type Item = &'a TrialSpec;
    type IntoIter = std::slice::Iter<'a, TrialSpec>;

    fn into_iter(self) -> Self::IntoIter {
        self.trials.iter()
    }
}
