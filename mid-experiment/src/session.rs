use crate::config::ExperimentSettings;
use crate::scoring::{performance_feedback, points, trial_feedback};
use crate::seed::SubjectData;
use crate::staircase::TargetStaircase;
use crate::trial::TrialSpec;
use mid_core::{ResultRow, Stimulus, TrialOutcome, csv_field};
use mid_timing::{Clock, OutputNames, output_names};
use serde::{Deserialize, Serialize};
use std::io::{self, Write};
use tracing::{debug, info};

/// End-of-block statistics shown to the subject.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockSummary {
    pub block: usize,
    /// Mean reaction time over hits; 0 when nothing was hit.
    pub mean_rt_ms: f64,
    pub accuracy_pct: f64,
    pub points: i32,
    pub feedback: String,
}

impl BlockSummary {
    pub fn screen_text(&self) -> String {
        format!(
            "End of Block #{}\nMean RT: {:.0} ms\nAccuracy: {:.1}%\nBlock Points: {}\nPress SPACE to continue...",
            self.block, self.mean_rt_ms, self.accuracy_pct, self.points
        )
    }
}

/// What the presentation loop gets back after reporting one trial.
#[derive(Debug, Clone, PartialEq)]
pub struct TrialRecord {
    pub row: ResultRow,
    pub feedback: String,
    pub total_points: i32,
    /// Set on the last trial of a block.
    pub block_summary: Option<BlockSummary>,
}

/// Bookkeeping for one subject's run: scoring, staircase and result rows.
#[derive(Debug, Clone)]
pub struct SessionLog {
    subject: SubjectData,
    response_key: String,
    staircase: TargetStaircase,
    rows: Vec<ResultRow>,
    block_start: usize,
    total_points: i32,
    summaries: Vec<BlockSummary>,
}

impl SessionLog {
    pub fn new(settings: &ExperimentSettings, subject: SubjectData) -> Self {
        Self {
            subject,
            response_key: settings.response_key.clone(),
            staircase: TargetStaircase::new(settings.staircase.clone(), settings.timing.target_ms),
            rows: Vec::new(),
            block_start: 0,
            total_points: 0,
            summaries: Vec::new(),
        }
    }

    /// Target window for the upcoming trial.
    pub fn target_ms(&self, spec: &TrialSpec) -> u64 {
        spec.target_ms
            .unwrap_or_else(|| self.staircase.target_ms(spec.condition))
    }

    pub fn record(&mut self, spec: &TrialSpec, outcome: TrialOutcome) -> TrialRecord {
        let hit = outcome.responded;
        let target_ms = self.target_ms(spec);
        let trial_points = points(spec.condition, hit);
        self.total_points += trial_points;
        let next_target = self.staircase.record(spec.condition, hit);

        let row = ResultRow {
            subject_id: self.subject.id().unwrap_or_default().to_string(),
            block: spec.block,
            trial: spec.trial_in_block,
            condition: spec.condition,
            cue: spec.cue().label().to_string(),
            response: if hit {
                self.response_key.clone()
            } else {
                "0".to_string()
            },
            rt_ms: if hit { outcome.reaction_ms.unwrap_or(0) } else { 0 },
            points: trial_points,
            target_ms,
        };
        debug!(
            trial = spec.index + 1,
            block = spec.block,
            condition = %spec.condition,
            hit,
            rt_ms = row.rt_ms,
            points = trial_points,
            total_points = self.total_points,
            next_target_ms = next_target,
            "trial recorded"
        );
        self.rows.push(row.clone());

        let block_summary = spec.block_end.then(|| self.close_block(spec.block));
        TrialRecord {
            feedback: trial_feedback(spec.condition, hit, self.total_points),
            total_points: self.total_points,
            row,
            block_summary,
        }
    }

    fn close_block(&mut self, block: usize) -> BlockSummary {
        let rows = &self.rows[self.block_start..];
        let hit_rts: Vec<f64> = rows
            .iter()
            .filter(|r| r.is_hit())
            .map(|r| r.rt_ms as f64)
            .collect();
        let mean_rt_ms = if hit_rts.is_empty() {
            0.0
        } else {
            hit_rts.iter().sum::<f64>() / hit_rts.len() as f64
        };
        let accuracy_pct = if rows.is_empty() {
            0.0
        } else {
            hit_rts.len() as f64 / rows.len() as f64 * 100.0
        };
        let block_points: i32 = rows.iter().map(|r| r.points).sum();

        let summary = BlockSummary {
            block,
            mean_rt_ms,
            accuracy_pct,
            points: block_points,
            feedback: performance_feedback(block_points),
        };
        info!(
            block,
            mean_rt_ms,
            accuracy_pct,
            points = block_points,
            "block complete"
        );
        self.block_start = self.rows.len();
        self.summaries.push(summary.clone());
        summary
    }

    pub fn rows(&self) -> &[ResultRow] {
        &self.rows
    }

    pub fn summaries(&self) -> &[BlockSummary] {
        &self.summaries
    }

    pub fn total_points(&self) -> i32 {
        self.total_points
    }

    pub fn staircase(&self) -> &TargetStaircase {
        &self.staircase
    }

    /// Result and log file names for this subject, stamped by `clock`.
    pub fn output_names<C: Clock>(&self, clock: &C) -> OutputNames {
        output_names(self.subject.id().unwrap_or("unknown"), clock)
    }

    /// Result rows, then a blank line and the subject data.
    pub fn write_csv<W: Write>(&self, mut out: W) -> io::Result<()> {
        writeln!(out, "{}", ResultRow::CSV_HEADER)?;
        for row in &self.rows {
            writeln!(out, "{}", row.to_csv_line())?;
        }
        let subject: Vec<String> = self.subject.fields.iter().map(|f| csv_field(f)).collect();
        writeln!(out)?;
        writeln!(out, "{}", subject.join(","))
    }

    pub fn write_json<W: Write>(&self, out: W) -> serde_json::Result<()> {
        serde_json::to_writer_pretty(out, &self.rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mid_core::Condition;

    fn spec(index: usize, condition: Condition, block_end: bool) -> TrialSpec {
        TrialSpec {
            index,
            block: 1,
            trial_in_block: index,
            condition,
            block_end,
            target_ms: None,
        }
    }

    #[test]
    fn row_reflects_hit_and_staircase_start() {
        let mut log = SessionLog::new(&ExperimentSettings::default(), SubjectData::new("007"));
        let rec = log.record(&spec(0, Condition::Win, false), TrialOutcome::hit(312));
        assert_eq!(rec.row.response, "space");
        assert_eq!(rec.row.rt_ms, 312);
        assert_eq!(rec.row.points, 10);
        assert_eq!(rec.row.target_ms, 500);
        assert_eq!(rec.row.cue, "circle");
        assert_eq!(rec.total_points, 10);
        assert!(rec.block_summary.is_none());
        assert_eq!(log.target_ms(&spec(1, Condition::Win, false)), 450);
    }

    #[test]
    fn misses_record_zero_rt_even_if_reported() {
        let mut log = SessionLog::new(&ExperimentSettings::default(), SubjectData::new("1"));
        let outcome = TrialOutcome {
            responded: false,
            reaction_ms: Some(90),
        };
        let rec = log.record(&spec(0, Condition::Lose, false), outcome);
        assert_eq!(rec.row.response, "0");
        assert_eq!(rec.row.rt_ms, 0);
        assert_eq!(rec.row.points, -10);
        assert_eq!(rec.feedback, "Miss! -10 points\nTotal: -10 points");
    }

    #[test]
    fn per_trial_override_wins_over_staircase() {
        let log = SessionLog::new(&ExperimentSettings::default(), SubjectData::new("1"));
        let mut s = spec(0, Condition::Neutral, false);
        s.target_ms = Some(800);
        assert_eq!(log.target_ms(&s), 800);
    }

    #[test]
    fn block_summary_text() {
        let summary = BlockSummary {
            block: 2,
            mean_rt_ms: 301.6,
            accuracy_pct: 66.666,
            points: 20,
            feedback: performance_feedback(20),
        };
        assert_eq!(
            summary.screen_text(),
            "End of Block #2\nMean RT: 302 ms\nAccuracy: 66.7%\nBlock Points: 20\nPress SPACE to continue..."
        );
    }
}
