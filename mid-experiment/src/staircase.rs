use crate::config::StaircaseConfig;
use mid_core::Condition;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConditionTrack {
    pub target_ms: u64,
    pub hits: u32,
    pub total: u32,
}

impl ConditionTrack {
    pub fn hit_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.hits as f64 / self.total as f64
        }
    }
}

/// Per-condition target duration steered towards a cumulative hit rate.
#[derive(Debug, Clone)]
pub struct TargetStaircase {
    config: StaircaseConfig,
    initial_ms: u64,
    tracks: BTreeMap<Condition, ConditionTrack>,
}

impl TargetStaircase {
    pub fn new(config: StaircaseConfig, initial_ms: u64) -> Self {
        Self {
            config,
            initial_ms,
            tracks: BTreeMap::new(),
        }
    }

    pub fn target_ms(&self, condition: Condition) -> u64 {
        self.tracks
            .get(&condition)
            .map_or(self.initial_ms, |t| t.target_ms)
    }

    pub fn track(&self, condition: Condition) -> Option<&ConditionTrack> {
        self.tracks.get(&condition)
    }

    /// Records one trial and returns the duration to use next time.
    ///
    /// Above the target rate the window shrinks by one step (not below
    /// `min_ms`), below it grows by one step (not above `max_ms`).
    pub fn record(&mut self, condition: Condition, hit: bool) -> u64 {
        let cfg = &self.config;
        let track = self.tracks.entry(condition).or_insert(ConditionTrack {
            target_ms: self.initial_ms,
            hits: 0,
            total: 0,
        });
        track.total += 1;
        if hit {
            track.hits += 1;
        }
        let rate = track.hit_rate();
        if rate > cfg.target_hit_rate {
            track.target_ms = track.target_ms.saturating_sub(cfg.step_ms).max(cfg.min_ms);
        } else if rate < cfg.target_hit_rate {
            track.target_ms = track.target_ms.saturating_add(cfg.step_ms).min(cfg.max_ms);
        }
        track.target_ms
    }
}
