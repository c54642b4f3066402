use crate::logging::{LogEvent, LogFields, LogLevel};
use serde_json::json;

/// Running counters for registry activity.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PlacementMetrics {
    placements: u64,
    moves: u64,
    rotations: u64,
    removals: u64,
    rejections: u64,
    restored: u64,
    skipped: u64,
}

impl PlacementMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_placement(&mut self) {
        self.placements = self.placements.saturating_add(1);
    }

    pub fn record_move(&mut self) {
        self.moves = self.moves.saturating_add(1);
    }

    pub fn record_rotation(&mut self) {
        self.rotations = self.rotations.saturating_add(1);
    }

    pub fn record_removal(&mut self) {
        self.removals = self.removals.saturating_add(1);
    }

    pub fn record_rejection(&mut self) {
        self.rejections = self.rejections.saturating_add(1);
    }

    pub fn record_restore(&mut self, restored: usize, skipped: usize) {
        self.restored = self.restored.saturating_add(restored as u64);
        self.skipped = self.skipped.saturating_add(skipped as u64);
    }

    pub fn snapshot(&self, instances: usize) -> MetricSnapshot {
        MetricSnapshot {
            instances: instances as u64,
            placements: self.placements,
            moves: self.moves,
            rotations: self.rotations,
            removals: self.removals,
            rejections: self.rejections,
            restored: self.restored,
            skipped: self.skipped,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricSnapshot {
    pub instances: u64,
    pub placements: u64,
    pub moves: u64,
    pub rotations: u64,
    pub removals: u64,
    pub rejections: u64,
    pub restored: u64,
    pub skipped: u64,
}

impl MetricSnapshot {
    pub fn to_log_event(&self, target: &str) -> LogEvent {
        LogEvent::with_fields(LogLevel::Info, target, "placement_metrics", self.as_fields())
    }

    pub fn as_fields(&self) -> LogFields {
        let mut map = LogFields::new();
        map.insert("instances".to_string(), json!(self.instances));
        map.insert("placements".to_string(), json!(self.placements));
        map.insert("moves".to_string(), json!(self.moves));
        map.insert("rotations".to_string(), json!(self.rotations));
        map.insert("removals".to_string(), json!(self.removals));
        map.insert("rejections".to_string(), json!(self.rejections));
        map.insert("restored".to_string(), json!(self.restored));
        map.insert("skipped".to_string(), json!(self.skipped));
        map
    }
}
