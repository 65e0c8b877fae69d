use crate::logging::{LogEvent, LogFields, LogLevel};
use serde::Serialize;
use serde_json::json;
use std::time::Duration;

/// Counters accumulated by a grid session.
#[derive(Debug, Default, Clone)]
pub struct GridMetrics {
    events: u64,
    reconciliations: u64,
    layouts: u64,
    purges: u64,
    purged_tiles: u64,
    drag_moves: u64,
    reorders: u64,
    presenter_toggles: u64,
}

impl GridMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_event(&mut self) {
        self.events = self.events.saturating_add(1);
    }

    pub fn record_reconciliation(&mut self) {
        self.reconciliations = self.reconciliations.saturating_add(1);
    }

    pub fn record_layout(&mut self) {
        self.layouts = self.layouts.saturating_add(1);
    }

    pub fn record_purge(&mut self, removed: usize) {
        self.purges = self.purges.saturating_add(1);
        self.purged_tiles = self.purged_tiles.saturating_add(removed as u64);
    }

    pub fn record_drag_move(&mut self, reordered: bool) {
        self.drag_moves = self.drag_moves.saturating_add(1);
        if reordered {
            self.reorders = self.reorders.saturating_add(1);
        }
    }

    pub fn record_presenter_toggle(&mut self) {
        self.presenter_toggles = self.presenter_toggles.saturating_add(1);
    }

    pub fn snapshot(&self, uptime: Duration) -> MetricSnapshot {
        MetricSnapshot {
            uptime_ms: uptime.as_millis() as u64,
            events: self.events,
            reconciliations: self.reconciliations,
            layouts: self.layouts,
            purges: self.purges,
            purged_tiles: self.purged_tiles,
            drag_moves: self.drag_moves,
            reorders: self.reorders,
            presenter_toggles: self.presenter_toggles,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricSnapshot {
    pub uptime_ms: u64,
    pub events: u64,
    pub reconciliations: u64,
    pub layouts: u64,
    pub purges: u64,
    pub purged_tiles: u64,
    pub drag_moves: u64,
    pub reorders: u64,
    pub presenter_toggles: u64,
}

impl MetricSnapshot {
    pub fn to_log_event(&self, target: &str) -> LogEvent {
        LogEvent::with_fields(LogLevel::Info, target, "grid_metrics", self.as_fields())
    }

    pub fn as_fields(&self) -> LogFields {
        match json!(self) {
            serde_json::Value::Object(map) => map,
            _ => LogFields::new(),
        }
    }
}
