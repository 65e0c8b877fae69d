//! Session lifecycle audit hooks.
//!
//! Records capture a stage plus structured details so callers can buffer,
//! log or assert on what a `GridSession` did without instrumenting its loop.

use std::sync::{Arc, Mutex};
use std::time::SystemTime;

use serde_json::Value;

/// Checkpoints emitted by `GridSession`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionAuditStage {
    SessionConstructed,
    ParticipantsReconciled,
    LayoutComputed,
    /// Layout skipped because no usable container size is known yet.
    LayoutPending,
    PurgeScheduled,
    PurgeApplied,
    /// A due purge found nothing left to remove.
    PurgeDiscarded,
    PresenterToggled,
    DragStarted,
    TilesReordered,
    DragEnded,
    SessionTornDown,
}

#[derive(Debug, Clone)]
pub struct SessionAuditEvent {
    pub timestamp: SystemTime,
    pub stage: SessionAuditStage,
    pub details: Vec<(String, Value)>,
}

impl SessionAuditEvent {
    fn new(stage: SessionAuditStage) -> Self {
        Self {
            timestamp: SystemTime::now(),
            stage,
            details: Vec::new(),
        }
    }

    pub fn detail(&self, key: &str) -> Option<&Value> {
        self.details
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value)
    }
}

pub struct SessionAuditEventBuilder {
    event: SessionAuditEvent,
}

impl SessionAuditEventBuilder {
    pub fn new(stage: SessionAuditStage) -> Self {
        Self {
            event: SessionAuditEvent::new(stage),
        }
    }

    pub fn detail(mut self, key: impl Into<String>, value: Value) -> Self {
        self.event.details.push((key.into(), value));
        self
    }

    pub fn finish(self) -> SessionAuditEvent {
        self.event
    }
}

pub trait SessionAudit: Send + Sync {
    fn record(&self, event: SessionAuditEvent);
}

#[derive(Debug, Default)]
pub struct NullSessionAudit;

impl SessionAudit for NullSessionAudit {
    fn record(&self, _event: SessionAuditEvent) {}
}

/// Keeps every record; clones share the buffer.
#[derive(Debug, Default, Clone)]
pub struct BufferedSessionAudit {
    events: Arc<Mutex<Vec<SessionAuditEvent>>>,
}

impl BufferedSessionAudit {
    pub fn events(&self) -> Vec<SessionAuditEvent> {
        self.events
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    pub fn stages(&self) -> Vec<SessionAuditStage> {
        self.events().into_iter().map(|event| event.stage).collect()
    }
}

impl SessionAudit for BufferedSessionAudit {
    fn record(&self, event: SessionAuditEvent) {
        if let Ok(mut guard) = self.events.lock() {
            guard.push(event);
        }
    }
}
