use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_json::json;

use crate::drag::{self, DragState, Gesture, GesturePhase};
use crate::error::Result;
use crate::geometry::{ContainerBounds, Point, TileRect};
use crate::layout::{LayoutBucket, compute_layout_logged};
use crate::logging::{FileSink, LogLevel, Logger, event_with_fields, json_kv};
use crate::metrics::GridMetrics;
use crate::registry::FrameRegistry;
use crate::render::{AvatarResolver, TileFrame, build_frames};
use crate::tiles::{
    self, DEFAULT_REMOVAL_DELAY, Participant, ParticipantId, PurgeHandle, PurgeScheduler, Tile,
    presenter_count, reconcile, toggle_presenter,
};

pub mod audit;
pub mod driver;

use audit::{NullSessionAudit, SessionAudit, SessionAuditEventBuilder, SessionAuditStage};

const LOG_TARGET: &str = "callgrid::session";

/// Configuration knobs for a grid session.
#[derive(Clone)]
pub struct GridConfig {
    /// How long exiting tiles stay on screen before they are purged.
    pub removal_delay: Duration,
    /// Optional structured logger used by the session.
    pub logger: Option<Logger>,
    /// Metrics accumulator used for periodic snapshots.
    pub metrics: Option<Arc<Mutex<GridMetrics>>>,
    /// Interval (on the session clock) between metrics snapshots. Zero disables them.
    pub metrics_interval: Duration,
    /// Target field used when emitting metrics snapshots.
    pub metrics_target: String,
    /// Lifecycle audit sink.
    pub audit: Arc<dyn SessionAudit>,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            removal_delay: DEFAULT_REMOVAL_DELAY,
            logger: None,
            metrics: None,
            metrics_interval: Duration::from_secs(5),
            metrics_target: "callgrid::session.metrics".to_string(),
            audit: Arc::new(NullSessionAudit),
        }
    }
}

impl GridConfig {
    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Log JSON lines to `path`, truncating the file once it exceeds `max_bytes`.
    pub fn with_log_file(self, path: impl AsRef<Path>, max_bytes: u64) -> Result<Self> {
        let sink = FileSink::new(path, max_bytes)?;
        Ok(self.with_logger(Logger::new(sink)))
    }

    pub fn with_audit<A>(mut self, audit: A) -> Self
    where
        A: SessionAudit + 'static,
    {
        self.audit = Arc::new(audit);
        self
    }

    pub fn with_removal_delay(mut self, delay: Duration) -> Self {
        self.removal_delay = delay;
        self
    }

    /// Enable metrics collection if it has not already been configured.
    pub fn enable_metrics(&mut self) {
        if self.metrics.is_none() {
            self.metrics = Some(Arc::new(Mutex::new(GridMetrics::new())));
        }
    }

    pub fn disable_metrics(&mut self) {
        self.metrics = None;
    }

    pub fn metrics_handle(&self) -> Option<Arc<Mutex<GridMetrics>>> {
        self.metrics.as_ref().map(Arc::clone)
    }
}

/// Inputs delivered to the session by its host.
#[derive(Debug, Clone)]
pub enum GridEvent {
    /// Fresh participant feed.
    Participants(Vec<Participant>),
    /// Container measurement. Offsets are the container's page position.
    Resize(ContainerBounds),
    /// Advance the session clock.
    Tick { elapsed: Duration },
    Gesture(Gesture),
    /// Name tag clicked: toggles presenter for that participant.
    NameTagClicked(ParticipantId),
    /// Host UI is going away; nothing scheduled may run afterwards.
    Teardown,
}

/// What changed while handling one or more events.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventOutcome {
    pub relayout: bool,
    pub reordered: bool,
    pub entered: Vec<ParticipantId>,
    pub exited: Vec<ParticipantId>,
    pub purged: Vec<ParticipantId>,
}

impl EventOutcome {
    fn merge(&mut self, other: EventOutcome) {
        self.relayout |= other.relayout;
        self.reordered |= other.reordered;
        self.entered.extend(other.entered);
        self.exited.extend(other.exited);
        self.purged.extend(other.purged);
    }
}

/// Owns the tile list and keeps it, the layout, and the drag state in step.
pub struct GridSession {
    tiles: Vec<Tile>,
    rects: Vec<TileRect>,
    bounds: Option<ContainerBounds>,
    origin: Point,
    drag: Option<DragState>,
    scheduler: PurgeScheduler,
    /// Purge responsible for each exiting tile.
    exit_handles: HashMap<ParticipantId, PurgeHandle>,
    clock: Duration,
    alive: bool,
    registry: FrameRegistry,
    config: GridConfig,
    last_metrics_emit: Duration,
}

impl GridSession {
    pub fn new(config: GridConfig) -> Self {
        let session = Self {
            tiles: Vec::new(),
            rects: Vec::new(),
            bounds: None,
            origin: Point::default(),
            drag: None,
            scheduler: PurgeScheduler::new(),
            exit_handles: HashMap::new(),
            clock: Duration::ZERO,
            alive: true,
            registry: FrameRegistry::new(),
            config,
            last_metrics_emit: Duration::ZERO,
        };
        session.audit(SessionAuditEventBuilder::new(
            SessionAuditStage::SessionConstructed,
        ));
        session
    }

    pub fn with_default() -> Self {
        Self::new(GridConfig::default())
    }

    pub fn config_mut(&mut self) -> &mut GridConfig {
        &mut self.config
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn rects(&self) -> &[TileRect] {
        &self.rects
    }

    pub fn drag(&self) -> Option<&DragState> {
        self.drag.as_ref()
    }

    pub fn bounds(&self) -> Option<ContainerBounds> {
        self.bounds
    }

    pub fn bucket(&self) -> Option<LayoutBucket> {
        self.bounds.as_ref().map(LayoutBucket::classify)
    }

    pub fn is_layout_ready(&self) -> bool {
        self.bounds.is_some()
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn clock(&self) -> Duration {
        self.clock
    }

    pub fn pending_purges(&self) -> usize {
        self.scheduler.pending()
    }

    /// Tile under a page-coordinate point, if any.
    pub fn tile_at(&self, position: Point) -> Option<&ParticipantId> {
        let cursor = Point::new(position.x - self.origin.x, position.y - self.origin.y);
        self.tiles
            .iter()
            .zip(&self.rects)
            .find(|(_, rect)| rect.contains(cursor))
            .map(|(tile, _)| &tile.key)
    }

    pub fn handle(&mut self, event: GridEvent) -> EventOutcome {
        if !self.alive {
            return EventOutcome::default();
        }

        let outcome = match event {
            GridEvent::Participants(participants) => self.apply_participants(&participants),
            GridEvent::Resize(bounds) => self.resize(bounds),
            GridEvent::Tick { elapsed } => self.advance(elapsed),
            GridEvent::Gesture(gesture) => self.handle_gesture(&gesture),
            GridEvent::NameTagClicked(key) => self.toggle_presenter(&key),
            GridEvent::Teardown => {
                self.teardown();
                EventOutcome::default()
            }
        };

        self.with_metrics(GridMetrics::record_event);
        self.maybe_emit_metrics();
        outcome
    }

    pub fn run_scripted<I>(&mut self, events: I) -> EventOutcome
    where
        I: IntoIterator<Item = GridEvent>,
    {
        let mut total = EventOutcome::default();
        for event in events {
            total.merge(self.handle(event));
        }
        total
    }

    /// Reconcile against a new participant feed and schedule removals.
    pub fn apply_participants(&mut self, participants: &[Participant]) -> EventOutcome {
        let result = reconcile(&self.tiles, participants);
        self.tiles = result.tiles;

        // Participants that came back no longer belong to any purge.
        let exited = &result.exited;
        self.exit_handles.retain(|key, _| exited.contains(key));

        let newly_exited: Vec<ParticipantId> = exited
            .iter()
            .filter(|key| !self.exit_handles.contains_key(*key))
            .cloned()
            .collect();

        if !newly_exited.is_empty() {
            let handle =
                self.scheduler
                    .schedule(self.clock, self.config.removal_delay, newly_exited.clone());
            for key in &newly_exited {
                self.exit_handles.insert(key.clone(), handle);
            }
            self.audit(
                SessionAuditEventBuilder::new(SessionAuditStage::PurgeScheduled)
                    .detail("purge_id", json!(handle.id))
                    .detail("tiles", json!(newly_exited.len())),
            );
        }

        self.with_metrics(GridMetrics::record_reconciliation);
        self.log(
            LogLevel::Debug,
            "participants_reconciled",
            [
                json_kv("tiles", json!(self.tiles.len())),
                json_kv("entered", json!(result.entered.len())),
                json_kv("exited", json!(result.exited.len())),
            ],
        );
        self.audit(
            SessionAuditEventBuilder::new(SessionAuditStage::ParticipantsReconciled)
                .detail("tiles", json!(self.tiles.len()))
                .detail("entered", json!(result.entered.len()))
                .detail("exited", json!(result.exited.len())),
        );

        self.relayout();
        EventOutcome {
            relayout: true,
            entered: result.entered,
            exited: result.exited,
            ..EventOutcome::default()
        }
    }

    /// Store a new container measurement and lay the grid out again.
    pub fn resize(&mut self, bounds: ContainerBounds) -> EventOutcome {
        match ContainerBounds::try_new(bounds.width, bounds.height) {
            Ok(measured) => {
                self.bounds = Some(measured);
                self.origin = Point::new(bounds.offset_left, bounds.offset_top);
            }
            Err(err) => {
                self.bounds = None;
                self.log(
                    LogLevel::Warn,
                    "layout_pending",
                    [json_kv("reason", json!(err.to_string()))],
                );
            }
        }

        self.log(
            LogLevel::Info,
            "resized",
            [
                json_kv("width", json!(bounds.width)),
                json_kv("height", json!(bounds.height)),
                json_kv(
                    "bucket",
                    json!(self.bucket().map(LayoutBucket::as_str)),
                ),
            ],
        );

        self.relayout();
        EventOutcome {
            relayout: true,
            ..EventOutcome::default()
        }
    }

    /// Advance the session clock and apply any purge that came due.
    pub fn advance(&mut self, elapsed: Duration) -> EventOutcome {
        self.clock = self.clock.saturating_add(elapsed);
        let mut outcome = EventOutcome::default();

        for task in self.scheduler.take_due(self.clock) {
            if !self.alive || !self.scheduler.is_current(task.handle) {
                continue;
            }

            let owned: Vec<ParticipantId> = task
                .keys
                .into_iter()
                .filter(|key| self.exit_handles.get(key) == Some(&task.handle))
                .collect();
            for key in &owned {
                self.exit_handles.remove(key);
            }

            let before = self.tiles.len();
            let remaining = tiles::purge(&self.tiles, &owned);
            let removed = before - remaining.len();

            if removed == 0 {
                self.audit(
                    SessionAuditEventBuilder::new(SessionAuditStage::PurgeDiscarded)
                        .detail("purge_id", json!(task.handle.id)),
                );
                continue;
            }

            self.tiles = remaining;
            if self
                .drag
                .as_ref()
                .is_some_and(|drag| owned.contains(&drag.dragged_key))
            {
                self.drag = None;
            }

            self.with_metrics(|metrics| metrics.record_purge(removed));
            self.audit(
                SessionAuditEventBuilder::new(SessionAuditStage::PurgeApplied)
                    .detail("purge_id", json!(task.handle.id))
                    .detail("removed", json!(removed)),
            );
            self.relayout();
            outcome.relayout = true;
            outcome.purged.extend(owned);
        }

        outcome
    }

    /// Flip the presenter flag of one tile. Unknown keys are ignored.
    pub fn toggle_presenter(&mut self, key: &ParticipantId) -> EventOutcome {
        if tiles::index_of(&self.tiles, key).is_none() {
            return EventOutcome::default();
        }

        self.tiles = toggle_presenter(&self.tiles, key);
        self.with_metrics(GridMetrics::record_presenter_toggle);
        self.audit(
            SessionAuditEventBuilder::new(SessionAuditStage::PresenterToggled)
                .detail("key", json!(key.as_str()))
                .detail("presenters", json!(presenter_count(&self.tiles))),
        );

        self.relayout();
        EventOutcome {
            relayout: true,
            ..EventOutcome::default()
        }
    }

    /// Reduce one drag gesture event.
    pub fn handle_gesture(&mut self, gesture: &Gesture) -> EventOutcome {
        if !self.is_layout_ready() && gesture.phase != GesturePhase::End {
            return EventOutcome::default();
        }

        let was_dragging = self.drag.is_some();
        let step = drag::reduce(
            self.drag.take(),
            gesture,
            &self.tiles,
            &self.rects,
            self.origin,
        );
        self.drag = step.state;

        match gesture.phase {
            GesturePhase::Start if self.drag.is_some() => {
                self.audit(
                    SessionAuditEventBuilder::new(SessionAuditStage::DragStarted)
                        .detail("key", json!(gesture.key.as_str())),
                );
            }
            GesturePhase::End if was_dragging => {
                self.audit(
                    SessionAuditEventBuilder::new(SessionAuditStage::DragEnded)
                        .detail("key", json!(gesture.key.as_str())),
                );
            }
            _ => {}
        }

        let mut outcome = EventOutcome::default();
        if gesture.phase == GesturePhase::Move && self.drag.is_some() {
            let reordered = step.reordered.is_some();
            self.with_metrics(|metrics| metrics.record_drag_move(reordered));
        }

        if let Some(tiles) = step.reordered {
            self.tiles = tiles;
            self.audit(
                SessionAuditEventBuilder::new(SessionAuditStage::TilesReordered)
                    .detail("key", json!(gesture.key.as_str())),
            );
            self.relayout();
            outcome.reordered = true;
            outcome.relayout = true;
        }

        outcome
    }

    /// Stop all scheduled work. Later events are ignored.
    pub fn teardown(&mut self) {
        if !self.alive {
            return;
        }
        self.alive = false;
        self.scheduler.cancel_all();
        self.exit_handles.clear();
        self.drag = None;
        self.log(LogLevel::Info, "session_torn_down", [json_kv("tiles", json!(self.tiles.len()))]);
        self.audit(SessionAuditEventBuilder::new(
            SessionAuditStage::SessionTornDown,
        ));
    }

    /// Frames for every tile, or nothing while the layout is pending.
    pub fn frames<R>(&self, avatars: &R) -> Vec<TileFrame<R::Avatar>>
    where
        R: AvatarResolver + ?Sized,
    {
        if !self.is_layout_ready() {
            return Vec::new();
        }
        build_frames(&self.tiles, &self.rects, self.drag.as_ref(), avatars)
    }

    /// Frames that changed since the previous call.
    pub fn take_dirty_frames<R>(&mut self, avatars: &R) -> Vec<TileFrame<R::Avatar>>
    where
        R: AvatarResolver + ?Sized,
        R::Avatar: Clone,
    {
        let frames = self.frames(avatars);
        self.registry.take_dirty(&frames)
    }

    fn relayout(&mut self) {
        let presenters = presenter_count(&self.tiles);
        match self.bounds {
            Some(bounds) => {
                self.rects = compute_layout_logged(
                    self.tiles.len(),
                    &bounds,
                    presenters,
                    self.config.logger.as_ref(),
                );
                self.with_metrics(GridMetrics::record_layout);
                self.audit(
                    SessionAuditEventBuilder::new(SessionAuditStage::LayoutComputed)
                        .detail("tiles", json!(self.tiles.len()))
                        .detail("presenters", json!(presenters)),
                );
            }
            None => {
                self.rects = vec![TileRect::default(); self.tiles.len()];
                self.audit(
                    SessionAuditEventBuilder::new(SessionAuditStage::LayoutPending)
                        .detail("tiles", json!(self.tiles.len())),
                );
            }
        }
    }

    fn audit(&self, builder: SessionAuditEventBuilder) {
        self.config.audit.record(builder.finish());
    }

    fn log<I>(&self, level: LogLevel, message: &str, fields: I)
    where
        I: IntoIterator<Item = (String, serde_json::Value)>,
    {
        if let Some(logger) = self.config.logger.as_ref() {
            let event = event_with_fields(level, LOG_TARGET, message, fields);
            let _ = logger.log_event(event);
        }
    }

    fn with_metrics(&self, update: impl FnOnce(&mut GridMetrics)) {
        if let Some(metrics) = self.config.metrics.as_ref() {
            if let Ok(mut guard) = metrics.lock() {
                update(&mut guard);
            }
        }
    }

    fn maybe_emit_metrics(&mut self) {
        if self.config.metrics_interval.is_zero() {
            return;
        }
        if self.clock.saturating_sub(self.last_metrics_emit) < self.config.metrics_interval {
            return;
        }
        self.last_metrics_emit = self.clock;

        if let (Some(logger), Some(metrics)) =
            (self.config.logger.as_ref(), self.config.metrics.as_ref())
        {
            if let Ok(guard) = metrics.lock() {
                let event = guard
                    .snapshot(self.clock)
                    .to_log_event(&self.config.metrics_target);
                let _ = logger.log_event(event);
            }
        }
    }
}
