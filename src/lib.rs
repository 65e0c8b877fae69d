//! Tile layout engine for video-call grids.
//!
//! Given the participants in a call, the size of the grid container and the
//! set of pinned presenters, `callgrid` computes a pixel rect for every
//! participant tile, keeps the tile list in step with a changing participant
//! feed (with a short exit window for departing tiles), and reorders tiles
//! while the user drags them. Rendering is left to the host: the crate hands
//! out [`TileFrame`]s carrying spring targets, and [`FrameRegistry`] reports
//! which of them changed.
//!
//! [`GridSession`] ties the pieces together behind a single event entry point.

pub mod drag;
pub mod error;
pub mod geometry;
pub mod layout;
pub mod logging;
pub mod metrics;
pub mod registry;
pub mod render;
pub mod session;
pub mod tiles;

pub use drag::{DragState, DragStep, Gesture, GesturePhase};
pub use error::{GridError, Result};
pub use geometry::{ContainerBounds, Point, TileRect, round_half_up};
pub use layout::{GRID_GAP, LayoutBucket, compute_layout, compute_layout_logged, pack_sub_grid};
pub use logging::{LogEvent, LogFields, LogLevel, Logger, LoggingError, LoggingResult};
pub use metrics::{GridMetrics, MetricSnapshot};
pub use registry::FrameRegistry;
pub use render::{AvatarResolver, NoAvatars, SpringTarget, TileFrame, TileStyle};
pub use session::audit::{
    BufferedSessionAudit, NullSessionAudit, SessionAudit, SessionAuditEvent,
    SessionAuditEventBuilder, SessionAuditStage,
};
pub use session::driver::PointerDriver;
pub use session::{EventOutcome, GridConfig, GridEvent, GridSession};
pub use tiles::{
    DEFAULT_REMOVAL_DELAY, DisplayState, Participant, ParticipantId, Reconciliation, Tile,
    TilePhase,
};
