//! Tile reconciler: keeps the tile list in step with the participant feed.
//!
//! `core` holds the pure list operations, `purge` the deferred removal queue.

mod core;
pub mod purge;

pub use core::{
    DisplayState, Participant, ParticipantId, Reconciliation, Tile, TilePhase, index_of,
    presenter_count, purge, reconcile, sort_presenters_first, toggle_presenter,
};
pub use purge::{DEFAULT_REMOVAL_DELAY, PurgeHandle, PurgeScheduler, ScheduledPurge};
