//! Layout module orchestrator.
//!
//! Callers import the geometry engine from here; the bucket tables and the
//! sub-grid packer are public for inspection and testing, the solver lives
//! in the private `core` module.

pub mod bucket;
mod core;
pub mod grid;

pub use bucket::{Arrangement, Band, GridShape, LayoutBucket};
pub use core::{
    MAX_SUPPORTED_PRESENTERS, MAX_SUPPORTED_TILES, Unsupported, compute_layout,
    compute_layout_logged, unsupported_configuration,
};
pub use grid::{GRID_GAP, pack_sub_grid};
