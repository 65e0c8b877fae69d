//! Dirty tracking for frames handed across the rendering boundary.

mod core;

pub use core::FrameRegistry;
