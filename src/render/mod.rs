//! Rendering boundary: frames and spring targets for an external renderer.
//!
//! Nothing here touches pixels. The host animates towards each
//! [`SpringTarget`] with its own clock.

mod core;

pub use core::{
    AnimatedField, AvatarResolver, EnterFrom, NoAvatars, SpringTarget, TileFrame, TileStyle,
    build_frames, lifted_target, resting_target,
};
