//! 2D math shared by every Leapline crate.
//!
//! Vectors come from `glam`; this module only adds what the
//! gameplay code needs on top of it.

pub use glam::{vec2, Vec2};

/// Checks two vectors are within `tolerance` on each axis.
#[must_use]
pub fn approx_eq(a: Vec2, b: Vec2, tolerance: f32) -> bool {
    (a - b).abs().max_element() <= tolerance
}

