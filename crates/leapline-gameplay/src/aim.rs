//! Pointer aim normalization.
//!
//! Turns the raw screen-space offset between the pointer and the controlled
//! object into a resolution-independent, magnitude-capped aim vector.

use leapline_common::Vec2;
use serde::{Deserialize, Serialize};

/// Viewport dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Width in pixels
    pub width: f32,
    /// Height in pixels
    pub height: f32,
}

impl Viewport {
    /// Creates a new viewport.
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Checks both dimensions are positive and finite.
    #[must_use]
    pub fn is_usable(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280.0, 720.0)
    }
}

/// Direction and strength of a launch, derived from the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AimVector {
    /// Unit direction, or zero when there is no aim
    pub direction: Vec2,
    /// Strength in `[0, max_aim_magnitude]`
    pub magnitude: f32,
}

impl AimVector {
    /// The "no aim" value.
    pub const NONE: Self = Self {
        direction: Vec2::ZERO,
        magnitude: 0.0,
    };

    /// Checks if this aim carries no launch intent.
    #[must_use]
    pub fn is_none(&self) -> bool {
        self.magnitude <= 0.0 || self.direction == Vec2::ZERO
    }

    /// The clamped offset this aim was built from.
    #[must_use]
    pub fn offset(&self) -> Vec2 {
        self.direction * self.magnitude
    }
}

/// Normalizes a raw pointer offset against the viewport and caps its length.
///
/// Each axis is divided by the matching viewport dimension, so two screens of
/// different sizes produce the same aim for equivalent pointer placements. The
/// length is then capped at `max_aim_magnitude` with the direction unchanged.
///
/// A zero offset, a zero cap, an unusable viewport, or an offset too large to
/// scale yield [`AimVector::NONE`].
#[must_use]
pub fn normalize_aim(raw_offset: Vec2, viewport: Viewport, max_aim_magnitude: f32) -> AimVector {
    if !viewport.is_usable() || !raw_offset.is_finite() {
        return AimVector::NONE;
    }

    let scaled = Vec2::new(raw_offset.x / viewport.width, raw_offset.y / viewport.height);
    let largest = scaled.abs().max_element();
    let cap = max_aim_magnitude.max(0.0);
    if !largest.is_finite() || largest <= 0.0 || cap <= 0.0 {
        return AimVector::NONE;
    }

    // Squaring huge components overflows, so normalize the unit-scaled offset.
    let unit = scaled / largest;
    AimVector {
        direction: unit.normalize(),
        magnitude: (largest * unit.length()).min(cap),
    }
}
