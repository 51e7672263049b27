//! # Leapline Common
//!
//! Common types, utilities, and shared abstractions for Leapline.
//!
//! This crate provides foundational types used across all Leapline crates:
//! - 2D math (re-exported from `glam`)
//! - Collision layer masks
//! - Common error types
//! - Prelude for convenient imports

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod error;
pub mod layers;
pub mod math;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::*;
    pub use crate::layers::*;
    pub use crate::math::*;
}

pub use prelude::*;
