//! # Leapline Gameplay
//!
//! Aim-and-release launching with a ballistic trajectory telegraph.
//!
//! This crate provides:
//! - Aim normalization from a screen-space pointer offset
//! - Launch impulse with partial velocity retention
//! - Trajectory sampling and collision truncation
//! - The telegraph projector and display sink
//! - The Idle/Aiming/Launching controller
//!
//! The host supplies ground contact, input, velocity access and segment
//! queries through the traits in [`collaborators`] and [`physics`].

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod aim;
pub mod collaborators;
pub mod config;
pub mod controller;
pub mod impulse;
pub mod input;
pub mod physics;
pub mod telegraph;
pub mod trajectory;
pub mod truncate;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::aim::*;
    pub use crate::collaborators::*;
    pub use crate::config::*;
    pub use crate::controller::*;
    pub use crate::impulse::*;
    pub use crate::input::*;
    pub use crate::physics::*;
    pub use crate::telegraph::*;
    pub use crate::trajectory::*;
    pub use crate::truncate::*;
}

pub use prelude::*;
