//! Error types for Leapline.

use thiserror::Error;

/// Top-level error type for Leapline operations.
#[derive(Debug, Error)]
pub enum LeaplineError {
    /// Launch configuration rejected
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Collision collaborator errors
    #[error("Collision error: {0}")]
    Collision(#[from] CollisionError),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Launch configuration errors.
///
/// These are raised when a controller is constructed and are never
/// recovered from by clamping.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// Sampling interval must be strictly positive
    #[error("time step must be positive, got {0}")]
    NonPositiveTimeStep(f32),

    /// Aim cap cannot be negative
    #[error("max aim magnitude must not be negative, got {0}")]
    NegativeMaxAimMagnitude(f32),

    /// Retention is a fraction of the pre-launch velocity
    #[error("velocity retention must be within [0, 1], got {0}")]
    VelocityRetentionOutOfRange(f32),

    /// Prediction horizon cannot be negative
    #[error("max prediction time must not be negative, got {0}")]
    NegativePredictionTime(f32),

    /// A field holds NaN or infinity
    #[error("{field} must be finite")]
    NonFinite {
        /// Name of the offending field
        field: &'static str,
    },

    /// Horizon and step would produce an unreasonably long telegraph
    #[error("telegraph would need {samples} samples (limit {limit})")]
    TooManySamples {
        /// Samples the configuration asks for
        samples: u64,
        /// Maximum samples allowed per telegraph
        limit: u32,
    },
}

/// Errors reported by a collision collaborator.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CollisionError {
    /// Collision query failed
    #[error("collision query failed: {reason}")]
    QueryFailed {
        /// Reason for failure
        reason: String,
    },

    /// Segment endpoints were NaN or infinite
    #[error("segment endpoints are not finite")]
    NonFiniteSegment,
}

/// Result type alias for Leapline operations.
pub type LeaplineResult<T> = Result<T, LeaplineError>;
