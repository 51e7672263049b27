//! Trajectory telegraph: the predicted, obstruction-aware launch path.
//!
//! Projection composes [`sample_trajectory`] with [`truncate_into`]. Output is
//! pushed to a [`TelegraphSink`], which is whatever draws the line.

use leapline_common::{ConfigError, LayerMask, Vec2};

use crate::config::LaunchConfig;
use crate::physics::SegmentQuery;
use crate::trajectory::sample_trajectory;
use crate::truncate::truncate_into;

/// Receives telegraph output for display.
pub trait TelegraphSink {
    /// Replaces the displayed points.
    fn set_telegraph_points(&mut self, points: &[Vec2]);

    /// Shows or hides the telegraph.
    fn set_telegraph_visible(&mut self, visible: bool);
}

/// Sink that keeps the last values it was given.
///
/// Useful for hosts that poll instead of being pushed to, and for tests.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TelegraphState {
    /// Last points received
    pub points: Vec<Vec2>,
    /// Last visibility received
    pub visible: bool,
    /// Number of point updates received
    pub updates: u64,
}

impl TelegraphSink for TelegraphState {
    fn set_telegraph_points(&mut self, points: &[Vec2]) {
        self.points.clear();
        self.points.extend_from_slice(points);
        self.updates += 1;
    }

    fn set_telegraph_visible(&mut self, visible: bool) {
        self.visible = visible;
    }
}

/// Projects the telegraph for a launch from `origin` at `velocity`.
///
/// Returns the sampled path cut at the first obstruction on `mask`. Calling
/// it twice with the same inputs and collision world returns the same list.
pub fn project_telegraph<Q: SegmentQuery + ?Sized>(
    origin: Vec2,
    velocity: Vec2,
    gravity: Vec2,
    time_step: f32,
    max_time: f32,
    query: &Q,
    mask: LayerMask,
) -> Result<Vec<Vec2>, ConfigError> {
    let mut points = Vec::new();
    project_telegraph_into(
        &mut points,
        origin,
        velocity,
        gravity,
        time_step,
        max_time,
        query,
        mask,
    )?;
    Ok(points)
}

/// Buffer-reusing form of [`project_telegraph`]. `out` is overwritten.
pub fn project_telegraph_into<Q: SegmentQuery + ?Sized>(
    out: &mut Vec<Vec2>,
    origin: Vec2,
    velocity: Vec2,
    gravity: Vec2,
    time_step: f32,
    max_time: f32,
    query: &Q,
    mask: LayerMask,
) -> Result<(), ConfigError> {
    let samples = sample_trajectory(origin, velocity, gravity, time_step, max_time)?;
    out.clear();
    out.reserve(samples.len());
    truncate_into(out, samples, query, mask);
    Ok(())
}

/// Telegraph projection bound to a validated [`LaunchConfig`].
///
/// Holds the sampling parameters so per-tick calls only pass what changes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TelegraphProjector {
    gravity: Vec2,
    time_step: f32,
    max_time: f32,
    mask: LayerMask,
}

impl TelegraphProjector {
    /// Creates a projector from a configuration, validating it first.
    pub fn new(config: &LaunchConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            gravity: config.effective_gravity(),
            time_step: config.time_step,
            max_time: config.max_prediction_time,
            mask: config.collidable_mask,
        })
    }

    /// Gravity used for prediction, with gravity scale applied.
    #[must_use]
    pub fn gravity(&self) -> Vec2 {
        self.gravity
    }

    /// Layers that stop the telegraph.
    #[must_use]
    pub fn mask(&self) -> LayerMask {
        self.mask
    }

    /// Projects a fresh point list.
    #[must_use]
    pub fn project<Q: SegmentQuery + ?Sized>(
        &self,
        origin: Vec2,
        velocity: Vec2,
        query: &Q,
    ) -> Vec<Vec2> {
        let mut points = Vec::new();
        self.project_into(&mut points, origin, velocity, query);
        points
    }

    /// Projects into `out`, reusing its allocation.
    pub fn project_into<Q: SegmentQuery + ?Sized>(
        &self,
        out: &mut Vec<Vec2>,
        origin: Vec2,
        velocity: Vec2,
        query: &Q,
    ) {
        // Unreachable for a config that passed `new`.
        if let Err(error) = project_telegraph_into(
            out,
            origin,
            velocity,
            self.gravity,
            self.time_step,
            self.max_time,
            query,
            self.mask,
        ) {
            tracing::error!(%error, "telegraph projection rejected validated parameters");
            out.clear();
        }
    }
}
