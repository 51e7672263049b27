//! Closed-form trajectory prediction under constant acceleration.
//!
//! Positions are evaluated directly from the kinematic equation
//! `p(t) = origin + v*t + 1/2*g*t^2` at `t = i * time_step`, so sampling is
//! exact at every index and never drifts the way summed time steps do.

use std::iter::FusedIterator;

use leapline_common::{ConfigError, Vec2};

/// Upper bound on points in a single telegraph, origin included.
pub const MAX_TELEGRAPH_SAMPLES: u32 = 4096;

/// Slack, in fractions of a step, for the final sample landing on the horizon.
const HORIZON_TOLERANCE: f32 = 1e-4;

/// Position after `t` seconds of motion from `origin` at `velocity` under `gravity`.
#[must_use]
pub fn position_at(origin: Vec2, velocity: Vec2, gravity: Vec2, t: f32) -> Vec2 {
    origin + velocity * t + gravity * (0.5 * t * t)
}

/// Number of points sampled for a horizon, origin included.
///
/// Returns an error for a non-positive or non-finite step, a negative or
/// non-finite horizon, or a count above [`MAX_TELEGRAPH_SAMPLES`].
pub fn sample_count(time_step: f32, max_time: f32) -> Result<u32, ConfigError> {
    if !time_step.is_finite() {
        return Err(ConfigError::NonFinite { field: "time_step" });
    }
    if time_step <= 0.0 {
        return Err(ConfigError::NonPositiveTimeStep(time_step));
    }
    if !max_time.is_finite() {
        return Err(ConfigError::NonFinite {
            field: "max_prediction_time",
        });
    }
    if max_time < 0.0 {
        return Err(ConfigError::NegativePredictionTime(max_time));
    }

    let steps = (f64::from(max_time) / f64::from(time_step) + f64::from(HORIZON_TOLERANCE)).floor();
    let samples = (steps as u64).saturating_add(1);
    if samples > u64::from(MAX_TELEGRAPH_SAMPLES) {
        return Err(ConfigError::TooManySamples {
            samples,
            limit: MAX_TELEGRAPH_SAMPLES,
        });
    }
    Ok(samples as u32)
}

/// Lazily samples the path of a launched object.
///
/// The first point is `origin` (t = 0). Each further point is one `time_step`
/// later, up to and including the last sample at or before `max_time`.
/// The returned iterator is `Clone`; cloning it, or calling this again with
/// the same inputs, replays the identical sequence.
pub fn sample_trajectory(
    origin: Vec2,
    initial_velocity: Vec2,
    gravity: Vec2,
    time_step: f32,
    max_time: f32,
) -> Result<TrajectorySamples, ConfigError> {
    let len = sample_count(time_step, max_time)?;
    Ok(TrajectorySamples {
        origin,
        velocity: initial_velocity,
        gravity,
        time_step,
        next: 0,
        len,
    })
}

/// Iterator over predicted positions. See [`sample_trajectory`].
#[derive(Debug, Clone, PartialEq)]
pub struct TrajectorySamples {
    origin: Vec2,
    velocity: Vec2,
    gravity: Vec2,
    time_step: f32,
    next: u32,
    len: u32,
}

impl TrajectorySamples {
    /// Elapsed time of the sample the next call to `next()` yields.
    #[must_use]
    pub fn next_time(&self) -> f32 {
        self.next as f32 * self.time_step
    }

    /// Total number of samples, independent of iteration progress.
    #[must_use]
    pub fn total(&self) -> u32 {
        self.len
    }
}

impl Iterator for TrajectorySamples {
    type Item = Vec2;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.len {
            return None;
        }
        let t = self.next_time();
        self.next += 1;
        Some(position_at(self.origin, self.velocity, self.gravity, t))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.len - self.next) as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for TrajectorySamples {}

impl FusedIterator for TrajectorySamples {}
