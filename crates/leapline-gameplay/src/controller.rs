//! Launch controller: aim on the ground, launch on release.
//!
//! The controller runs once per control tick. While grounded with the button
//! held it shows the predicted path; releasing the button while still grounded
//! applies the launch impulse. Losing ground contact cancels everything.
//!
//! | State     | Condition (this tick)                 | Next      |
//! |-----------|---------------------------------------|-----------|
//! | any       | not grounded                          | Idle      |
//! | any       | grounded, held                        | Aiming    |
//! | Aiming    | grounded, released this tick          | Launching |
//! | otherwise | grounded, not held                    | Idle      |

use leapline_common::{ConfigError, Vec2};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::aim::{normalize_aim, AimVector};
use crate::collaborators::VelocityState;
use crate::config::LaunchConfig;
use crate::impulse::launch_velocity;
use crate::input::{ButtonState, TickInput};
use crate::physics::SegmentQuery;
use crate::telegraph::{TelegraphProjector, TelegraphSink};

/// Phase of the launch cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LaunchState {
    /// Not aiming
    #[default]
    Idle,
    /// Grounded with the button held; telegraph shown
    Aiming,
    /// Launch applied this tick
    Launching,
}

impl LaunchState {
    /// Check if the telegraph may be shown in this state.
    #[must_use]
    pub fn shows_telegraph(self) -> bool {
        matches!(self, LaunchState::Aiming)
    }
}

/// What one tick did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickOutcome {
    /// State after the tick
    pub state: LaunchState,
    /// Aim computed this tick, [`AimVector::NONE`] when airborne
    pub aim: AimVector,
    /// Velocity written to the body, if a launch happened
    pub launched: Option<Vec2>,
    /// Whether the telegraph is visible after the tick
    pub telegraph_visible: bool,
    /// Number of telegraph points pushed this tick
    pub telegraph_points: usize,
}

/// Per-object launch state machine.
#[derive(Debug, Clone)]
pub struct LaunchController {
    config: LaunchConfig,
    projector: TelegraphProjector,
    state: LaunchState,
    button: ButtonState,
    scratch: Vec<Vec2>,
    launches: u64,
}

impl LaunchController {
    /// Creates a controller in [`LaunchState::Idle`].
    ///
    /// # Errors
    ///
    /// Returns the first problem [`LaunchConfig::validate`] finds.
    pub fn new(config: LaunchConfig) -> Result<Self, ConfigError> {
        let projector = TelegraphProjector::new(&config)?;
        Ok(Self {
            config,
            projector,
            state: LaunchState::Idle,
            button: ButtonState::new(),
            scratch: Vec::new(),
            launches: 0,
        })
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> LaunchState {
        self.state
    }

    /// Configuration in use.
    #[must_use]
    pub fn config(&self) -> &LaunchConfig {
        &self.config
    }

    /// Launches applied since creation.
    #[must_use]
    pub fn launches(&self) -> u64 {
        self.launches
    }

    /// Last telegraph computed while aiming.
    #[must_use]
    pub fn telegraph(&self) -> &[Vec2] {
        &self.scratch
    }

    /// Returns to Idle and forgets button history.
    pub fn reset(&mut self) {
        self.set_state(LaunchState::Idle);
        self.button.reset();
        self.scratch.clear();
    }

    /// Runs one control tick.
    pub fn update<V, Q, S>(
        &mut self,
        input: &TickInput,
        body: &mut V,
        query: &Q,
        sink: &mut S,
    ) -> TickOutcome
    where
        V: VelocityState + ?Sized,
        Q: SegmentQuery + ?Sized,
        S: TelegraphSink + ?Sized,
    {
        if !input.grounded {
            // A press that started in the air, or a release after leaving the
            // ground, must not count once grounded again.
            self.button.reset();
            self.set_state(LaunchState::Idle);
            sink.set_telegraph_visible(false);
            return self.outcome(AimVector::NONE, None, false, 0);
        }

        self.button.update(input.button_held);
        let aim = normalize_aim(
            input.pointer.offset,
            input.pointer.viewport,
            self.config.max_aim_magnitude,
        );

        if self.button.pressed {
            self.set_state(LaunchState::Aiming);
            if aim.is_none() {
                sink.set_telegraph_visible(false);
                return self.outcome(aim, None, false, 0);
            }
            let velocity = self.predicted_velocity(aim, body.velocity());
            self.projector
                .project_into(&mut self.scratch, input.position, velocity, query);
            sink.set_telegraph_points(&self.scratch);
            sink.set_telegraph_visible(true);
            let count = self.scratch.len();
            return self.outcome(aim, None, true, count);
        }

        sink.set_telegraph_visible(false);

        if self.button.just_released && self.state == LaunchState::Aiming {
            self.set_state(LaunchState::Launching);
            if aim.is_none() {
                debug!("released with zero aim, no launch");
                return self.outcome(aim, None, false, 0);
            }
            let velocity = self.predicted_velocity(aim, body.velocity());
            body.set_velocity(velocity);
            self.launches += 1;
            info!(
                velocity = ?velocity,
                magnitude = aim.magnitude,
                launches = self.launches,
                "launched"
            );
            return self.outcome(aim, Some(velocity), false, 0);
        }

        self.set_state(LaunchState::Idle);
        self.outcome(aim, None, false, 0)
    }

    fn predicted_velocity(&self, aim: AimVector, current: Vec2) -> Vec2 {
        launch_velocity(
            aim,
            current,
            self.config.jump_strength,
            self.config.velocity_retention,
        )
    }

    fn set_state(&mut self, next: LaunchState) {
        if self.state != next {
            debug!(from = ?self.state, to = ?next, "launch state changed");
            self.state = next;
        }
    }

    fn outcome(
        &self,
        aim: AimVector,
        launched: Option<Vec2>,
        telegraph_visible: bool,
        telegraph_points: usize,
    ) -> TickOutcome {
        TickOutcome {
            state: self.state,
            aim,
            launched,
            telegraph_visible,
            telegraph_points,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aim::Viewport;
    use crate::input::PointerSample;
    use crate::physics::{EmptySpace, StaticGeometry, AABB};
    use crate::telegraph::TelegraphState;
    use leapline_common::{approx_eq, LayerMask};

    /// Counts velocity writes.
    #[derive(Default)]
    struct Body {
        velocity: Vec2,
        writes: u32,
    }

    impl VelocityState for Body {
        fn velocity(&self) -> Vec2 {
            self.velocity
        }

        fn set_velocity(&mut self, velocity: Vec2) {
            self.velocity = velocity;
            self.writes += 1;
        }
    }

    fn viewport() -> Viewport {
        Viewport::new(1000.0, 1000.0)
    }

    fn tick(grounded: bool, held: bool, offset: Vec2) -> TickInput {
        TickInput {
            grounded,
            button_held: held,
            pointer: PointerSample::new(offset, viewport()),
            position: Vec2::new(0.0, 1.0),
        }
    }

    fn config() -> LaunchConfig {
        LaunchConfig {
            jump_strength: 10.0,
            max_aim_magnitude: 0.5,
            velocity_retention: 0.5,
            ..LaunchConfig::default()
        }
    }

    fn controller() -> LaunchController {
        LaunchController::new(config()).expect("valid config")
    }

    #[test]
    fn test_invalid_config_rejected() {
        let bad = LaunchConfig {
            time_step: 0.0,
            ..config()
        };
        assert_eq!(
            LaunchController::new(bad).map(|_| ()),
            Err(ConfigError::NonPositiveTimeStep(0.0))
        );
    }

    #[test]
    fn test_aim_then_release_launches() {
        let mut controller = controller();
        let mut body = Body {
            velocity: Vec2::new(2.0, 0.0),
            writes: 0,
        };
        let mut sink = TelegraphState::default();
        let aim_offset = Vec2::new(300.0, 400.0);

        let first = controller.update(&tick(true, true, aim_offset), &mut body, &EmptySpace, &mut sink);
        assert_eq!(first.state, LaunchState::Aiming);
        assert!(first.telegraph_visible);
        assert!(sink.visible);
        assert_eq!(sink.points.len(), first.telegraph_points);
        assert_eq!(sink.points[0], Vec2::new(0.0, 1.0));
        assert_eq!(body.writes, 0);

        let second = controller.update(&tick(true, true, aim_offset), &mut body, &EmptySpace, &mut sink);
        assert_eq!(second.state, LaunchState::Aiming);
        assert_eq!(sink.updates, 2);

        let release = controller.update(&tick(true, false, aim_offset), &mut body, &EmptySpace, &mut sink);
        assert_eq!(release.state, LaunchState::Launching);
        assert!(!sink.visible);
        assert_eq!(body.writes, 1);

        // offset (0.3, 0.4) has magnitude 0.5: 2*0.5 + (0.6, 0.8)*5
        let expected = Vec2::new(4.0, 4.0);
        let launched = release.launched.expect("launch applied");
        assert!(approx_eq(launched, expected, 1e-5), "got {launched}");
        assert_eq!(body.velocity, launched);
        assert_eq!(controller.launches(), 1);

        let after = controller.update(&tick(false, false, aim_offset), &mut body, &EmptySpace, &mut sink);
        assert_eq!(after.state, LaunchState::Idle);
        assert_eq!(body.writes, 1);
    }

    #[test]
    fn test_launch_writes_velocity_once() {
        let mut controller = controller();
        let mut body = Body::default();
        let mut sink = TelegraphState::default();
        let offset = Vec2::new(100.0, 100.0);

        controller.update(&tick(true, true, offset), &mut body, &EmptySpace, &mut sink);
        controller.update(&tick(true, false, offset), &mut body, &EmptySpace, &mut sink);
        for _ in 0..5 {
            let outcome = controller.update(&tick(true, false, offset), &mut body, &EmptySpace, &mut sink);
            assert_eq!(outcome.state, LaunchState::Idle);
            assert!(outcome.launched.is_none());
        }
        assert_eq!(body.writes, 1);
    }

    #[test]
    fn test_losing_ground_cancels_aim() {
        let mut controller = controller();
        let mut body = Body::default();
        let mut sink = TelegraphState::default();
        let offset = Vec2::new(200.0, 300.0);

        controller.update(&tick(true, true, offset), &mut body, &EmptySpace, &mut sink);
        let airborne = controller.update(&tick(false, true, offset), &mut body, &EmptySpace, &mut sink);
        assert_eq!(airborne.state, LaunchState::Idle);
        assert!(!sink.visible);

        // Released mid-air, then lands: no launch.
        controller.update(&tick(false, false, offset), &mut body, &EmptySpace, &mut sink);
        let landed = controller.update(&tick(true, false, offset), &mut body, &EmptySpace, &mut sink);
        assert_eq!(landed.state, LaunchState::Idle);
        assert!(landed.launched.is_none());
        assert_eq!(body.writes, 0);
    }

    #[test]
    fn test_holding_through_landing_resumes_aim() {
        let mut controller = controller();
        let mut body = Body::default();
        let mut sink = TelegraphState::default();
        let offset = Vec2::new(0.0, 250.0);

        let airborne = controller.update(&tick(false, true, offset), &mut body, &EmptySpace, &mut sink);
        assert_eq!(airborne.state, LaunchState::Idle);
        assert!(airborne.aim.is_none());

        let landed = controller.update(&tick(true, true, offset), &mut body, &EmptySpace, &mut sink);
        assert_eq!(landed.state, LaunchState::Aiming);
        assert!(landed.telegraph_visible);

        let release = controller.update(&tick(true, false, offset), &mut body, &EmptySpace, &mut sink);
        assert_eq!(release.state, LaunchState::Launching);
        assert!(release.launched.is_some());
    }

    #[test]
    fn test_release_in_air_then_press_on_ground() {
        let mut controller = controller();
        let mut body = Body::default();
        let mut sink = TelegraphState::default();
        let offset = Vec2::new(100.0, 0.0);

        controller.update(&tick(true, false, offset), &mut body, &EmptySpace, &mut sink);
        controller.update(&tick(false, true, offset), &mut body, &EmptySpace, &mut sink);
        controller.update(&tick(false, false, offset), &mut body, &EmptySpace, &mut sink);
        let outcome = controller.update(&tick(true, false, offset), &mut body, &EmptySpace, &mut sink);
        assert_eq!(outcome.state, LaunchState::Idle);
        assert_eq!(body.writes, 0);
    }

    #[test]
    fn test_zero_aim_hides_telegraph_and_skips_launch() {
        let mut controller = controller();
        let mut body = Body {
            velocity: Vec2::new(3.0, 0.0),
            writes: 0,
        };
        let mut sink = TelegraphState::default();

        let aiming = controller.update(&tick(true, true, Vec2::ZERO), &mut body, &EmptySpace, &mut sink);
        assert_eq!(aiming.state, LaunchState::Aiming);
        assert!(!aiming.telegraph_visible);
        assert_eq!(sink.updates, 0);

        let release = controller.update(&tick(true, false, Vec2::ZERO), &mut body, &EmptySpace, &mut sink);
        assert_eq!(release.state, LaunchState::Launching);
        assert!(release.launched.is_none());
        assert_eq!(body.writes, 0);
        assert_eq!(body.velocity, Vec2::new(3.0, 0.0));
    }

    #[test]
    fn test_telegraph_stops_at_wall() {
        let mut geometry = StaticGeometry::new();
        geometry.add_box(AABB::new(2.0, -10.0, 3.0, 100.0), 0);
        let mut controller = controller();
        let mut body = Body::default();
        let mut sink = TelegraphState::default();

        controller.update(&tick(true, true, Vec2::new(500.0, 0.0)), &mut body, &geometry, &mut sink);

        let last = *sink.points.last().expect("telegraph points");
        assert!((last.x - 2.0).abs() < 1e-4, "stops at the wall, got {last}");
        assert!(sink.points.iter().all(|p| p.x <= 2.0 + 1e-4));
    }

    #[test]
    fn test_telegraph_ignores_unmasked_layers() {
        let mut geometry = StaticGeometry::new();
        geometry.add_box(AABB::new(2.0, -10.0, 3.0, 100.0), 4);
        let config = LaunchConfig {
            collidable_mask: LayerMask::single(0),
            max_prediction_time: 1.0,
            ..config()
        };
        let mut controller = LaunchController::new(config).expect("valid config");
        let mut body = Body::default();
        let mut sink = TelegraphState::default();

        controller.update(&tick(true, true, Vec2::new(500.0, 0.0)), &mut body, &geometry, &mut sink);
        assert!(sink.points.iter().any(|p| p.x > 3.0));
    }

    #[test]
    fn test_reset_forgets_held_button() {
        let mut controller = controller();
        let mut body = Body::default();
        let mut sink = TelegraphState::default();
        let offset = Vec2::new(100.0, 100.0);

        controller.update(&tick(true, true, offset), &mut body, &EmptySpace, &mut sink);
        controller.reset();
        assert_eq!(controller.state(), LaunchState::Idle);
        assert!(controller.telegraph().is_empty());

        let outcome = controller.update(&tick(true, false, offset), &mut body, &EmptySpace, &mut sink);
        assert_eq!(outcome.state, LaunchState::Idle);
        assert_eq!(body.writes, 0);
    }

    #[test]
    fn test_aiming_does_not_touch_velocity() {
        let mut controller = controller();
        let mut body = Body {
            velocity: Vec2::new(1.0, -1.0),
            writes: 0,
        };
        let mut sink = TelegraphState::default();
        for _ in 0..10 {
            controller.update(&tick(true, true, Vec2::new(50.0, 80.0)), &mut body, &EmptySpace, &mut sink);
        }
        assert_eq!(body.writes, 0);
        assert_eq!(body.velocity, Vec2::new(1.0, -1.0));
    }
}
