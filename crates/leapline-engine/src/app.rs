//! Fixed-tick driver.
//!
//! Feeds scripted input to a [`LaunchController`], steps the world, and
//! collects what happened into a [`RunReport`].

use anyhow::{Context, Result};
use leapline_common::Vec2;
use leapline_gameplay::{
    ButtonSource, GroundContact, LaunchController, LaunchState, PointerSample, PointerSource,
    TelegraphState, TickInput,
};
use serde::Serialize;
use tracing::{debug, info};

use crate::config::SceneConfig;
use crate::world::World;

/// A launch that happened during the run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LaunchRecord {
    /// Tick of the release
    pub tick: u32,
    /// Body position at launch
    pub position: Vec2,
    /// Velocity written to the body
    pub velocity: Vec2,
    /// Telegraph end point shown on the tick before release
    pub predicted_end: Option<Vec2>,
}

/// A controller state change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TransitionRecord {
    /// Tick the change happened on
    pub tick: u32,
    /// Previous state
    pub from: LaunchState,
    /// New state
    pub to: LaunchState,
}

/// Summary of a finished run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunReport {
    /// Ticks executed
    pub ticks: u32,
    /// Launches in order
    pub launches: Vec<LaunchRecord>,
    /// Body position at each airborne-to-grounded change
    pub landings: Vec<Vec2>,
    /// State changes in order
    pub transitions: Vec<TransitionRecord>,
    /// Most telegraph points shown on any tick
    pub longest_telegraph: usize,
    /// Controller state after the last tick
    pub final_state: LaunchState,
    /// Body position after the last tick
    pub final_position: Vec2,
    /// Whether the body ended on the ground
    pub final_grounded: bool,
}

/// Scripted button and pointer for one tick.
struct ScriptedInput<'a> {
    scene: &'a SceneConfig,
    tick: u32,
}

impl ButtonSource for ScriptedInput<'_> {
    fn is_held(&self) -> bool {
        self.scene.held_at(self.tick)
    }
}

impl PointerSource for ScriptedInput<'_> {
    fn pointer(&self) -> PointerSample {
        self.scene.pointer_at(self.tick)
    }
}

/// Runs a scene to completion.
pub fn run(scene: &SceneConfig) -> Result<RunReport> {
    let mut controller =
        LaunchController::new(scene.launch.clone()).context("invalid launch config")?;
    let mut world = World::new(scene);
    let mut telegraph = TelegraphState::default();
    let dt = scene.tick_seconds();

    info!(
        ticks = scene.ticks,
        tick_rate = scene.tick_rate,
        colliders = world.geometry().len(),
        "Running scene"
    );

    let mut launches = Vec::new();
    let mut transitions = Vec::new();
    let mut landings = Vec::new();
    let mut longest_telegraph = 0;
    let mut was_grounded = world.is_grounded();

    for tick in 0..scene.ticks {
        let script = ScriptedInput { scene, tick };
        let input = TickInput::gather(&world, &script, &script, world.body().position);
        let predicted_end = telegraph.points.last().copied().filter(|_| telegraph.visible);

        let before = controller.state();
        let (body, geometry) = world.parts_mut();
        let outcome = controller.update(&input, body, geometry, &mut telegraph);

        if outcome.state != before {
            transitions.push(TransitionRecord {
                tick,
                from: before,
                to: outcome.state,
            });
        }
        longest_telegraph = longest_telegraph.max(outcome.telegraph_points);

        if let Some(velocity) = outcome.launched {
            info!(tick, position = ?input.position, ?velocity, "Launch");
            launches.push(LaunchRecord {
                tick,
                position: input.position,
                velocity,
                predicted_end,
            });
        }

        world.step(dt);

        let grounded = world.is_grounded();
        if grounded && !was_grounded {
            let position = world.body().position;
            info!(tick, ?position, "Landed");
            landings.push(position);
        }
        was_grounded = grounded;
    }

    let report = RunReport {
        ticks: scene.ticks,
        launches,
        landings,
        transitions,
        longest_telegraph,
        final_state: controller.state(),
        final_position: world.body().position,
        final_grounded: was_grounded,
    };
    debug!(?report, "run finished");
    Ok(report)
}
