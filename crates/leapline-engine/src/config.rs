//! Scene configuration.
//!
//! A scene bundles launch tuning, the body, static geometry, and a scripted
//! input track. Scenes are read from TOML; without a file the built-in
//! [`SceneConfig::default`] scene is used.

use std::fs;
use std::path::Path;

use leapline_common::{ConfigError, Vec2};
use leapline_gameplay::{Collider, LaunchConfig, PointerSample, Shape, Viewport, AABB};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

/// Errors raised while loading a scene.
#[derive(Debug, Error)]
pub enum SceneError {
    /// Scene file could not be read
    #[error("failed to read scene: {0}")]
    Io(#[from] std::io::Error),

    /// Scene file is not valid TOML for a scene
    #[error("failed to parse scene: {0}")]
    Parse(String),

    /// Launch tuning was rejected
    #[error("invalid launch config: {0}")]
    Launch(#[from] ConfigError),

    /// Scene field out of range
    #[error("invalid scene: {0}")]
    Invalid(String),
}

/// The controlled body.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BodyConfig {
    /// Starting center position
    pub start: Vec2,
    /// Half width and half height
    pub half_extents: Vec2,
    /// Depth of the ground probe below the feet
    pub ground_probe_depth: f32,
}

impl Default for BodyConfig {
    fn default() -> Self {
        Self {
            start: Vec2::new(0.0, 0.5),
            half_extents: Vec2::new(0.25, 0.5),
            ground_probe_depth: 0.05,
        }
    }
}

/// A run of ticks with fixed input.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InputSpan {
    /// First tick covered
    pub from_tick: u32,
    /// First tick no longer covered
    pub to_tick: u32,
    /// Whether the launch button is held
    #[serde(default)]
    pub held: bool,
    /// Pointer minus body, in screen pixels
    #[serde(default)]
    pub pointer: Vec2,
    /// Viewport the pointer is measured against
    #[serde(default)]
    pub viewport: Viewport,
}

impl InputSpan {
    /// Checks if `tick` falls inside this span.
    #[must_use]
    pub fn covers(&self, tick: u32) -> bool {
        (self.from_tick..self.to_tick).contains(&tick)
    }
}

/// Full scene description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Control ticks per second
    pub tick_rate: u32,
    /// Number of ticks to run
    pub ticks: u32,
    /// Launch tuning
    pub launch: LaunchConfig,
    /// Controlled body
    pub body: BodyConfig,
    /// Static colliders
    pub geometry: Vec<Collider>,
    /// Scripted input; later spans win where they overlap
    pub input: Vec<InputSpan>,
}

impl Default for SceneConfig {
    fn default() -> Self {
        let ground = Collider {
            layer: 0,
            shape: Shape::Box(AABB::new(-50.0, -5.0, 50.0, 0.0)),
        };
        let wall = Collider {
            layer: 0,
            shape: Shape::Box(AABB::new(12.0, 0.0, 13.0, 4.0)),
        };
        let ramp = Collider {
            layer: 0,
            shape: Shape::Segment {
                a: Vec2::new(-20.0, 0.0),
                b: Vec2::new(-10.0, 3.0),
            },
        };
        let viewport = Viewport::new(1280.0, 720.0);

        Self {
            tick_rate: 60,
            ticks: 360,
            launch: LaunchConfig::default(),
            body: BodyConfig::default(),
            geometry: vec![ground, wall, ramp],
            input: vec![
                InputSpan {
                    from_tick: 10,
                    to_tick: 40,
                    held: true,
                    pointer: Vec2::new(320.0, 300.0),
                    viewport,
                },
                InputSpan {
                    from_tick: 200,
                    to_tick: 230,
                    held: true,
                    pointer: Vec2::new(-400.0, 200.0),
                    viewport,
                },
            ],
        }
    }
}

impl SceneConfig {
    /// Loads a scene, or the built-in one when `path` is `None`.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, SceneError> {
        match path {
            Some(path) => Self::load_from(path),
            None => {
                info!("No scene file given, using built-in scene");
                let scene = Self::default();
                scene.validate()?;
                Ok(scene)
            }
        }
    }

    /// Loads and validates a scene file.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, SceneError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        let scene = Self::from_toml_str(&contents)?;
        info!("Loaded scene from {}", path.display());
        Ok(scene)
    }

    /// Parses and validates a scene.
    pub fn from_toml_str(text: &str) -> Result<Self, SceneError> {
        let scene: Self = toml::from_str(text).map_err(|e| SceneError::Parse(e.to_string()))?;
        scene.validate()?;
        Ok(scene)
    }

    /// Checks the scene can be run.
    pub fn validate(&self) -> Result<(), SceneError> {
        self.launch.validate()?;
        if self.tick_rate == 0 {
            return Err(SceneError::Invalid("tick_rate must be positive".to_string()));
        }
        let half = self.body.half_extents;
        if !(half.is_finite() && half.x > 0.0 && half.y > 0.0) {
            return Err(SceneError::Invalid(format!(
                "body half_extents must be positive, got {half}"
            )));
        }
        if !(self.body.ground_probe_depth.is_finite() && self.body.ground_probe_depth > 0.0) {
            return Err(SceneError::Invalid(
                "body ground_probe_depth must be positive".to_string(),
            ));
        }
        if !self.body.start.is_finite() {
            return Err(SceneError::Invalid("body start must be finite".to_string()));
        }
        if let Some(span) = self.input.iter().find(|s| s.from_tick > s.to_tick) {
            return Err(SceneError::Invalid(format!(
                "input span starts after it ends ({}..{})",
                span.from_tick, span.to_tick
            )));
        }
        Ok(())
    }

    /// Seconds per control tick.
    #[must_use]
    pub fn tick_seconds(&self) -> f32 {
        1.0 / self.tick_rate as f32
    }

    /// Scripted button state for `tick`. Uncovered ticks are released.
    #[must_use]
    pub fn held_at(&self, tick: u32) -> bool {
        self.span_at(tick).is_some_and(|span| span.held)
    }

    /// Scripted pointer for `tick`.
    ///
    /// The pointer stays where the most recent span left it, so releasing the
    /// button at the end of a span does not also move the pointer.
    #[must_use]
    pub fn pointer_at(&self, tick: u32) -> PointerSample {
        self.span_at(tick)
            .or_else(|| {
                self.input
                    .iter()
                    .filter(|span| span.to_tick <= tick)
                    .max_by_key(|span| span.to_tick)
            })
            .map_or_else(PointerSample::default, |span| {
                PointerSample::new(span.pointer, span.viewport)
            })
    }

    fn span_at(&self, tick: u32) -> Option<&InputSpan> {
        self.input.iter().rev().find(|span| span.covers(tick))
    }
}
