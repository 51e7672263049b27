//! Minimal physics world for the headless host.
//!
//! A single box-shaped body falls under gravity and stops dead where its feet
//! meet static geometry. That is enough to exercise ground contact, launching
//! and landing without a full physics engine.

use leapline_common::{LayerMask, Vec2};
use leapline_gameplay::{GroundContact, SegmentQuery, StaticGeometry, VelocityState, AABB};
use tracing::warn;

use crate::config::SceneConfig;

/// Gap kept between a resting body's feet and the surface under it.
const SKIN: f32 = 1e-3;

/// The controlled body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    /// Center position
    pub position: Vec2,
    /// Velocity in units per second
    pub velocity: Vec2,
    /// Half width and half height
    pub half_extents: Vec2,
}

impl Body {
    /// Bottom-center point.
    #[must_use]
    pub fn feet(&self) -> Vec2 {
        self.position - Vec2::new(0.0, self.half_extents.y)
    }
}

impl VelocityState for Body {
    fn velocity(&self) -> Vec2 {
        self.velocity
    }

    fn set_velocity(&mut self, velocity: Vec2) {
        self.velocity = velocity;
    }
}

/// Body plus static geometry.
#[derive(Debug, Clone)]
pub struct World {
    geometry: StaticGeometry,
    body: Body,
    gravity: Vec2,
    mask: LayerMask,
    probe_depth: f32,
}

impl World {
    /// Builds the world a scene describes.
    #[must_use]
    pub fn new(scene: &SceneConfig) -> Self {
        Self {
            geometry: StaticGeometry::from_colliders(scene.geometry.clone()),
            body: Body {
                position: scene.body.start,
                velocity: Vec2::ZERO,
                half_extents: scene.body.half_extents,
            },
            gravity: scene.launch.effective_gravity(),
            mask: scene.launch.collidable_mask,
            probe_depth: scene.body.ground_probe_depth,
        }
    }

    /// The body.
    #[must_use]
    pub fn body(&self) -> &Body {
        &self.body
    }

    /// Static geometry.
    #[must_use]
    pub fn geometry(&self) -> &StaticGeometry {
        &self.geometry
    }

    /// Mutable body and shared geometry, borrowed together.
    pub fn parts_mut(&mut self) -> (&mut Body, &StaticGeometry) {
        (&mut self.body, &self.geometry)
    }

    /// Thin box under the feet used for ground contact.
    #[must_use]
    pub fn ground_probe(&self) -> AABB {
        let half_width = self.body.half_extents.x;
        AABB::new(-half_width, -self.probe_depth, half_width, 0.0).translated(self.body.feet())
    }

    /// Advances the body by `dt` seconds. Returns `true` if it was stopped.
    pub fn step(&mut self, dt: f32) -> bool {
        let body = &mut self.body;
        body.velocity += self.gravity * dt;
        let displacement = body.velocity * dt;
        let feet = body.feet();

        match self.geometry.cast_segment(feet, feet + displacement, self.mask) {
            Ok(Some(hit)) => {
                body.position = hit.point + Vec2::new(0.0, body.half_extents.y + SKIN);
                body.velocity = Vec2::ZERO;
                true
            }
            Ok(None) => {
                body.position += displacement;
                false
            }
            Err(error) => {
                warn!(%error, position = ?body.position, "body sweep failed, moving unobstructed");
                body.position += displacement;
                false
            }
        }
    }
}

impl GroundContact for World {
    fn is_grounded(&self) -> bool {
        self.geometry.touches(&self.ground_probe(), self.mask)
    }
}
