//! Host-side capabilities the launch controller depends on.
//!
//! Each trait is one narrow question or command. A host wires them to its
//! physics engine, input layer, and body storage.

use std::sync::Arc;

use leapline_common::Vec2;
use parking_lot::Mutex;

use crate::input::PointerSample;

/// Reports whether the controlled object rests on a collidable surface.
pub trait GroundContact {
    /// True while grounded.
    fn is_grounded(&self) -> bool;
}

/// Reports whether the launch button is held.
pub trait ButtonSource {
    /// True while held.
    fn is_held(&self) -> bool;
}

/// Reports the pointer relative to the object on screen.
pub trait PointerSource {
    /// Current pointer sample.
    fn pointer(&self) -> PointerSample;
}

/// Read/write access to the controlled object's velocity.
///
/// The controller reads it for prediction and writes it exactly once per
/// launch.
pub trait VelocityState {
    /// Current velocity.
    fn velocity(&self) -> Vec2;

    /// Replaces the velocity.
    fn set_velocity(&mut self, velocity: Vec2);
}

impl VelocityState for Vec2 {
    fn velocity(&self) -> Vec2 {
        *self
    }

    fn set_velocity(&mut self, velocity: Vec2) {
        *self = velocity;
    }
}

/// Velocity shared between threads.
///
/// Clones point at the same value; every read and write takes the lock.
#[derive(Debug, Clone, Default)]
pub struct SharedVelocity(Arc<Mutex<Vec2>>);

impl SharedVelocity {
    /// Creates a shared velocity.
    #[must_use]
    pub fn new(velocity: Vec2) -> Self {
        Self(Arc::new(Mutex::new(velocity)))
    }

    /// Applies `f` to the velocity under the lock.
    pub fn update(&self, f: impl FnOnce(&mut Vec2)) {
        f(&mut self.0.lock());
    }
}

impl VelocityState for SharedVelocity {
    fn velocity(&self) -> Vec2 {
        *self.0.lock()
    }

    fn set_velocity(&mut self, velocity: Vec2) {
        *self.0.lock() = velocity;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_vector_is_velocity_state() {
        let mut v = Vec2::new(1.0, 2.0);
        v.set_velocity(Vec2::new(3.0, 4.0));
        assert_eq!(v.velocity(), Vec2::new(3.0, 4.0));
    }

    #[test]
    fn test_shared_velocity_clones_alias() {
        let mut writer = SharedVelocity::new(Vec2::ZERO);
        let reader = writer.clone();

        writer.set_velocity(Vec2::new(0.0, 7.0));
        assert_eq!(reader.velocity(), Vec2::new(0.0, 7.0));

        reader.update(|v| v.x += 1.0);
        assert_eq!(writer.velocity(), Vec2::new(1.0, 7.0));
    }

    #[test]
    fn test_shared_velocity_across_threads() {
        let shared = SharedVelocity::new(Vec2::ZERO);
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let shared = shared.clone();
                std::thread::spawn(move || {
                    for _ in 0..100 {
                        shared.update(|v| v.y += 1.0);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().expect("worker finished");
        }
        assert_eq!(shared.velocity().y, 400.0);
    }
}
