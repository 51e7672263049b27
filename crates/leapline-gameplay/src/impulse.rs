//! Launch velocity composition.

use leapline_common::Vec2;

use crate::aim::AimVector;

/// Computes the velocity an object has right after launching along `aim`.
///
/// `current_velocity * velocity_retention` keeps part of the motion the object
/// already had; the aim contributes `aim.magnitude * jump_strength` along its
/// direction. A zero aim direction leaves only the retained term.
#[must_use]
pub fn launch_velocity(
    aim: AimVector,
    current_velocity: Vec2,
    jump_strength: f32,
    velocity_retention: f32,
) -> Vec2 {
    let retained = current_velocity * velocity_retention;
    let impulse = aim.direction.normalize_or_zero() * (aim.magnitude * jump_strength);
    retained + impulse
}
