//! Per-tick input for the launch controller.
//!
//! The controller never polls devices. The host gathers one [`TickInput`]
//! per control tick, either by hand or through [`TickInput::gather`].

use leapline_common::Vec2;
use serde::{Deserialize, Serialize};

use crate::aim::Viewport;
use crate::collaborators::{ButtonSource, GroundContact, PointerSource};

/// State of a button and its release edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ButtonState {
    /// Whether the button is currently held down
    pub pressed: bool,
    /// Whether the button was just released this tick
    pub just_released: bool,
}

impl ButtonState {
    /// Create a new button state (not pressed).
    #[must_use]
    pub const fn new() -> Self {
        Self {
            pressed: false,
            just_released: false,
        }
    }

    /// Update the button state based on whether it's currently pressed.
    pub fn update(&mut self, is_pressed: bool) {
        self.just_released = !is_pressed && self.pressed;
        self.pressed = is_pressed;
    }

    /// Forget everything, as if the button had never been touched.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

/// Pointer position relative to the controlled object's screen projection.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PointerSample {
    /// Pointer minus object, in screen pixels
    pub offset: Vec2,
    /// Current viewport size
    pub viewport: Viewport,
}

impl PointerSample {
    /// Creates a pointer sample.
    #[must_use]
    pub const fn new(offset: Vec2, viewport: Viewport) -> Self {
        Self { offset, viewport }
    }

    /// Builds a sample from pointer and object screen positions.
    #[must_use]
    pub fn from_screen(pointer: Vec2, object: Vec2, viewport: Viewport) -> Self {
        Self::new(pointer - object, viewport)
    }
}

/// Everything the controller reads during one tick.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TickInput {
    /// Whether the object rests on a collidable surface
    pub grounded: bool,
    /// Whether the launch button is held this tick
    pub button_held: bool,
    /// Pointer offset and viewport
    pub pointer: PointerSample,
    /// Object's world position, the telegraph origin
    pub position: Vec2,
}

impl TickInput {
    /// Polls the collaborators once.
    pub fn gather<G, B, P>(ground: &G, button: &B, pointer: &P, position: Vec2) -> Self
    where
        G: GroundContact + ?Sized,
        B: ButtonSource + ?Sized,
        P: PointerSource + ?Sized,
    {
        Self {
            grounded: ground.is_grounded(),
            button_held: button.is_held(),
            pointer: pointer.pointer(),
            position,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_button_state() {
        let mut state = ButtonState::new();
        assert!(!state.pressed);

        // Press the button
        state.update(true);
        assert!(state.pressed);
        assert!(!state.just_released);

        // Hold the button
        state.update(true);
        assert!(state.pressed);
        assert!(!state.just_released);

        // Release the button
        state.update(false);
        assert!(!state.pressed);
        assert!(state.just_released);

        // Stay released
        state.update(false);
        assert!(!state.just_released);
    }

    #[test]
    fn test_button_reset_drops_release_edge() {
        let mut state = ButtonState::new();
        state.update(true);
        state.reset();
        state.update(false);
        assert!(!state.just_released);
    }

    #[test]
    fn test_pointer_from_screen() {
        let sample = PointerSample::from_screen(
            Vec2::new(900.0, 200.0),
            Vec2::new(640.0, 360.0),
            Viewport::new(1280.0, 720.0),
        );
        assert_eq!(sample.offset, Vec2::new(260.0, -160.0));
    }

    #[test]
    fn test_gather_polls_collaborators() {
        struct Host;

        impl GroundContact for Host {
            fn is_grounded(&self) -> bool {
                true
            }
        }

        impl ButtonSource for Host {
            fn is_held(&self) -> bool {
                true
            }
        }

        impl PointerSource for Host {
            fn pointer(&self) -> PointerSample {
                PointerSample::new(Vec2::new(10.0, 20.0), Viewport::new(100.0, 100.0))
            }
        }

        let host = Host;
        let input = TickInput::gather(&host, &host, &host, Vec2::new(1.0, 2.0));
        assert!(input.grounded);
        assert!(input.button_held);
        assert_eq!(input.pointer.offset, Vec2::new(10.0, 20.0));
        assert_eq!(input.position, Vec2::new(1.0, 2.0));
    }
}
