//! Mouse input state.
//!
//! [`Input`] tracks which buttons are currently pressed; [`CursorTracker`]
//! turns absolute cursor positions into per-event drag deltas. Both are
//! updated by the window event handler.

use std::collections::HashSet;
use std::hash::Hash;

pub use winit::event::MouseButton;

/// Tracks the pressed state of a set of inputs (keys or mouse buttons).
pub struct Input<T: Eq + Hash + Copy> {
    pressed: HashSet<T>,
}

impl<T: Eq + Hash + Copy> Input<T> {
    pub fn new() -> Self {
        Self {
            pressed: HashSet::new(),
        }
    }

    /// Returns `true` if the input is currently held down.
    pub fn pressed(&self, input: T) -> bool {
        self.pressed.contains(&input)
    }

    /// Call when an input is pressed (from the event handler).
    pub fn press(&mut self, input: T) {
        self.pressed.insert(input);
    }

    /// Call when an input is released (from the event handler).
    pub fn release(&mut self, input: T) {
        self.pressed.remove(&input);
    }
}

impl<T: Eq + Hash + Copy> Default for Input<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Converts absolute cursor positions into drag deltas.
///
/// The first motion after creation yields a zero delta, so a drag that
/// starts at an arbitrary position does not jerk the camera.
#[derive(Debug, Default)]
pub struct CursorTracker {
    last: Option<(f32, f32)>,
}

impl CursorTracker {
    /// Record a new cursor position and return the delta from the previous one.
    pub fn delta(&mut self, x: f32, y: f32) -> (f32, f32) {
        let delta = match self.last {
            Some((px, py)) => (x - px, y - py),
            None => (0.0, 0.0),
        };
        self.last = Some((x, y));
        delta
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_motion_is_a_zero_delta() {
        let mut cursor = CursorTracker::default();
        assert_eq!(cursor.delta(100.0, 50.0), (0.0, 0.0));
        assert_eq!(cursor.delta(103.0, 48.0), (3.0, -2.0));
    }

    #[test]
    fn press_release_round_trip() {
        let mut input = Input::new();
        assert!(!input.pressed(MouseButton::Left));
        input.press(MouseButton::Left);
        assert!(input.pressed(MouseButton::Left));
        input.release(MouseButton::Left);
        assert!(!input.pressed(MouseButton::Left));
    }
}
