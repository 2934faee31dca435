//! Mouse button lines
//!
//! Buttons are plain active-low lines applied as soon as a report arrives.
//! USB mice debounce internally, so nothing is filtered here.

use crate::signal::{LineState, OpenDrain};

/// Physical mouse button
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MouseButton {
    /// Left button (B1)
    Left,
    /// Right button (B2)
    Right,
    /// Middle button (B3)
    Middle,
}

/// The three button lines of the mouse port
pub struct ButtonLines<B1, B2, B3>
where
    B1: OpenDrain,
    B2: OpenDrain,
    B3: OpenDrain,
{
    left: B1,
    right: B2,
    middle: B3,
}

impl<B1, B2, B3> ButtonLines<B1, B2, B3>
where
    B1: OpenDrain,
    B2: OpenDrain,
    B3: OpenDrain,
{
    /// Take the lines, all released
    pub fn new(mut left: B1, mut right: B2, mut middle: B3) -> Self {
        left.release();
        right.release();
        middle.release();
        Self { left, right, middle }
    }

    /// Apply a button state change
    pub fn set(&mut self, button: MouseButton, pressed: bool) {
        #[cfg(feature = "defmt")]
        defmt::debug!("[aqm] button {} {}", button, if pressed { "down" } else { "up" });

        let state = LineState::from_active(pressed);
        match button {
            MouseButton::Left => self.left.set_state(state),
            MouseButton::Right => self.right.set_state(state),
            MouseButton::Middle => self.middle.set_state(state),
        }
    }

    /// Give back the lines
    pub fn free(self) -> (B1, B2, B3) {
        (self.left, self.right, self.middle)
    }
}
