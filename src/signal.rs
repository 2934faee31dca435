//! Open-drain signal lines
//!
//! Both the keyboard and mouse connectors are active-low, open-collector
//! buses: a line is either pulled low by us ("asserted") or left floating so
//! the computer's pull-up brings it high ("released"). A line is never
//! actively driven high.
//!
//! Any `embedded_hal` output pin configured for open-drain operation already
//! has these semantics (`set_low` sinks, `set_high` floats), so the trait is
//! implemented for all of them.

use embedded_hal::digital::OutputPin;

/// Logical state of an open-drain line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LineState {
    /// Pulled low
    Asserted,
    /// Floating, pulled high externally
    Released,
}

impl LineState {
    /// Asserted when `active` is true
    pub const fn from_active(active: bool) -> Self {
        if active {
            Self::Asserted
        } else {
            Self::Released
        }
    }
}

/// Open-drain line driver
pub trait OpenDrain {
    /// Pull the line low
    fn assert(&mut self);

    /// Stop driving the line and let it float high
    fn release(&mut self);

    /// Drive the line to `state`
    fn set_state(&mut self, state: LineState) {
        match state {
            LineState::Asserted => self.assert(),
            LineState::Released => self.release(),
        }
    }
}

impl<P: OutputPin> OpenDrain for P {
    #[inline]
    fn assert(&mut self) {
        // pin errors on GPIO are not recoverable here; the line simply stays put
        let _ = self.set_low();
    }

    #[inline]
    fn release(&mut self) {
        let _ = self.set_high();
    }
}
