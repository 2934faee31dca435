//! Amiga keyboard serial transmitter
//!
//! The Amiga keyboard connector is a synchronous serial link driven by the
//! keyboard: the keyboard owns `/CLK`, presents each bit on `/DAT` and
//! pulses the clock low once per bit, most significant bit first. Both lines
//! are active low and open-collector. A third line, `/RST`, holds the
//! computer in reset while asserted.
//!
//! # Frame timing
//!
//! ```text
//!        setup   low   gap
//! /DAT  ==X=====================X=====  (20us + 20us + 50us per bit)
//! /CLK  ---------\_____/--------------
//! ```
//!
//! After the eighth bit `/DAT` is released for 5ms to end the frame. The
//! computer acknowledges with a low pulse on `/DAT`; that handshake is not
//! checked, so a lost frame is never retransmitted.

pub mod keymap;
pub mod scancode;

pub use scancode::{wire_value, KeyDirection, Scancode};

use crate::config::timing;
use crate::error::{BridgeError, Result};
use crate::signal::{LineState, OpenDrain};
use embedded_hal::delay::DelayNs;

/// Chord of modifiers that resets the computer (Ctrl + both Amiga keys)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ResetChord {
    /// Ctrl held
    pub ctrl: bool,
    /// Left Amiga held
    pub left_amiga: bool,
    /// Right Amiga held
    pub right_amiga: bool,
}

impl ResetChord {
    /// Record a key event; returns false if the code is not part of the chord
    pub fn update(&mut self, code: Scancode, direction: KeyDirection) -> bool {
        let held = !direction.is_release();
        match code {
            Scancode::CTRL => self.ctrl = held,
            Scancode::LEFT_AMIGA => self.left_amiga = held,
            Scancode::RIGHT_AMIGA => self.right_amiga = held,
            _ => return false,
        }
        true
    }

    /// All three keys held
    pub const fn is_formed(&self) -> bool {
        self.ctrl && self.left_amiga && self.right_amiga
    }
}

/// Amiga keyboard transmitter and state tracker
///
/// Owns the three keyboard lines. All methods block for the duration of the
/// wire activity they cause.
pub struct AmigaKeyboard<CLK, DAT, RST, D>
where
    CLK: OpenDrain,
    DAT: OpenDrain,
    RST: OpenDrain,
    D: DelayNs,
{
    clock: CLK,
    data: DAT,
    reset: RST,
    delay: D,
    caps_lock: bool,
    chord: ResetChord,
    in_reset: bool,
}

impl<CLK, DAT, RST, D> AmigaKeyboard<CLK, DAT, RST, D>
where
    CLK: OpenDrain,
    DAT: OpenDrain,
    RST: OpenDrain,
    D: DelayNs,
{
    /// Take ownership of the keyboard lines
    ///
    /// Nothing is driven until [`AmigaKeyboard::init`].
    pub fn new(clock: CLK, data: DAT, reset: RST, delay: D) -> Self {
        Self {
            clock,
            data,
            reset,
            delay,
            caps_lock: false,
            chord: ResetChord::default(),
            in_reset: false,
        }
    }

    /// Bring the link up
    ///
    /// Releases every line (a held `/RST` keeps the computer in reset),
    /// waits for the computer to settle, then sends the power-up
    /// announcement pair the computer expects from a freshly powered
    /// keyboard.
    pub fn init(&mut self) {
        self.data.release();
        self.clock.release();
        self.reset.release();

        self.delay.delay_ms(timing::STARTUP_SETTLE_MS);

        #[cfg(feature = "defmt")]
        defmt::info!("[akb] sending power-up announcement");

        self.transmit(wire_value(Scancode::INIT_POWER, KeyDirection::Pressed));
        self.delay.delay_ms(timing::ANNOUNCE_GAP_MS);
        self.transmit(wire_value(Scancode::TERM_POWER, KeyDirection::Pressed));
    }

    /// Send one key event
    ///
    /// The unknown sentinel is refused. Caps lock is translated from the
    /// momentary USB key into the latching Amiga key: each press toggles,
    /// turning on sends a down code, turning off sends an up code, and
    /// releases are never sent.
    pub fn send(&mut self, code: Scancode, direction: KeyDirection) -> Result<()> {
        if code.is_unknown() {
            #[cfg(feature = "defmt")]
            defmt::warn!("[akb] refusing to send unknown scancode");
            return Err(BridgeError::UnknownScancode);
        }

        let mut direction = direction;
        if code == Scancode::CAPS_LOCK {
            if direction.is_release() {
                return Ok(());
            }
            direction = KeyDirection::from_up(self.caps_lock);
            self.caps_lock = !self.caps_lock;

            #[cfg(feature = "defmt")]
            defmt::debug!("[akb] caps lock {}", if self.caps_lock { "on" } else { "off" });
        }

        if self.chord.update(code, direction) {
            self.track_reset_chord();
        }

        self.transmit(wire_value(code, direction));
        Ok(())
    }

    /// Hold the computer in reset
    pub fn assert_reset(&mut self) {
        #[cfg(feature = "defmt")]
        defmt::warn!("[akb] *** reset asserted ***");
        self.reset.assert();
    }

    /// Let the computer restart
    pub fn release_reset(&mut self) {
        #[cfg(feature = "defmt")]
        defmt::warn!("[akb] *** reset released ***");
        self.reset.release();
    }

    /// Periodic housekeeping from the main loop
    ///
    /// The link needs no maintenance while the computer acknowledges frames
    /// silently; this is the hook for lost-sync recovery once acknowledge
    /// pulses are monitored.
    pub fn service(&mut self) {}

    /// Caps lock latch state as seen by the computer
    pub fn is_caps_lock_on(&self) -> bool {
        self.caps_lock
    }

    /// True while the reset line is held by the chord
    pub fn is_in_reset(&self) -> bool {
        self.in_reset
    }

    /// Current modifier chord state
    pub fn chord(&self) -> ResetChord {
        self.chord
    }

    /// Release the lines
    pub fn free(self) -> (CLK, DAT, RST, D) {
        (self.clock, self.data, self.reset, self.delay)
    }

    fn track_reset_chord(&mut self) {
        let formed = self.chord.is_formed();
        if formed && !self.in_reset {
            self.in_reset = true;
            self.assert_reset();
        } else if self.in_reset && !formed {
            self.in_reset = false;
            self.release_reset();
        }
    }

    /// Clock one byte out, MSB first, then hold the end-of-frame release
    ///
    /// The eight bit cells run inside a critical section; an interrupt
    /// landing in a clock pulse would stretch it past what the computer's
    /// keyboard UART tolerates.
    fn transmit(&mut self, value: u8) {
        critical_section::with(|_| {
            for bit in (0..8).rev() {
                self.data.set_state(LineState::from_active(value & (1 << bit) != 0));

                self.delay.delay_us(timing::DATA_SETUP_US);
                self.clock.assert();
                self.delay.delay_us(timing::CLOCK_LOW_US);
                self.clock.release();
                self.delay.delay_us(timing::INTER_BIT_US);
            }
        });

        self.data.release();
        self.delay.delay_ms(timing::END_OF_FRAME_MS);
    }
}
