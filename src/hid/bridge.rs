//! USB HID to Amiga report bridge
//!
//! Receives the host stack's mount, unmount and report callbacks and turns
//! them into keyboard frames, button line changes and motion vectors.
//! Keyboard reports are diffed against the previous one, so only edges
//! reach the wire.

use super::constants::DeviceClass;
use super::keyboard::{KeyCode, KeyModifiers, KeyboardLeds, KeyboardReport};
use super::mouse::{MouseButtons, MouseReport};
use crate::error::Result;
use crate::keyboard::{keymap, AmigaKeyboard, KeyDirection, Scancode};
use crate::mouse::{ButtonLines, MotionHandoff, MotionVector, MouseButton};
use crate::signal::OpenDrain;
use embedded_hal::delay::DelayNs;

/// Destination for translated key events
pub trait KeySink {
    /// Put one key event on the wire
    fn send(&mut self, code: Scancode, direction: KeyDirection) -> Result<()>;

    /// Caps-lock toggle state as the computer sees it
    fn is_caps_lock_on(&self) -> bool;
}

impl<CLK, DAT, RST, D> KeySink for AmigaKeyboard<CLK, DAT, RST, D>
where
    CLK: OpenDrain,
    DAT: OpenDrain,
    RST: OpenDrain,
    D: DelayNs,
{
    fn send(&mut self, code: Scancode, direction: KeyDirection) -> Result<()> {
        AmigaKeyboard::send(self, code, direction)
    }

    fn is_caps_lock_on(&self) -> bool {
        AmigaKeyboard::is_caps_lock_on(self)
    }
}

/// Destination for mouse button changes
pub trait ButtonSink {
    /// Apply a button state
    fn set(&mut self, button: MouseButton, pressed: bool);
}

impl<B1, B2, B3> ButtonSink for ButtonLines<B1, B2, B3>
where
    B1: OpenDrain,
    B2: OpenDrain,
    B3: OpenDrain,
{
    fn set(&mut self, button: MouseButton, pressed: bool) {
        ButtonLines::set(self, button, pressed)
    }
}

/// Report-protocol mouse buttons and the Amiga buttons they drive, in the
/// order edges are applied
const BUTTON_MAP: [(MouseButtons, MouseButton); 3] = [
    (MouseButtons::LEFT, MouseButton::Left),
    (MouseButtons::MIDDLE, MouseButton::Middle),
    (MouseButtons::RIGHT, MouseButton::Right),
];

/// Upstream callback surface of the bridge
pub struct HidBridge<'a, K, B>
where
    K: KeySink,
    B: ButtonSink,
{
    keyboard: K,
    buttons: B,
    motion: &'a MotionHandoff,
    last_keys: KeyboardReport,
    last_buttons: MouseButtons,
    leds: KeyboardLeds,
}

impl<'a, K, B> HidBridge<'a, K, B>
where
    K: KeySink,
    B: ButtonSink,
{
    /// Create a bridge feeding `keyboard`, `buttons` and the encoder behind
    /// `motion`
    pub fn new(keyboard: K, buttons: B, motion: &'a MotionHandoff) -> Self {
        Self {
            keyboard,
            buttons,
            motion,
            last_keys: KeyboardReport::EMPTY,
            last_buttons: MouseButtons::empty(),
            leds: KeyboardLeds::empty(),
        }
    }

    /// A HID interface appeared
    pub fn on_mount(&mut self, class: DeviceClass) {
        #[cfg(feature = "defmt")]
        defmt::info!("[hid] mounted {}", class);

        // a fresh keyboard starts with its LEDs off
        if class == DeviceClass::Keyboard {
            self.leds = KeyboardLeds::empty();
        }
    }

    /// A HID interface went away
    ///
    /// Everything the device still held is released so nothing stays stuck
    /// down on the computer side.
    pub fn on_unmount(&mut self, class: DeviceClass) {
        #[cfg(feature = "defmt")]
        defmt::info!("[hid] unmounted {}", class);

        match class {
            DeviceClass::Keyboard => {
                self.keyboard_report(KeyboardReport::EMPTY);
            }
            DeviceClass::Mouse => {
                self.mouse_buttons(MouseButtons::empty());
            }
            DeviceClass::Unknown => {}
        }
    }

    /// A report arrived from a device of `class`
    ///
    /// Returns the LED output report to send back to a keyboard when the
    /// caps-lock state changed.
    pub fn on_report(&mut self, class: DeviceClass, report: &[u8]) -> Result<Option<KeyboardLeds>> {
        match class {
            DeviceClass::Keyboard => {
                let report = KeyboardReport::parse(report)?;
                Ok(self.keyboard_report(report))
            }
            DeviceClass::Mouse => {
                let report = MouseReport::parse(report)?;
                self.mouse_report(report);
                Ok(None)
            }
            DeviceClass::Unknown => {
                #[cfg(feature = "defmt")]
                defmt::trace!("[hid] ignoring report from unclassified device");
                Ok(None)
            }
        }
    }

    /// Apply a parsed keyboard report
    pub fn keyboard_report(&mut self, report: KeyboardReport) -> Option<KeyboardLeds> {
        let last = self.last_keys;
        // roll-over: keys unknown, hold what we had
        let report = if report.is_roll_over() {
            last.with_modifiers(report.modifiers)
        } else {
            report
        };

        for key in report.keys_pressed() {
            if !last.is_key_pressed(key) {
                self.key(key, KeyDirection::Pressed);
            }
        }
        for key in last.keys_pressed() {
            if !report.is_key_pressed(key) {
                self.key(key, KeyDirection::Released);
            }
        }

        let pressed = report.modifiers.difference(last.modifiers);
        let released = last.modifiers.difference(report.modifiers);
        for (bit, code) in keymap::MODIFIER_KEYS {
            // either ctrl moves the single Amiga ctrl
            let mask = if code == Scancode::CTRL { KeyModifiers::CTRL } else { bit };
            if pressed.intersects(mask) {
                self.modifier(code, KeyDirection::Pressed);
            }
            if released.intersects(mask) {
                self.modifier(code, KeyDirection::Released);
            }
        }

        self.last_keys = report;
        self.sync_leds()
    }

    /// Apply a parsed mouse report
    pub fn mouse_report(&mut self, report: MouseReport) {
        self.mouse_buttons(report.buttons);

        if report.has_movement() {
            self.motion.publish(MotionVector::new(report.x, report.y));
        }
    }

    /// Give back the downstream sinks
    pub fn free(self) -> (K, B) {
        (self.keyboard, self.buttons)
    }

    fn mouse_buttons(&mut self, buttons: MouseButtons) {
        let changed = buttons.symmetric_difference(self.last_buttons);
        for (bit, button) in BUTTON_MAP {
            if changed.contains(bit) {
                self.buttons.set(button, buttons.contains(bit));
            }
        }
        self.last_buttons = buttons;
    }

    fn key(&mut self, key: KeyCode, direction: KeyDirection) {
        let code = keymap::from_hid(key.raw());
        // unmapped keys are refused and logged by the transmitter
        let _ = self.keyboard.send(code, direction);
    }

    fn modifier(&mut self, code: Scancode, direction: KeyDirection) {
        let _ = self.keyboard.send(code, direction);
    }

    fn sync_leds(&mut self) -> Option<KeyboardLeds> {
        let caps = self.keyboard.is_caps_lock_on();
        if caps == self.leds.contains(KeyboardLeds::CAPS_LOCK) {
            return None;
        }

        self.leds.set(KeyboardLeds::CAPS_LOCK, caps);

        #[cfg(feature = "defmt")]
        defmt::debug!("[hid] caps lock led {}", if caps { "on" } else { "off" });

        Some(self.leds)
    }
}
