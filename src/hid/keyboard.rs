//! HID keyboard support
//!
//! Implements HID Boot Protocol keyboard reports (USB HID Spec 1.11, Appendix B.1)

use crate::error::{BridgeError, Result};
use bitflags::bitflags;

/// Boot protocol keyboard report
///
/// Eight bytes: modifier bits, one reserved byte, then six usage slots
/// where 0x00 marks an empty slot. Keys appear in the slots in no
/// particular order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyboardReport {
    /// Modifier key states
    pub modifiers: KeyModifiers,
    /// Reserved byte
    _reserved: u8,
    /// Usage slots
    keycodes: [u8; 6],
}

impl KeyboardReport {
    /// Report length in bytes
    pub const LEN: usize = 8;

    /// Empty report: nothing held
    pub const EMPTY: Self = Self {
        modifiers: KeyModifiers::empty(),
        _reserved: 0,
        keycodes: [0; 6],
    };

    /// Parse report from raw data
    ///
    /// ```
    /// use amigahid::hid::{KeyCode, KeyboardReport};
    ///
    /// let report = KeyboardReport::parse(&[0x02, 0x00, 0x04, 0, 0, 0, 0, 0]).unwrap();
    /// assert!(report.modifiers.shift());
    /// assert!(report.is_key_pressed(KeyCode::A));
    /// ```
    pub fn parse(data: &[u8]) -> Result<Self> {
        if data.len() < Self::LEN {
            return Err(BridgeError::InvalidReport);
        }

        Ok(Self {
            modifiers: KeyModifiers::from_bits_truncate(data[0]),
            _reserved: data[1],
            keycodes: [data[2], data[3], data[4], data[5], data[6], data[7]],
        })
    }

    /// Build a report from modifiers and up to six keys
    pub fn new(modifiers: KeyModifiers, keys: &[KeyCode]) -> Self {
        let mut keycodes = [0; 6];
        for (slot, key) in keycodes.iter_mut().zip(keys) {
            *slot = key.0;
        }
        Self {
            modifiers,
            _reserved: 0,
            keycodes,
        }
    }

    /// Held keys, modifiers excluded
    pub fn keys_pressed(&self) -> impl Iterator<Item = KeyCode> + '_ {
        self.keycodes
            .iter()
            .filter(|&&code| code != 0)
            .map(|&code| KeyCode(code))
    }

    /// `key` is held; the empty-slot usage never is
    pub fn is_key_pressed(&self, key: KeyCode) -> bool {
        key.0 != 0 && self.keycodes.contains(&key.0)
    }

    /// Any non-modifier key held
    pub fn has_keys(&self) -> bool {
        self.keycodes.iter().any(|&code| code != 0)
    }

    /// Same keys under different modifiers
    pub fn with_modifiers(self, modifiers: KeyModifiers) -> Self {
        Self { modifiers, ..self }
    }

    /// Phantom report sent when more keys are held than fit; it carries
    /// valid modifiers but says nothing about the other keys
    pub fn is_roll_over(&self) -> bool {
        self.keycodes.iter().all(|&code| code == KeyCode::ERROR_ROLL_OVER.0)
    }
}

bitflags! {
    /// Modifier byte of a keyboard report
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
    pub struct KeyModifiers: u8 {
        /// Left Control
        const LEFT_CTRL  = 0b00000001;
        /// Left Shift
        const LEFT_SHIFT = 0b00000010;
        /// Left Alt
        const LEFT_ALT   = 0b00000100;
        /// Left GUI (Windows/Command key)
        const LEFT_GUI   = 0b00001000;
        /// Right Control
        const RIGHT_CTRL  = 0b00010000;
        /// Right Shift
        const RIGHT_SHIFT = 0b00100000;
        /// Right Alt
        const RIGHT_ALT   = 0b01000000;
        /// Right GUI (Windows/Command key)
        const RIGHT_GUI   = 0b10000000;
    }
}

impl KeyModifiers {
    /// Both Control keys; the Amiga has only one
    pub const CTRL: Self = Self::LEFT_CTRL.union(Self::RIGHT_CTRL);

    /// Either Ctrl key
    pub fn ctrl(&self) -> bool {
        self.intersects(Self::CTRL)
    }

    /// Either Shift key
    pub fn shift(&self) -> bool {
        self.intersects(Self::LEFT_SHIFT | Self::RIGHT_SHIFT)
    }

    /// Either GUI key, the Amiga keys on this side of the bridge
    pub fn gui(&self) -> bool {
        self.intersects(Self::LEFT_GUI | Self::RIGHT_GUI)
    }
}

bitflags! {
    /// Keyboard LED output report (boot protocol, one byte)
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
    pub struct KeyboardLeds: u8 {
        /// Num Lock
        const NUM_LOCK    = 0b00000001;
        /// Caps Lock
        const CAPS_LOCK   = 0b00000010;
        /// Scroll Lock
        const SCROLL_LOCK = 0b00000100;
    }
}

/// HID keyboard usage (page 0x07)
///
/// Any byte is a valid usage; only the ones the bridge names are listed.
/// Translation to Amiga scancodes lives in [`crate::keyboard::keymap`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyCode(pub u8);

impl KeyCode {
    /// Reported in every slot when too many keys are held
    pub const ERROR_ROLL_OVER: Self = Self(0x01);
    /// Letter A
    pub const A: Self = Self(0x04);
    /// Letter B
    pub const B: Self = Self(0x05);
    /// Caps Lock
    pub const CAPS_LOCK: Self = Self(0x39);

    /// Raw usage value
    pub const fn raw(&self) -> u8 {
        self.0
    }
}
