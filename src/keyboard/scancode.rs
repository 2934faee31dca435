//! Amiga keyboard scancodes
//!
//! Codes from the Amiga Hardware Reference Manual, keyboard chapter.
//! Key codes occupy 0x00-0x67; codes at 0x78 and above are out-of-band
//! messages from the keyboard controller rather than keys.

/// Amiga scancode
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Scancode(pub u8);

impl Scancode {
    pub const BACKTICK: Self = Self(0x00);
    pub const ONE: Self = Self(0x01);
    pub const TWO: Self = Self(0x02);
    pub const THREE: Self = Self(0x03);
    pub const FOUR: Self = Self(0x04);
    pub const FIVE: Self = Self(0x05);
    pub const SIX: Self = Self(0x06);
    pub const SEVEN: Self = Self(0x07);
    pub const EIGHT: Self = Self(0x08);
    pub const NINE: Self = Self(0x09);
    pub const ZERO: Self = Self(0x0a);
    pub const DASH: Self = Self(0x0b);
    pub const EQUALS: Self = Self(0x0c);
    pub const BACKSLASH: Self = Self(0x0d);
    pub const KP_0: Self = Self(0x0f);
    pub const Q: Self = Self(0x10);
    pub const W: Self = Self(0x11);
    pub const E: Self = Self(0x12);
    pub const R: Self = Self(0x13);
    pub const T: Self = Self(0x14);
    pub const Y: Self = Self(0x15);
    pub const U: Self = Self(0x16);
    pub const I: Self = Self(0x17);
    pub const O: Self = Self(0x18);
    pub const P: Self = Self(0x19);
    pub const LEFT_BRACKET: Self = Self(0x1a);
    pub const RIGHT_BRACKET: Self = Self(0x1b);
    pub const KP_1: Self = Self(0x1d);
    pub const KP_2: Self = Self(0x1e);
    pub const KP_3: Self = Self(0x1f);
    pub const A: Self = Self(0x20);
    pub const S: Self = Self(0x21);
    pub const D: Self = Self(0x22);
    pub const F: Self = Self(0x23);
    pub const G: Self = Self(0x24);
    pub const H: Self = Self(0x25);
    pub const J: Self = Self(0x26);
    pub const K: Self = Self(0x27);
    pub const L: Self = Self(0x28);
    pub const SEMICOLON: Self = Self(0x29);
    pub const QUOTE: Self = Self(0x2a);
    /// International keyboards only
    pub const INTL_RETURN: Self = Self(0x2b);
    pub const KP_4: Self = Self(0x2d);
    pub const KP_5: Self = Self(0x2e);
    pub const KP_6: Self = Self(0x2f);
    /// International keyboards only
    pub const INTL_SHIFT: Self = Self(0x30);
    pub const Z: Self = Self(0x31);
    pub const X: Self = Self(0x32);
    pub const C: Self = Self(0x33);
    pub const V: Self = Self(0x34);
    pub const B: Self = Self(0x35);
    pub const N: Self = Self(0x36);
    pub const M: Self = Self(0x37);
    pub const COMMA: Self = Self(0x38);
    pub const PERIOD: Self = Self(0x39);
    pub const SLASH: Self = Self(0x3a);
    pub const KP_PERIOD: Self = Self(0x3c);
    pub const KP_7: Self = Self(0x3d);
    pub const KP_8: Self = Self(0x3e);
    pub const KP_9: Self = Self(0x3f);
    pub const SPACE: Self = Self(0x40);
    pub const BACKSPACE: Self = Self(0x41);
    pub const TAB: Self = Self(0x42);
    pub const KP_ENTER: Self = Self(0x43);
    pub const RETURN: Self = Self(0x44);
    pub const ESCAPE: Self = Self(0x45);
    pub const DELETE: Self = Self(0x46);
    pub const KP_MINUS: Self = Self(0x4a);
    pub const UP: Self = Self(0x4c);
    pub const DOWN: Self = Self(0x4d);
    pub const RIGHT: Self = Self(0x4e);
    pub const LEFT: Self = Self(0x4f);
    pub const F1: Self = Self(0x50);
    pub const F2: Self = Self(0x51);
    pub const F3: Self = Self(0x52);
    pub const F4: Self = Self(0x53);
    pub const F5: Self = Self(0x54);
    pub const F6: Self = Self(0x55);
    pub const F7: Self = Self(0x56);
    pub const F8: Self = Self(0x57);
    pub const F9: Self = Self(0x58);
    pub const F10: Self = Self(0x59);
    pub const KP_OPEN_PAREN: Self = Self(0x5a);
    pub const KP_CLOSE_PAREN: Self = Self(0x5b);
    pub const KP_SLASH: Self = Self(0x5c);
    pub const KP_ASTERISK: Self = Self(0x5d);
    pub const KP_PLUS: Self = Self(0x5e);
    pub const HELP: Self = Self(0x5f);

    // Modifiers
    pub const LEFT_SHIFT: Self = Self(0x60);
    pub const RIGHT_SHIFT: Self = Self(0x61);
    pub const CAPS_LOCK: Self = Self(0x62);
    pub const CTRL: Self = Self(0x63);
    pub const LEFT_ALT: Self = Self(0x64);
    pub const RIGHT_ALT: Self = Self(0x65);
    pub const LEFT_AMIGA: Self = Self(0x66);
    pub const RIGHT_AMIGA: Self = Self(0x67);

    // Out-of-band controller messages
    /// Reset warning
    pub const RESET_WARNING: Self = Self(0x78);
    /// Keyboard lost sync with the computer
    pub const LOST_SYNC: Self = Self(0xf9);
    /// Keyboard output buffer overflow
    pub const BUFFER_OVERFLOW: Self = Self(0xfa);
    /// Keyboard self-test failed
    pub const SELF_TEST_FAILED: Self = Self(0xfc);
    /// Power-up key stream starts
    pub const INIT_POWER: Self = Self(0xfd);
    /// Power-up key stream ends
    pub const TERM_POWER: Self = Self(0xfe);
    /// No Amiga equivalent; never transmitted
    pub const UNKNOWN: Self = Self(0xff);

    /// Get raw scancode value
    pub const fn raw(self) -> u8 {
        self.0
    }

    /// Is this the untransmittable sentinel
    pub const fn is_unknown(self) -> bool {
        self.0 == Self::UNKNOWN.0
    }

    /// Out-of-band codes carry no up/down state on the wire
    pub const fn is_out_of_band(self) -> bool {
        self.0 & 0x80 != 0
    }
}

/// Direction of a key event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum KeyDirection {
    /// Key went down
    Pressed,
    /// Key came up
    Released,
}

impl KeyDirection {
    /// Released when `up` is true
    pub const fn from_up(up: bool) -> Self {
        if up {
            Self::Released
        } else {
            Self::Pressed
        }
    }

    /// True for [`KeyDirection::Released`]
    pub const fn is_release(self) -> bool {
        matches!(self, Self::Released)
    }
}

/// Encode a key event as the 8-bit value clocked onto the wire
///
/// The up/down flag goes into bit 7, then the whole byte is rolled left so
/// that flag lands in bit 0, which is where the computer expects it.
/// Out-of-band codes (bit 7 already set) always carry a 1 in bit 0.
pub const fn wire_value(code: Scancode, direction: KeyDirection) -> u8 {
    let up = direction.is_release();
    let flagged = code.0 | if up { 0x80 } else { 0x00 };
    let mut value = flagged << 1;
    if up || code.is_out_of_band() {
        value |= 1;
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_press_release_low_bit() {
        assert_eq!(wire_value(Scancode::A, KeyDirection::Pressed), 0x40);
        assert_eq!(wire_value(Scancode::A, KeyDirection::Released), 0x41);
        assert_eq!(wire_value(Scancode::CTRL, KeyDirection::Pressed), 0xc6);
        assert_eq!(wire_value(Scancode::CTRL, KeyDirection::Released), 0xc7);
    }

    #[test]
    fn test_out_of_band_codes() {
        assert_eq!(wire_value(Scancode::INIT_POWER, KeyDirection::Pressed), 0xfb);
        assert_eq!(wire_value(Scancode::TERM_POWER, KeyDirection::Pressed), 0xfd);
        assert!(Scancode::LOST_SYNC.is_out_of_band());
        assert!(!Scancode::RIGHT_AMIGA.is_out_of_band());
    }

    #[test]
    fn test_direction_differs_for_every_key() {
        for raw in 0x00..=0x7f_u8 {
            let down = wire_value(Scancode(raw), KeyDirection::Pressed);
            let up = wire_value(Scancode(raw), KeyDirection::Released);
            assert_eq!(down & 1, 0);
            assert_eq!(up & 1, 1);
        }
    }
}
