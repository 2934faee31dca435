//! HID usage to Amiga scancode translation (US layout)

use super::scancode::Scancode;
use crate::hid::KeyModifiers;

const UNK: Scancode = Scancode::UNKNOWN;

/// HID keyboard usage (page 0x07) to Amiga scancode
///
/// Keys the Amiga lacks (F11, F12, print screen, etc.) map to
/// [`Scancode::UNKNOWN`] and are dropped by the transmitter. Insert maps to
/// HELP and the application (menu) key to right Amiga.
static HID_TO_AMIGA: [Scancode; 256] = {
    let mut map = [UNK; 256];

    map[0x04] = Scancode::A;
    map[0x05] = Scancode::B;
    map[0x06] = Scancode::C;
    map[0x07] = Scancode::D;
    map[0x08] = Scancode::E;
    map[0x09] = Scancode::F;
    map[0x0a] = Scancode::G;
    map[0x0b] = Scancode::H;
    map[0x0c] = Scancode::I;
    map[0x0d] = Scancode::J;
    map[0x0e] = Scancode::K;
    map[0x0f] = Scancode::L;
    map[0x10] = Scancode::M;
    map[0x11] = Scancode::N;
    map[0x12] = Scancode::O;
    map[0x13] = Scancode::P;
    map[0x14] = Scancode::Q;
    map[0x15] = Scancode::R;
    map[0x16] = Scancode::S;
    map[0x17] = Scancode::T;
    map[0x18] = Scancode::U;
    map[0x19] = Scancode::V;
    map[0x1a] = Scancode::W;
    map[0x1b] = Scancode::X;
    map[0x1c] = Scancode::Y;
    map[0x1d] = Scancode::Z;

    map[0x1e] = Scancode::ONE;
    map[0x1f] = Scancode::TWO;
    map[0x20] = Scancode::THREE;
    map[0x21] = Scancode::FOUR;
    map[0x22] = Scancode::FIVE;
    map[0x23] = Scancode::SIX;
    map[0x24] = Scancode::SEVEN;
    map[0x25] = Scancode::EIGHT;
    map[0x26] = Scancode::NINE;
    map[0x27] = Scancode::ZERO;

    map[0x28] = Scancode::RETURN;
    map[0x29] = Scancode::ESCAPE;
    map[0x2a] = Scancode::BACKSPACE;
    map[0x2b] = Scancode::TAB;
    map[0x2c] = Scancode::SPACE;
    map[0x2d] = Scancode::DASH;
    map[0x2e] = Scancode::EQUALS;
    map[0x2f] = Scancode::LEFT_BRACKET;
    map[0x30] = Scancode::RIGHT_BRACKET;
    map[0x31] = Scancode::BACKSLASH;
    map[0x32] = Scancode::INTL_RETURN;
    map[0x33] = Scancode::SEMICOLON;
    map[0x34] = Scancode::QUOTE;
    map[0x35] = Scancode::BACKTICK;
    map[0x36] = Scancode::COMMA;
    map[0x37] = Scancode::PERIOD;
    map[0x38] = Scancode::SLASH;
    map[0x39] = Scancode::CAPS_LOCK;

    map[0x3a] = Scancode::F1;
    map[0x3b] = Scancode::F2;
    map[0x3c] = Scancode::F3;
    map[0x3d] = Scancode::F4;
    map[0x3e] = Scancode::F5;
    map[0x3f] = Scancode::F6;
    map[0x40] = Scancode::F7;
    map[0x41] = Scancode::F8;
    map[0x42] = Scancode::F9;
    map[0x43] = Scancode::F10;

    map[0x49] = Scancode::HELP;
    map[0x4c] = Scancode::DELETE;
    map[0x4f] = Scancode::RIGHT;
    map[0x50] = Scancode::LEFT;
    map[0x51] = Scancode::DOWN;
    map[0x52] = Scancode::UP;

    map[0x54] = Scancode::KP_SLASH;
    map[0x55] = Scancode::KP_ASTERISK;
    map[0x56] = Scancode::KP_MINUS;
    map[0x57] = Scancode::KP_PLUS;
    map[0x58] = Scancode::KP_ENTER;
    map[0x59] = Scancode::KP_1;
    map[0x5a] = Scancode::KP_2;
    map[0x5b] = Scancode::KP_3;
    map[0x5c] = Scancode::KP_4;
    map[0x5d] = Scancode::KP_5;
    map[0x5e] = Scancode::KP_6;
    map[0x5f] = Scancode::KP_7;
    map[0x60] = Scancode::KP_8;
    map[0x61] = Scancode::KP_9;
    map[0x62] = Scancode::KP_0;
    map[0x63] = Scancode::KP_PERIOD;
    map[0x64] = Scancode::BACKSLASH;
    map[0x65] = Scancode::RIGHT_AMIGA;

    map
};

/// Modifier bits in the order they are checked, with their Amiga key
///
/// Both control keys share the single Amiga CTRL key; the HID bridge merges
/// them before they reach this table, so only the left bit appears.
pub const MODIFIER_KEYS: [(KeyModifiers, Scancode); 7] = [
    (KeyModifiers::LEFT_CTRL, Scancode::CTRL),
    (KeyModifiers::LEFT_ALT, Scancode::LEFT_ALT),
    (KeyModifiers::RIGHT_ALT, Scancode::RIGHT_ALT),
    (KeyModifiers::LEFT_SHIFT, Scancode::LEFT_SHIFT),
    (KeyModifiers::RIGHT_SHIFT, Scancode::RIGHT_SHIFT),
    (KeyModifiers::LEFT_GUI, Scancode::LEFT_AMIGA),
    (KeyModifiers::RIGHT_GUI, Scancode::RIGHT_AMIGA),
];

/// Translate a HID keyboard usage
#[inline]
pub fn from_hid(usage: u8) -> Scancode {
    HID_TO_AMIGA[usage as usize]
}
