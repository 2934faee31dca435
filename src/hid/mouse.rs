//! HID mouse support
//!
//! Implements HID Boot Protocol mouse reports (USB HID Spec 1.11, Appendix B.2)

use crate::error::{BridgeError, Result};
use bitflags::bitflags;

/// Boot protocol mouse report
///
/// Button bits followed by signed X and Y deltas. Wheel and pan bytes that some mice append are ignored; the Amiga mouse
/// port has no use for them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MouseReport {
    /// Buttons held
    pub buttons: MouseButtons,
    /// Rightward motion since the last report
    pub x: i8,
    /// Downward motion since the last report
    pub y: i8,
}

impl MouseReport {
    /// Minimum report length in bytes
    pub const MIN_LEN: usize = 3;

    /// Parse report from raw data
    ///
    /// ```
    /// use amigahid::hid::MouseReport;
    ///
    /// let report = MouseReport::parse(&[0x01, 0x05, 0xfb]).unwrap();
    /// assert!(report.buttons.left());
    /// assert_eq!((report.x, report.y), (5, -5));
    /// ```
    pub fn parse(data: &[u8]) -> Result<Self> {
        if data.len() < Self::MIN_LEN {
            return Err(BridgeError::InvalidReport);
        }

        Ok(Self {
            buttons: MouseButtons::from_bits_truncate(data[0]),
            x: data[1] as i8,
            y: data[2] as i8,
        })
    }

    /// Nonzero motion on either axis
    pub fn has_movement(&self) -> bool {
        self.x != 0 || self.y != 0
    }
}

bitflags! {
    /// Button byte of a mouse report
    ///
    /// Only the three boot protocol buttons reach the Amiga; higher bits are
    /// dropped on parse.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
    pub struct MouseButtons: u8 {
        /// Primary
        const LEFT = 1 << 0;
        /// Secondary
        const RIGHT = 1 << 1;
        /// Tertiary, usually the wheel click
        const MIDDLE = 1 << 2;
    }
}

impl MouseButtons {
    /// Left held
    pub fn left(&self) -> bool {
        self.contains(Self::LEFT)
    }

    /// Right held
    pub fn right(&self) -> bool {
        self.contains(Self::RIGHT)
    }

    /// Middle held
    pub fn middle(&self) -> bool {
        self.contains(Self::MIDDLE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_with_wheel_byte() {
        let report = MouseReport::parse(&[0x1e, 0x80, 0x7f, 0x01]).unwrap();
        assert!(report.buttons.right());
        assert!(report.buttons.middle());
        assert!(!report.buttons.left());
        // side buttons are dropped
        assert_eq!(report.buttons, MouseButtons::RIGHT | MouseButtons::MIDDLE);
        assert_eq!(report.x, -128);
        assert_eq!(report.y, 127);
    }

    #[test]
    fn test_short_report_rejected() {
        assert_eq!(MouseReport::parse(&[0x01, 0x00]), Err(BridgeError::InvalidReport));
    }

    #[test]
    fn test_buttons_only_report_has_no_movement() {
        let report = MouseReport::parse(&[0x01, 0x00, 0x00]).unwrap();
        assert!(!report.has_movement());
    }
}
