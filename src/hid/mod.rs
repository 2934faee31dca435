//! HID (Human Interface Device) support
//!
//! Boot protocol report parsing for keyboards and mice, and the bridge that
//! turns those reports into Amiga keyboard frames and mouse port activity.
//!
//! # Boot Protocol
//!
//! - Fixed report format (8 bytes for keyboard, 3+ bytes for mouse)
//! - Works with any boot-compatible HID device
//! - No report descriptor parsing needed
//!
//! # Example
//!
//! ```
//! use amigahid::hid::{ButtonSink, DeviceClass, HidBridge, KeySink};
//! use amigahid::keyboard::{KeyDirection, Scancode};
//! use amigahid::mouse::{MotionHandoff, MouseButton};
//!
//! struct Keys;
//! impl KeySink for Keys {
//!     fn send(&mut self, _: Scancode, _: KeyDirection) -> amigahid::Result<()> { Ok(()) }
//!     fn is_caps_lock_on(&self) -> bool { false }
//! }
//! struct Buttons;
//! impl ButtonSink for Buttons {
//!     fn set(&mut self, _: MouseButton, _: bool) {}
//! }
//!
//! static MOTION: MotionHandoff = MotionHandoff::new();
//!
//! let mut bridge = HidBridge::new(Keys, Buttons, &MOTION);
//! bridge.on_mount(DeviceClass::from_protocol(2));
//! bridge.on_report(DeviceClass::Mouse, &[0x00, 0x05, 0x00])?;
//! assert!(MOTION.is_pending());
//! # Ok::<(), amigahid::BridgeError>(())
//! ```
//!
//! # Reference
//!
//! - USB HID Specification 1.11: <https://www.usb.org/document-library/device-class-definition-hid-111>
//! - HID Usage Tables 1.5: <https://usb.org/document-library/hid-usage-tables-15>

pub mod bridge;
pub mod constants;
pub mod keyboard;
pub mod mouse;

pub use bridge::{ButtonSink, HidBridge, KeySink};
pub use constants::*;
pub use keyboard::{KeyCode, KeyModifiers, KeyboardLeds, KeyboardReport};
pub use mouse::{MouseButtons, MouseReport};
