//! HID protocol constants
//!
//! Standard constants from USB HID Specification 1.11

/// HID device class code
pub const HID_CLASS: u8 = 0x03;

/// HID interface protocol codes (boot interface subclass)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum HidProtocol {
    /// No protocol
    None = 0x00,
    /// Keyboard protocol
    Keyboard = 0x01,
    /// Mouse protocol
    Mouse = 0x02,
}

/// What kind of device an interface is, as far as the bridge cares
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DeviceClass {
    /// Neither a boot keyboard nor a boot mouse
    Unknown,
    /// Boot protocol keyboard
    Keyboard,
    /// Boot protocol mouse
    Mouse,
}

impl DeviceClass {
    /// Classify by the interface protocol byte
    pub const fn from_protocol(protocol: u8) -> Self {
        match protocol {
            p if p == HidProtocol::Keyboard as u8 => Self::Keyboard,
            p if p == HidProtocol::Mouse as u8 => Self::Mouse,
            _ => Self::Unknown,
        }
    }
}

impl From<HidProtocol> for DeviceClass {
    fn from(protocol: HidProtocol) -> Self {
        Self::from_protocol(protocol as u8)
    }
}
