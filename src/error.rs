//! Bridge error types

use core::fmt;

/// Bridge operation result type
pub type Result<T> = core::result::Result<T, BridgeError>;

/// Bridge error types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BridgeError {
    /// Scancode has no Amiga equivalent and must not be put on the wire
    UnknownScancode,
    /// Combined write and read length exceeds a single burst transfer
    TransferTooLarge {
        /// Units requested (write + read)
        requested: usize,
        /// Maximum units per transfer
        max: usize,
    },
    /// Read length exceeds the per-transaction read buffer
    ReadTooLarge,
    /// Transaction queue has no free slots
    QueueFull,
    /// Peripheral did not acknowledge its presence check
    DeviceAbsent,
    /// Bus transfer aborted or finished without a stop condition
    BusFault,
    /// Invalid parameter
    InvalidParameter,
    /// HID report too short for its declared device class
    InvalidReport,
}

impl fmt::Display for BridgeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownScancode => write!(f, "Unknown scancode"),
            Self::TransferTooLarge { requested, max } => {
                write!(f, "Transfer too large ({} > {})", requested, max)
            }
            Self::ReadTooLarge => write!(f, "Read length too large"),
            Self::QueueFull => write!(f, "Transaction queue full"),
            Self::DeviceAbsent => write!(f, "Device absent"),
            Self::BusFault => write!(f, "Bus fault"),
            Self::InvalidParameter => write!(f, "Invalid parameter"),
            Self::InvalidReport => write!(f, "Invalid HID report"),
        }
    }
}
