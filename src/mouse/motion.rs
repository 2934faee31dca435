//! Motion vector handoff between the event context and the encoder loop
//!
//! One writer (the HID report handler) and one reader (the encoder). The
//! pending vector and its pending flag share a single atomic word: the
//! reader always sees an (x, y) pair written together, and taking the
//! vector clears the flag in the same operation, so a vector published
//! while the reader takes the previous one is never lost.

use crate::config::DEFAULT_MOTION_DIVISOR;
use core::sync::atomic::{AtomicU32, AtomicU8, Ordering};

/// Relative motion in encoder units
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MotionVector {
    /// Horizontal delta, positive to the right
    pub dx: i8,
    /// Vertical delta, positive downwards
    pub dy: i8,
}

impl MotionVector {
    /// Build a vector
    pub const fn new(dx: i8, dy: i8) -> Self {
        Self { dx, dy }
    }

    /// No motion on either axis
    pub const fn is_zero(&self) -> bool {
        self.dx == 0 && self.dy == 0
    }

    const fn pack(self) -> u32 {
        ((self.dx as u8 as u32) << 8) | self.dy as u8 as u32
    }

    const fn unpack(raw: u32) -> Self {
        Self {
            dx: (raw >> 8) as u8 as i8,
            dy: raw as u8 as i8,
        }
    }
}

/// Set in the mailbox word while a vector is waiting
const PENDING: u32 = 1 << 16;

/// Single-producer, single-consumer motion mailbox
pub struct MotionHandoff {
    /// Packed vector in the low 16 bits, [`PENDING`] above it
    slot: AtomicU32,
    divisor: AtomicU8,
}

impl MotionHandoff {
    /// Create an empty mailbox (const-compatible, suitable for a `static`)
    pub const fn new() -> Self {
        Self {
            slot: AtomicU32::new(0),
            divisor: AtomicU8::new(DEFAULT_MOTION_DIVISOR),
        }
    }

    /// Publish a new vector, replacing any not yet consumed
    pub fn publish(&self, vector: MotionVector) {
        self.slot.store(vector.pack() | PENDING, Ordering::Release);
    }

    /// Take the pending vector, leaving zero motion behind
    pub fn take(&self) -> MotionVector {
        MotionVector::unpack(self.slot.swap(0, Ordering::AcqRel))
    }

    /// A vector was published since the last [`MotionHandoff::take`]
    pub fn is_pending(&self) -> bool {
        self.slot.load(Ordering::Acquire) & PENDING != 0
    }

    /// Units of motion per phase transition
    pub fn divisor(&self) -> u8 {
        self.divisor.load(Ordering::Relaxed)
    }

    /// Change the motion divisor; zero is treated as one
    pub fn set_divisor(&self, divisor: u8) {
        self.divisor.store(divisor.max(1), Ordering::Relaxed);
    }
}

impl Default for MotionHandoff {
    fn default() -> Self {
        Self::new()
    }
}
