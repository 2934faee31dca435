//! Display bus (I2C) driven by burst transfers
//!
//! The display sits on an I2C controller whose transmit FIFO accepts 16-bit
//! command units: the low byte is data, the upper bits say whether to read,
//! restart or stop. Whole transactions are streamed into the FIFO by the DMA
//! engine, and the controller raises an interrupt when the transfer stops or
//! aborts.
//!
//! # Components
//!
//! - [`BusController`] - the I2C controller and its two pins
//! - [`engine`] - DMA channel configuration for one transfer
//! - [`recovery`] - freeing a bus held low by a confused peripheral
//! - [`queue`] - FIFO of transactions, one in flight, completed by interrupt

pub mod engine;
pub mod queue;
pub mod recovery;

pub use engine::{ChannelConfig, TransferEngine, TransferSize, TransferTrigger};
pub use queue::{BusQueue, Completion, QueueStats, Transaction, TransferOutcome};

use crate::error::Result;
use crate::signal::LineState;
use bitflags::bitflags;

bitflags! {
    /// Controller interrupt status (and mask) bits
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
    pub struct BusStatus: u32 {
        /// Receive FIFO under-run
        const RX_UNDER = 1 << 0;
        /// Receive FIFO over-run
        const RX_OVER  = 1 << 2;
        /// Transmit abort: NACK, arbitration loss or similar
        const TX_ABRT  = 1 << 6;
        /// Stop condition seen on the bus
        const STOP_DET = 1 << 9;
    }
}

bitflags! {
    /// Control bits of a 16-bit command unit
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct DataCmd: u16 {
        /// Read a byte instead of writing the data byte
        const READ    = 1 << 8;
        /// Issue a stop after this unit
        const STOP    = 1 << 9;
        /// Issue a (re)start before this unit
        const RESTART = 1 << 10;
    }
}

/// I2C controller and its pins
///
/// The bus-recovery methods work on the raw pins with the controller
/// detached; [`BusController::configure`] hands them back to the controller.
pub trait BusController {
    /// Detach both pins from the controller and float them as inputs
    fn float_lines(&mut self);

    /// Level of the data line
    fn sda_is_high(&mut self) -> bool;

    /// Level of the clock line
    fn scl_is_high(&mut self) -> bool;

    /// Drive or release the clock line while detached
    fn set_scl(&mut self, state: LineState);

    /// Reset the controller, set the bus clock and claim the pins with
    /// pull-ups enabled
    fn configure(&mut self, baud_hz: u32);

    /// Blocking write, used before interrupts are wired up
    fn write_blocking(&mut self, address: u8, bytes: &[u8]) -> Result<()>;

    /// Select which controller events raise the interrupt
    fn listen(&mut self, events: BusStatus);

    /// Mask or unmask the controller interrupt line
    fn set_interrupt_enabled(&mut self, enabled: bool);

    /// Retarget the controller (disable, set address, enable)
    fn set_target(&mut self, address: u8);

    /// Read interrupt status; reporting a bit clears it
    fn take_status(&mut self) -> BusStatus;
}
