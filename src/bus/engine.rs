//! Burst transfer (DMA) channel setup
//!
//! One channel feeds command units into the controller's FIFO; a second
//! drains received bytes when the transaction reads. Each is paced by the
//! controller's request line, so no CPU involvement per byte.

/// Element width of one channel beat
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransferSize {
    /// 8-bit
    Byte,
    /// 16-bit
    HalfWord,
    /// 32-bit
    Word,
}

/// Request line pacing a channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransferTrigger {
    /// Controller transmit FIFO has room
    BusTx,
    /// Controller receive FIFO has data
    BusRx,
}

/// Channel programming for one transfer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChannelConfig {
    /// Step the source address after each beat
    pub read_increment: bool,
    /// Step the destination address after each beat
    pub write_increment: bool,
    /// Beat width
    pub size: TransferSize,
    /// Pacing request
    pub trigger: TransferTrigger,
}

impl ChannelConfig {
    /// Memory to controller FIFO, 16-bit command units
    pub const TX: Self = Self {
        read_increment: true,
        write_increment: false,
        size: TransferSize::HalfWord,
        trigger: TransferTrigger::BusTx,
    };

    /// Controller FIFO to memory, bytes
    pub const RX: Self = Self {
        read_increment: false,
        write_increment: true,
        size: TransferSize::Byte,
        trigger: TransferTrigger::BusRx,
    };
}

/// DMA engine with channels already claimed for the bus
pub trait TransferEngine {
    /// Channel identifier
    type Channel: Copy;

    /// Program `channel` to copy `source` into the controller FIFO and start it
    ///
    /// # Safety
    ///
    /// `source` must stay valid and unmodified until the transfer completes
    /// or is aborted; the hardware keeps reading it after this returns.
    unsafe fn start_write(&mut self, channel: Self::Channel, config: ChannelConfig, source: &[u16]);

    /// Program `channel` to fill `dest` from the controller FIFO and start it
    ///
    /// # Safety
    ///
    /// `dest` must stay valid and must not be accessed until the transfer
    /// completes or is aborted.
    unsafe fn start_read(&mut self, channel: Self::Channel, config: ChannelConfig, dest: &mut [u8]);

    /// Stop `channel`, discarding whatever is left
    fn abort(&mut self, channel: Self::Channel);
}

/// Start the transmit side of a transaction
///
/// # Safety
///
/// See [`TransferEngine::start_write`].
pub unsafe fn configure_tx_channel<E: TransferEngine>(engine: &mut E, channel: E::Channel, units: &[u16]) {
    unsafe { engine.start_write(channel, ChannelConfig::TX, units) }
}

/// Start the receive side of a transaction
///
/// # Safety
///
/// See [`TransferEngine::start_read`].
pub unsafe fn configure_rx_channel<E: TransferEngine>(engine: &mut E, channel: E::Channel, dest: &mut [u8]) {
    unsafe { engine.start_read(channel, ChannelConfig::RX, dest) }
}
