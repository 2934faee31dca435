//! Interrupt-driven bus transaction queue
//!
//! Transactions are copied into owned storage and kept in a bounded FIFO.
//! The front entry is the one in flight: enqueueing into an empty queue
//! dispatches immediately, and [`BusQueue::on_interrupt`] retires the front
//! entry and dispatches the next. Both run inside a critical section, so the
//! completion handler never sees a half-updated queue.
//!
//! The burst engine reads and writes the queue's own storage while a
//! transfer runs, so the queue must not move once something is in flight.
//! [`BusQueue::enqueue`] therefore takes `&'static self`: the queue lives in
//! a `static` on target (`new` is `const`), or is leaked in tests.
//!
//! A transfer that aborts, or ends without a stop condition, is treated as a
//! bus fault: the burst channels are stopped, the controller is brought back
//! up (clearing a stuck bus if needed) and the queue moves on. Faulted
//! transactions are not retried.

use core::cell::RefCell;

use critical_section::Mutex;
use embedded_hal::delay::DelayNs;
use heapless::{Deque, Vec};

use super::engine::{configure_rx_channel, configure_tx_channel, TransferEngine};
use super::{recovery, BusController, BusStatus, DataCmd};
use crate::config::bus::{BAUD_HZ, MAX_READ, MAX_TRANSFER, QUEUE_DEPTH, RECOVERY_CYCLES, RECOVERY_HALF_PERIOD_US};
use crate::error::{BridgeError, Result};

/// Command units for one burst transfer
pub type CommandBuffer = Vec<u16, MAX_TRANSFER>;

/// One queued write-then-read exchange
#[derive(Debug, Clone)]
pub struct Transaction {
    write: Vec<u8, MAX_TRANSFER>,
    read: Vec<u8, MAX_READ>,
}

impl Transaction {
    /// Copy `write` and reserve `read_len` bytes of read-back space
    ///
    /// Either side may be empty, but not both. The combined length must fit
    /// a single burst transfer.
    pub fn new(write: &[u8], read_len: usize) -> Result<Self> {
        if read_len > MAX_READ {
            return Err(BridgeError::ReadTooLarge);
        }

        let requested = write.len() + read_len;
        if requested > MAX_TRANSFER {
            return Err(BridgeError::TransferTooLarge { requested, max: MAX_TRANSFER });
        }
        if requested == 0 {
            return Err(BridgeError::InvalidParameter);
        }

        let write = Vec::from_slice(write).map_err(|_| BridgeError::TransferTooLarge {
            requested,
            max: MAX_TRANSFER,
        })?;
        let mut read = Vec::new();
        read.resize(read_len, 0).map_err(|_| BridgeError::ReadTooLarge)?;

        Ok(Self { write, read })
    }

    /// Bytes to write
    pub fn write(&self) -> &[u8] {
        &self.write
    }

    /// Bytes to read back
    pub fn read_len(&self) -> usize {
        self.read.len()
    }

    /// Total command units
    pub fn units(&self) -> usize {
        self.write.len() + self.read.len()
    }

    /// Encode as controller command units
    ///
    /// Write bytes go out as data units and reads as READ units. The first
    /// unit of each side carries RESTART and the very last unit carries
    /// STOP.
    pub fn encode_into(&self, out: &mut CommandBuffer) {
        out.clear();
        // lengths were bounded in new(), pushes cannot overflow
        for &byte in self.write.iter() {
            let _ = out.push(u16::from(byte));
        }
        for _ in 0..self.read.len() {
            let _ = out.push(DataCmd::READ.bits());
        }

        if let Some(first) = out.first_mut() {
            *first |= DataCmd::RESTART.bits();
        }
        if !self.read.is_empty() {
            if let Some(first_read) = out.get_mut(self.write.len()) {
                *first_read |= DataCmd::RESTART.bits();
            }
        }
        if let Some(last) = out.last_mut() {
            *last |= DataCmd::STOP.bits();
        }
    }
}

/// How a transaction ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransferOutcome {
    /// Stop condition seen, no abort
    Completed,
    /// Aborted or no stop; the bus was reinitialized
    Faulted,
}

/// A retired transaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    /// How it ended
    pub outcome: TransferOutcome,
    /// Bytes read back (unspecified contents on fault)
    pub read: Vec<u8, MAX_READ>,
}

/// Queue counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct QueueStats {
    /// Transactions handed to the burst engine
    pub dispatched: u32,
    /// Transactions retired, faulted ones included
    pub completed: u32,
    /// Transactions that ended in a bus fault
    pub faults: u32,
    /// Stuck-bus recoveries attempted
    pub recoveries: u32,
}

/// Flags of the transfer in flight, set by the completion interrupt
#[derive(Debug, Clone, Copy, Default)]
struct TransferFlags {
    stop: bool,
    abort: bool,
    reading: bool,
    writing: bool,
}

struct Inner<C, E: TransferEngine, D> {
    controller: C,
    engine: E,
    delay: D,
    tx: E::Channel,
    rx: E::Channel,
    address: u8,
    pending: Deque<Transaction, QUEUE_DEPTH>,
    commands: CommandBuffer,
    flags: TransferFlags,
    stats: QueueStats,
}

impl<C, E, D> Inner<C, E, D>
where
    C: BusController,
    E: TransferEngine,
    D: DelayNs,
{
    /// Quiesce the controller, clear a stuck bus and reconfigure it
    fn reset_bus(&mut self) {
        self.controller.set_interrupt_enabled(false);
        self.flags.stop = false;
        self.flags.abort = false;

        if recovery::is_blocked(&mut self.controller) {
            let outcome = recovery::unblock(
                &mut self.controller,
                &mut self.delay,
                RECOVERY_CYCLES,
                RECOVERY_HALF_PERIOD_US,
            );
            self.stats.recoveries += 1;

            #[cfg(feature = "defmt")]
            defmt::warn!("[bus] stuck bus, {} clock cycles, cleared: {}", outcome.cycles, outcome.cleared);
            #[cfg(not(feature = "defmt"))]
            let _ = outcome;
        }

        self.controller.configure(BAUD_HZ);
    }

    /// Route stop and abort events to the completion interrupt
    fn arm(&mut self) {
        self.controller.listen(BusStatus::STOP_DET | BusStatus::TX_ABRT);
        self.controller.set_interrupt_enabled(true);
    }

    /// Start the transaction at the front of the queue
    fn dispatch(&mut self) {
        let Some(txn) = self.pending.front_mut() else {
            return;
        };

        txn.encode_into(&mut self.commands);
        self.flags.writing = !txn.write.is_empty();
        self.flags.reading = !txn.read.is_empty();

        self.controller.set_target(self.address);
        self.flags.stop = false;
        self.flags.abort = false;

        // SAFETY: the in-flight transaction stays at the front of `pending`
        // and `commands` is only rewritten by the next dispatch, which waits
        // for this transfer's completion interrupt. A transaction can only be
        // queued through `&'static self`, so the storage never moves or drops
        // while the engine owns it.
        unsafe {
            if self.flags.reading {
                configure_rx_channel(&mut self.engine, self.rx, &mut txn.read);
            }
            configure_tx_channel(&mut self.engine, self.tx, &self.commands);
        }

        self.stats.dispatched += 1;
    }

    fn complete(&mut self) -> Option<Completion> {
        let status = self.controller.take_status();
        if status.contains(BusStatus::TX_ABRT) {
            self.flags.abort = true;
        }
        if status.contains(BusStatus::STOP_DET) {
            self.flags.stop = true;
        }

        if self.pending.is_empty() {
            #[cfg(feature = "defmt")]
            defmt::trace!("[bus] interrupt with nothing in flight");
            return None;
        }

        let outcome = if self.flags.abort || !self.flags.stop {
            #[cfg(feature = "defmt")]
            defmt::warn!("[bus] transfer fault (abort: {}, stop: {})", self.flags.abort, self.flags.stop);

            self.engine.abort(self.tx);
            if self.flags.reading {
                self.engine.abort(self.rx);
            }
            self.stats.faults += 1;

            self.reset_bus();
            self.arm();
            TransferOutcome::Faulted
        } else {
            TransferOutcome::Completed
        };

        let done = self.pending.pop_front()?;
        self.stats.completed += 1;

        if !self.pending.is_empty() {
            self.dispatch();
        }

        Some(Completion {
            outcome,
            read: done.read,
        })
    }
}

/// Transaction queue for one peripheral on the bus
///
/// On target the queue lives in a static; the controller's interrupt
/// handler calls [`BusQueue::on_interrupt`].
///
/// ```ignore
/// static DISPLAY_BUS: BusQueue<I2c1, Dma, CycleDelay> =
///     BusQueue::new(I2c1::new(), Dma::new(), CycleDelay::new(125_000_000), 0, 1, DISPLAY_ADDRESS);
///
/// DISPLAY_BUS.init(&[COMMAND_CONTROL, 0xae])?;
/// DISPLAY_BUS.enqueue(&[COMMAND_CONTROL, 0xaf], 0)?;
/// ```
pub struct BusQueue<C, E: TransferEngine, D> {
    inner: Mutex<RefCell<Inner<C, E, D>>>,
}

impl<C, E, D> BusQueue<C, E, D>
where
    C: BusController,
    E: TransferEngine,
    D: DelayNs,
{
    /// Create an empty queue targeting `address`, using channels `tx` and
    /// `rx` of `engine`
    pub const fn new(controller: C, engine: E, delay: D, tx: E::Channel, rx: E::Channel, address: u8) -> Self {
        Self {
            inner: Mutex::new(RefCell::new(Inner {
                controller,
                engine,
                delay,
                tx,
                rx,
                address,
                pending: Deque::new(),
                commands: Vec::new(),
                flags: TransferFlags {
                    stop: false,
                    abort: false,
                    reading: false,
                    writing: false,
                },
                stats: QueueStats {
                    dispatched: 0,
                    completed: 0,
                    faults: 0,
                    recoveries: 0,
                },
            })),
        }
    }

    /// Bring the bus up and check for the peripheral with a blocking write
    ///
    /// Returns [`BridgeError::DeviceAbsent`] when the check write is not
    /// acknowledged; the completion interrupt stays masked in that case.
    pub fn init(&self, presence: &[u8]) -> Result<()> {
        critical_section::with(|cs| {
            let mut inner = self.inner.borrow_ref_mut(cs);
            inner.reset_bus();

            let address = inner.address;
            if inner.controller.write_blocking(address, presence).is_err() {
                #[cfg(feature = "defmt")]
                defmt::warn!("[bus] no device at {=u8:#x}", address);
                return Err(BridgeError::DeviceAbsent);
            }

            inner.arm();

            #[cfg(feature = "defmt")]
            defmt::info!("[bus] device at {=u8:#x} ready", address);
            Ok(())
        })
    }

    /// Queue a transaction, dispatching it at once if the bus is idle
    ///
    /// The queue must be `'static`: the burst engine works directly on the
    /// queued transaction.
    pub fn enqueue(&'static self, write: &[u8], read_len: usize) -> Result<()> {
        let txn = Transaction::new(write, read_len).map_err(|err| {
            #[cfg(feature = "defmt")]
            defmt::error!("[bus] transaction rejected: {}", err);
            err
        })?;

        critical_section::with(|cs| {
            let mut inner = self.inner.borrow_ref_mut(cs);
            let idle = inner.pending.is_empty();
            inner.pending.push_back(txn).map_err(|_| BridgeError::QueueFull)?;
            if idle {
                inner.dispatch();
            }
            Ok(())
        })
    }

    /// Completion interrupt: retire the transaction in flight and start the
    /// next one
    ///
    /// Returns `None` for an interrupt with nothing in flight.
    pub fn on_interrupt(&self) -> Option<Completion> {
        critical_section::with(|cs| self.inner.borrow_ref_mut(cs).complete())
    }

    /// Re-run bus bring-up without probing
    pub fn reinitialize(&self) {
        critical_section::with(|cs| {
            let mut inner = self.inner.borrow_ref_mut(cs);
            inner.reset_bus();
            inner.arm();
        })
    }

    /// Transactions queued, in-flight one included
    pub fn depth(&self) -> usize {
        critical_section::with(|cs| self.inner.borrow_ref(cs).pending.len())
    }

    /// Nothing queued or in flight
    pub fn is_idle(&self) -> bool {
        self.depth() == 0
    }

    /// Snapshot of the counters
    pub fn stats(&self) -> QueueStats {
        critical_section::with(|cs| self.inner.borrow_ref(cs).stats)
    }

    /// Mask the completion interrupt and give back the hardware
    ///
    /// Nothing can be in flight here: queuing a transaction borrows the
    /// queue for `'static`, so a queue that ever dispatched cannot be freed.
    pub fn free(self) -> (C, E, D) {
        let mut inner = self.inner.into_inner().into_inner();
        inner.controller.set_interrupt_enabled(false);
        (inner.controller, inner.engine, inner.delay)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encoded(txn: &Transaction) -> CommandBuffer {
        let mut out = CommandBuffer::new();
        txn.encode_into(&mut out);
        out
    }

    #[test]
    fn test_write_only_units() {
        let txn = Transaction::new(&[0x80, 0xae], 0).unwrap();
        let units = encoded(&txn);
        assert_eq!(units.as_slice(), &[0x0480, 0x02ae]);
    }

    #[test]
    fn test_single_byte_carries_restart_and_stop() {
        let txn = Transaction::new(&[0x12], 0).unwrap();
        assert_eq!(encoded(&txn).as_slice(), &[0x0612]);
    }

    #[test]
    fn test_write_then_read_units() {
        let txn = Transaction::new(&[0x00], 2).unwrap();
        let units = encoded(&txn);
        assert_eq!(units.as_slice(), &[0x0400, 0x0500, 0x0300]);
    }

    #[test]
    fn test_read_only_units() {
        let txn = Transaction::new(&[], 1).unwrap();
        assert_eq!(encoded(&txn).as_slice(), &[0x0700]);
    }

    #[test]
    fn test_full_size_transfer_accepted() {
        let payload = [0u8; MAX_TRANSFER];
        let txn = Transaction::new(&payload, 0).unwrap();
        assert_eq!(txn.units(), MAX_TRANSFER);
        assert_eq!(encoded(&txn).len(), MAX_TRANSFER);
    }

    #[test]
    fn test_oversize_transfer_rejected() {
        let payload = [0u8; MAX_TRANSFER];
        assert_eq!(
            Transaction::new(&payload, 1).unwrap_err(),
            BridgeError::TransferTooLarge { requested: MAX_TRANSFER + 1, max: MAX_TRANSFER }
        );
    }

    #[test]
    fn test_read_limit() {
        assert_eq!(Transaction::new(&[], MAX_READ + 1).unwrap_err(), BridgeError::ReadTooLarge);
        assert_eq!(Transaction::new(&[], MAX_READ).unwrap().read_len(), MAX_READ);
    }

    #[test]
    fn test_empty_transaction_rejected() {
        assert_eq!(Transaction::new(&[], 0).unwrap_err(), BridgeError::InvalidParameter);
    }

    /// Controller whose transfers always end cleanly
    struct CleanBus;

    impl BusController for CleanBus {
        fn float_lines(&mut self) {}
        fn sda_is_high(&mut self) -> bool {
            true
        }
        fn scl_is_high(&mut self) -> bool {
            true
        }
        fn set_scl(&mut self, _: crate::signal::LineState) {}
        fn configure(&mut self, _: u32) {}
        fn write_blocking(&mut self, _: u8, _: &[u8]) -> Result<()> {
            Ok(())
        }
        fn listen(&mut self, _: BusStatus) {}
        fn set_interrupt_enabled(&mut self, _: bool) {}
        fn set_target(&mut self, _: u8) {}
        fn take_status(&mut self) -> BusStatus {
            BusStatus::STOP_DET
        }
    }

    /// Engine that fills reads with a marker byte
    struct FillEngine;

    impl TransferEngine for FillEngine {
        type Channel = u8;

        unsafe fn start_write(&mut self, _: u8, _: super::super::ChannelConfig, _: &[u16]) {}

        unsafe fn start_read(&mut self, _: u8, _: super::super::ChannelConfig, dest: &mut [u8]) {
            dest.fill(0x5a);
        }

        fn abort(&mut self, _: u8) {}
    }

    struct NoDelay;

    impl DelayNs for NoDelay {
        fn delay_ns(&mut self, _: u32) {}
    }

    static QUEUE: BusQueue<CleanBus, FillEngine, NoDelay> = BusQueue::new(CleanBus, FillEngine, NoDelay, 0, 1, 0x3c);

    #[test]
    fn test_queue_in_static() {
        QUEUE.init(&[0x80, 0xae]).unwrap();
        QUEUE.enqueue(&[0x80, 0xaf], 0).unwrap();
        QUEUE.enqueue(&[0x00], 2).unwrap();

        let first = QUEUE.on_interrupt().unwrap();
        assert_eq!(first.outcome, TransferOutcome::Completed);
        let second = QUEUE.on_interrupt().unwrap();
        assert_eq!(second.read.as_slice(), &[0x5a, 0x5a]);

        assert!(QUEUE.is_idle());
        assert_eq!(QUEUE.stats().dispatched, 2);
    }
}
