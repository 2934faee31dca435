//! Mock hardware for testing without a board
//!
//! Provides recording open-drain lines, a recording delay, a scripted I2C
//! controller and a recording DMA engine. Everything records into shared
//! logs so a test can hand the mocks to the driver and still inspect what
//! happened afterwards.

#![allow(dead_code)]

use std::boxed::Box;
use std::cell::RefCell;
use std::convert::Infallible;
use std::rc::Rc;
use std::vec::Vec;

use amigahid::bus::{BusController, BusStatus, ChannelConfig, TransferEngine};
use amigahid::signal::LineState;
use amigahid::{BridgeError, Result};
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorType, OutputPin};

/// Every line the bridge drives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Line {
    KbdClock,
    KbdData,
    KbdReset,
    MouseH,
    MouseHq,
    MouseV,
    MouseVq,
    Button1,
    Button2,
    Button3,
}

/// One recorded hardware event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// Line driven: `true` = asserted (low), `false` = released
    Drive(Line, bool),
    /// Busy wait
    DelayNs(u32),
}

/// Shared event log
#[derive(Clone, Default)]
pub struct Recorder(Rc<RefCell<Vec<Event>>>);

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, event: Event) {
        self.0.borrow_mut().push(event);
    }

    pub fn events(&self) -> Vec<Event> {
        self.0.borrow().clone()
    }

    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }

    /// Create a line recording into this log
    pub fn pin(&self, line: Line) -> MockPin {
        MockPin {
            line,
            log: self.clone(),
        }
    }

    /// Create a delay recording into this log
    pub fn delay(&self) -> MockDelay<'static> {
        MockDelay {
            log: self.clone(),
            hook: None,
        }
    }

    /// Last driven state of `line`, if it was ever driven
    pub fn level(&self, line: Line) -> Option<bool> {
        self.0.borrow().iter().rev().find_map(|event| match *event {
            Event::Drive(l, asserted) if l == line => Some(asserted),
            _ => None,
        })
    }

    /// Number of times `line` was driven to a different state than before
    ///
    /// The first drive of a line counts as a change from released.
    pub fn transitions(&self, line: Line) -> usize {
        let mut state = false;
        let mut count = 0;
        for event in self.0.borrow().iter() {
            if let Event::Drive(l, asserted) = *event {
                if l == line && asserted != state {
                    state = asserted;
                    count += 1;
                }
            }
        }
        count
    }

    /// Times `line` was asserted
    pub fn assertions(&self, line: Line) -> usize {
        self.0
            .borrow()
            .iter()
            .filter(|event| **event == Event::Drive(line, true))
            .count()
    }

    /// Total recorded delay
    pub fn total_delay_ns(&self) -> u64 {
        self.0
            .borrow()
            .iter()
            .map(|event| match *event {
                Event::DelayNs(ns) => u64::from(ns),
                _ => 0,
            })
            .sum()
    }

    /// Decode keyboard frames: the data line is sampled on every clock
    /// assertion (asserted data = 1), eight samples per byte, MSB first
    pub fn keyboard_frames(&self) -> Vec<u8> {
        let mut frames = Vec::new();
        let mut data = false;
        let mut byte = 0u8;
        let mut bits = 0;

        for event in self.0.borrow().iter() {
            match *event {
                Event::Drive(Line::KbdData, asserted) => data = asserted,
                Event::Drive(Line::KbdClock, true) => {
                    byte = (byte << 1) | u8::from(data);
                    bits += 1;
                    if bits == 8 {
                        frames.push(byte);
                        byte = 0;
                        bits = 0;
                    }
                }
                _ => {}
            }
        }

        frames
    }
}

/// Open-drain output that logs every drive
pub struct MockPin {
    line: Line,
    log: Recorder,
}

impl ErrorType for MockPin {
    type Error = Infallible;
}

impl OutputPin for MockPin {
    fn set_low(&mut self) -> core::result::Result<(), Self::Error> {
        self.log.push(Event::Drive(self.line, true));
        Ok(())
    }

    fn set_high(&mut self) -> core::result::Result<(), Self::Error> {
        self.log.push(Event::Drive(self.line, false));
        Ok(())
    }
}

/// Delay that logs instead of waiting, optionally running a hook each time
pub struct MockDelay<'a> {
    log: Recorder,
    hook: Option<Box<dyn FnMut() + 'a>>,
}

impl<'a> MockDelay<'a> {
    /// Run `hook` after every recorded delay
    pub fn with_hook<'b>(self, hook: impl FnMut() + 'b) -> MockDelay<'b> {
        MockDelay {
            log: self.log,
            hook: Some(Box::new(hook)),
        }
    }
}

impl DelayNs for MockDelay<'_> {
    fn delay_ns(&mut self, ns: u32) {
        self.log.push(Event::DelayNs(ns));
        if let Some(hook) = self.hook.as_mut() {
            hook();
        }
    }
}

/// Observable state of the mock I2C controller
#[derive(Debug, Default)]
pub struct BusState {
    /// SDA stays low for this many more SCL pulses
    pub sda_stuck_pulses: u8,
    /// SCL reads low while floating
    pub scl_stuck: bool,
    /// Presence writes are not acknowledged
    pub absent: bool,
    /// Status reported by the next `take_status`
    pub status: BusStatus,
    /// Lines currently detached and floating
    pub floating: bool,
    /// SCL pulses issued during recovery
    pub scl_pulses: u32,
    /// Baud rates passed to `configure`, in order
    pub configured: Vec<u32>,
    /// Blocking writes (address, bytes)
    pub blocking_writes: Vec<(u8, Vec<u8>)>,
    /// Addresses passed to `set_target`
    pub targets: Vec<u8>,
    /// Last interrupt mask
    pub listening: BusStatus,
    /// Interrupt line unmasked
    pub interrupt_enabled: bool,
    /// SCL currently held low by recovery
    scl_low: bool,
}

/// Scripted I2C controller
pub struct MockBusController {
    pub state: Rc<RefCell<BusState>>,
}

impl MockBusController {
    pub fn new() -> (Self, Rc<RefCell<BusState>>) {
        let state = Rc::new(RefCell::new(BusState::default()));
        (Self { state: state.clone() }, state)
    }
}

impl BusController for MockBusController {
    fn float_lines(&mut self) {
        self.state.borrow_mut().floating = true;
    }

    fn sda_is_high(&mut self) -> bool {
        self.state.borrow().sda_stuck_pulses == 0
    }

    fn scl_is_high(&mut self) -> bool {
        let state = self.state.borrow();
        !state.scl_stuck && !state.scl_low
    }

    fn set_scl(&mut self, line: LineState) {
        let mut state = self.state.borrow_mut();
        match line {
            LineState::Asserted => state.scl_low = true,
            LineState::Released => {
                if state.scl_low {
                    state.scl_pulses += 1;
                    state.sda_stuck_pulses = state.sda_stuck_pulses.saturating_sub(1);
                }
                state.scl_low = false;
            }
        }
    }

    fn configure(&mut self, baud_hz: u32) {
        let mut state = self.state.borrow_mut();
        state.floating = false;
        state.configured.push(baud_hz);
    }

    fn write_blocking(&mut self, address: u8, bytes: &[u8]) -> Result<()> {
        let mut state = self.state.borrow_mut();
        state.blocking_writes.push((address, bytes.to_vec()));
        if state.absent {
            Err(BridgeError::BusFault)
        } else {
            Ok(())
        }
    }

    fn listen(&mut self, events: BusStatus) {
        self.state.borrow_mut().listening = events;
    }

    fn set_interrupt_enabled(&mut self, enabled: bool) {
        self.state.borrow_mut().interrupt_enabled = enabled;
    }

    fn set_target(&mut self, address: u8) {
        self.state.borrow_mut().targets.push(address);
    }

    fn take_status(&mut self) -> BusStatus {
        core::mem::replace(&mut self.state.borrow_mut().status, BusStatus::empty())
    }
}

/// One started burst transfer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Burst {
    /// Transmit: channel, config, command units
    Write(u8, ChannelConfig, Vec<u16>),
    /// Receive: channel, config, length
    Read(u8, ChannelConfig, usize),
}

/// Observable state of the mock DMA engine
#[derive(Debug, Default)]
pub struct EngineState {
    /// Transfers started, in order
    pub started: Vec<Burst>,
    /// Channels aborted, in order
    pub aborted: Vec<u8>,
    /// Bytes the next receive transfer delivers
    pub rx_data: Vec<u8>,
}

impl EngineState {
    /// Command units of every transmit transfer, in order
    pub fn writes(&self) -> Vec<Vec<u16>> {
        self.started
            .iter()
            .filter_map(|burst| match burst {
                Burst::Write(_, _, units) => Some(units.clone()),
                Burst::Read(..) => None,
            })
            .collect()
    }
}

/// DMA engine that records instead of transferring
pub struct MockEngine {
    pub state: Rc<RefCell<EngineState>>,
}

impl MockEngine {
    pub const TX: u8 = 0;
    pub const RX: u8 = 1;

    pub fn new() -> (Self, Rc<RefCell<EngineState>>) {
        let state = Rc::new(RefCell::new(EngineState::default()));
        (Self { state: state.clone() }, state)
    }
}

impl TransferEngine for MockEngine {
    type Channel = u8;

    unsafe fn start_write(&mut self, channel: u8, config: ChannelConfig, source: &[u16]) {
        self.state
            .borrow_mut()
            .started
            .push(Burst::Write(channel, config, source.to_vec()));
    }

    unsafe fn start_read(&mut self, channel: u8, config: ChannelConfig, dest: &mut [u8]) {
        let mut state = self.state.borrow_mut();
        for (slot, byte) in dest.iter_mut().zip(state.rx_data.iter()) {
            *slot = *byte;
        }
        state.started.push(Burst::Read(channel, config, dest.len()));
    }

    fn abort(&mut self, channel: u8) {
        self.state.borrow_mut().aborted.push(channel);
    }
}
