//! Shared test utilities for amigahid tests
//!
//! Mocks for the lines, delays, bus controller and DMA engine, plus small
//! builders used across test files.

#![allow(dead_code)]

pub mod mock_hardware;

pub use mock_hardware::{
    Burst, BusState, EngineState, Event, Line, MockBusController, MockDelay, MockEngine, MockPin, Recorder,
};

use amigahid::keyboard::AmigaKeyboard;
use amigahid::mouse::QuadratureEncoder;

/// Keyboard transmitter wired to recording lines
pub type TestKeyboard = AmigaKeyboard<MockPin, MockPin, MockPin, MockDelay<'static>>;

/// Keyboard transmitter on fresh mocks, log cleared
pub fn keyboard(log: &Recorder) -> TestKeyboard {
    let kbd = AmigaKeyboard::new(
        log.pin(Line::KbdClock),
        log.pin(Line::KbdData),
        log.pin(Line::KbdReset),
        log.delay(),
    );
    log.clear();
    kbd
}

/// Quadrature encoder on fresh mocks with `delay`, log cleared afterwards
pub fn encoder<'a>(log: &Recorder, delay: MockDelay<'a>) -> QuadratureEncoder<MockPin, MockPin, MockPin, MockPin, MockDelay<'a>> {
    let encoder = QuadratureEncoder::new(
        log.pin(Line::MouseH),
        log.pin(Line::MouseHq),
        log.pin(Line::MouseV),
        log.pin(Line::MouseVq),
        delay,
    );
    log.clear();
    encoder
}

/// Boot protocol keyboard report
pub fn keyboard_report(modifiers: u8, keys: &[u8]) -> [u8; 8] {
    let mut report = [0u8; 8];
    report[0] = modifiers;
    report[2..2 + keys.len()].copy_from_slice(keys);
    report
}
