//! Target delay provider
//!
//! Busy-wait [`DelayNs`] over the core cycle counter loop. The keyboard
//! frame timing only needs tens of microseconds of accuracy, so spinning on
//! cycles is enough and needs no timer peripheral.

use embedded_hal::delay::DelayNs;

const NANOS_PER_SECOND: u64 = 1_000_000_000;

/// Cycle-counting delay for a core running at a fixed clock
#[derive(Debug, Clone, Copy)]
pub struct CycleDelay {
    sysclk_hz: u32,
}

impl CycleDelay {
    /// Delay for a core clocked at `sysclk_hz`
    pub const fn new(sysclk_hz: u32) -> Self {
        Self { sysclk_hz }
    }

    /// Core cycles covering at least `ns` nanoseconds
    pub const fn cycles_for_ns(&self, ns: u32) -> u32 {
        let cycles = (ns as u64 * self.sysclk_hz as u64).div_ceil(NANOS_PER_SECOND);
        if cycles > u32::MAX as u64 {
            u32::MAX
        } else {
            cycles as u32
        }
    }
}

impl DelayNs for CycleDelay {
    fn delay_ns(&mut self, ns: u32) {
        cortex_m::asm::delay(self.cycles_for_ns(ns));
    }
}
