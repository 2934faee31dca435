//! Bus recovery
//!
//! A peripheral reset mid-byte can keep clocking out a read that never
//! finished, holding SDA low forever. Toggling SCL up to nine times lets it
//! shift out the rest of the byte and release the line (I2C specification,
//! section 3.1.16 "Bus clear").

use super::BusController;
use crate::signal::LineState;
use embedded_hal::delay::DelayNs;

/// Result of a recovery attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RecoveryOutcome {
    /// Clock cycles issued
    pub cycles: u8,
    /// Data line seen high afterwards
    pub cleared: bool,
}

/// Either line held low while both are floating
pub fn is_blocked<C: BusController>(bus: &mut C) -> bool {
    bus.float_lines();
    let sda = bus.sda_is_high();
    let scl = bus.scl_is_high();
    !sda || !scl
}

/// Clock the bus until SDA releases or `max_cycles` run out
///
/// Best effort: a device that is still stuck afterwards is left for the
/// next transfer to find.
pub fn unblock<C, D>(bus: &mut C, delay: &mut D, max_cycles: u8, half_period_us: u32) -> RecoveryOutcome
where
    C: BusController,
    D: DelayNs,
{
    bus.float_lines();

    let mut cleared = bus.sda_is_high();
    let mut cycles = 0;
    while cycles < max_cycles && !cleared {
        bus.set_scl(LineState::Asserted);
        delay.delay_us(half_period_us);
        bus.set_scl(LineState::Released);
        delay.delay_us(half_period_us);

        cleared = bus.sda_is_high();
        cycles += 1;
    }

    RecoveryOutcome { cycles, cleared }
}
