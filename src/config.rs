//! Board configuration: pin assignments, protocol timing and bus limits
//!
//! All pin numbers are GPIO numbers, not physical package pins.

/// Board revisions with distinct pin assignments
///
/// The library takes its lines as `embedded-hal` pins; these tables are for
/// the firmware binary to know which GPIOs to hand over.
///
/// ```
/// use amigahid::config::BoardRevision;
///
/// let pins = BoardRevision::SELECTED.pins();
/// assert_ne!(pins.kbd_data, pins.kbd_clock);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BoardRevision {
    /// Revision 2 (display on the first I2C port)
    Rev2,
    /// Revision 4 (display on the second I2C port)
    Rev4,
}

impl BoardRevision {
    /// Revision selected by cargo features
    #[cfg(feature = "board-rev2")]
    pub const SELECTED: Self = Self::Rev2;
    /// Revision selected by cargo features
    #[cfg(not(feature = "board-rev2"))]
    pub const SELECTED: Self = Self::Rev4;

    /// Pin map for this revision
    pub const fn pins(self) -> PinMap {
        match self {
            Self::Rev2 => PinMap::REV2,
            Self::Rev4 => PinMap::REV4,
        }
    }
}

/// GPIO assignments for one board revision, used by the firmware binary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinMap {
    /// I2C controller index driving the display
    pub i2c_port: u8,
    /// Interrupt number of that I2C controller
    pub i2c_irq: u8,
    /// Display bus data line
    pub i2c_sda: u8,
    /// Display bus clock line
    pub i2c_scl: u8,
    /// Keyboard reset line (/RST)
    pub kbd_reset: u8,
    /// Keyboard data line (/DAT)
    pub kbd_data: u8,
    /// Keyboard clock line (/CLK)
    pub kbd_clock: u8,
    /// Horizontal quadrature line
    pub mouse_h: u8,
    /// Vertical quadrature line
    pub mouse_v: u8,
    /// Horizontal quadrature (phase-offset) line
    pub mouse_hq: u8,
    /// Vertical quadrature (phase-offset) line
    pub mouse_vq: u8,
    /// Left button line
    pub mouse_b1: u8,
    /// Right button line
    pub mouse_b2: u8,
    /// Middle button line
    pub mouse_b3: u8,
}

impl PinMap {
    /// Revision 2 pin map
    pub const REV2: Self = Self {
        i2c_port: 0,
        i2c_irq: 23,
        i2c_sda: 4,
        i2c_scl: 5,
        kbd_reset: 10,
        kbd_data: 11,
        kbd_clock: 12,
        mouse_h: 9,
        mouse_v: 8,
        mouse_hq: 7,
        mouse_vq: 6,
        mouse_b1: 22,
        mouse_b2: 26,
        mouse_b3: 27,
    };

    /// Revision 4 pin map
    pub const REV4: Self = Self {
        i2c_port: 1,
        // tied to the i2c port in use
        i2c_irq: 24,
        i2c_sda: 2,
        i2c_scl: 3,
        kbd_reset: 4,
        kbd_data: 5,
        kbd_clock: 6,
        mouse_h: 9,
        mouse_v: 10,
        mouse_hq: 7,
        mouse_vq: 8,
        mouse_b1: 11,
        mouse_b2: 12,
        mouse_b3: 13,
    };
}

/// Keyboard and mouse wire timing
pub mod timing {
    /// Data line setup before each clock pulse
    pub const DATA_SETUP_US: u32 = 20;
    /// Clock low pulse width
    pub const CLOCK_LOW_US: u32 = 20;
    /// Gap after the clock returns high, before the next bit
    pub const INTER_BIT_US: u32 = 50;
    /// Data release hold marking the end of a frame
    pub const END_OF_FRAME_MS: u32 = 5;
    /// Settle time before the power-up announcement
    pub const STARTUP_SETTLE_MS: u32 = 1_000;
    /// Gap between power-up and power-down announcements
    pub const ANNOUNCE_GAP_MS: u32 = 200;
    /// Minimum interval between quadrature transitions
    pub const QUADRATURE_STEP_US: u32 = 300;
}

/// Display bus parameters
pub mod bus {
    /// SSD1306 7-bit address
    pub const DISPLAY_ADDRESS: u8 = 0x3c;
    /// Bus clock rate (1MHz)
    pub const BAUD_HZ: u32 = 1_000_000;
    /// Maximum command units per burst transfer (1KB + 32B overhead)
    pub const MAX_TRANSFER: usize = 0x400 + 0x20;
    /// Maximum bytes read back by one transaction
    pub const MAX_READ: usize = 32;
    /// Pending transactions held by the queue, in-flight one included;
    /// the display bring-up queues 31 single-command writes at once
    pub const QUEUE_DEPTH: usize = 32;
    /// Clock toggles attempted when the bus is stuck
    pub const RECOVERY_CYCLES: u8 = 9;
    /// Half period of a recovery clock toggle
    pub const RECOVERY_HALF_PERIOD_US: u32 = 5;
}

/// Default motion divisor: one phase transition per two units of motion
pub const DEFAULT_MOTION_DIVISOR: u8 = 2;
