//! SSD1306 status display
//!
//! A 128x64 monochrome OLED on the display bus. Everything goes through the
//! [`BusQueue`], so drawing never blocks: the framebuffer is updated in RAM
//! and a copy of it is queued as one burst write.
//!
//! The queue is borrowed for `'static`, as [`BusQueue::enqueue`] requires.
//!
//! The panel is checked for once when the display is brought up. If it does not
//! answer, the display is [`Presence::Absent`] and every later write is a
//! silent no-op.
//!
//! Glyph rendering is left to a [`TextRenderer`] so any font crate (or a
//! hand-made table) can be plugged in.

use crate::bus::{BusController, BusQueue, TransferEngine};
use crate::error::{BridgeError, Result};
use embedded_hal::delay::DelayNs;

/// Panel width in pixels
pub const WIDTH: usize = 128;
/// Panel height in pixels
pub const HEIGHT: usize = 64;
/// Framebuffer size: one bit per pixel, pages of 8 rows
pub const FRAMEBUFFER_LEN: usize = WIDTH * HEIGHT / 8;

/// Control byte: one command byte follows
pub const COMMAND_CONTROL: u8 = 0x80;
/// Control byte: display RAM data follows
pub const DATA_CONTROL: u8 = 0x40;

/// Horizontal pitch of a text column
pub const COLUMN_PITCH: i16 = 5;
/// Vertical pitch of a text row
pub const ROW_PITCH: i16 = 16;
/// Blank rows above the first text row
pub const TOP_MARGIN: i16 = 2;

/// SSD1306 command opcodes
pub mod command {
    /// Contrast, one parameter byte
    pub const SET_CONTRAST: u8 = 0x81;
    /// Bit 0 set: all pixels on regardless of RAM
    pub const SET_ENTIRE_DISP_ON: u8 = 0xa4;
    /// Bit 0 set: inverted display
    pub const SET_NORMAL_INVERTED: u8 = 0xa6;
    /// Bit 0 set: display on, clear: sleep
    pub const SET_DISP_ON_OFF: u8 = 0xae;
    /// Memory addressing mode, one parameter byte
    pub const SET_ADDRESSING_MODE: u8 = 0x20;
    /// Column start and end, two parameter bytes
    pub const SET_COLUMN_ADDRESS: u8 = 0x21;
    /// Page start and end, two parameter bytes
    pub const SET_PAGE_ADDRESS: u8 = 0x22;
    /// Display RAM start line (low 6 bits)
    pub const SET_DISP_START_LINE: u8 = 0x40;
    /// Bit 0 set: column 127 maps to SEG0
    pub const SET_SEGMENT_REMAP: u8 = 0xa0;
    /// Multiplex ratio, one parameter byte
    pub const SET_MUX_RATIO: u8 = 0xa8;
    /// Bit 3 set: scan COM from N-1 to 0
    pub const SET_COM_OUTPUT_DIR: u8 = 0xc0;
    /// Vertical shift, one parameter byte
    pub const SET_DISP_OFFSET: u8 = 0xd3;
    /// COM pins hardware configuration, one parameter byte
    pub const SET_COM_PINS_CONFIG: u8 = 0xda;
    /// Clock divide ratio and oscillator frequency, one parameter byte
    pub const SET_DCLK_FOSC: u8 = 0xd5;
    /// Pre-charge period, one parameter byte
    pub const SET_PRECHARGE_PERIOD: u8 = 0xd9;
    /// VCOMH deselect level, one parameter byte
    pub const SET_VCOM_DESEL_LEVEL: u8 = 0xdb;
    /// Charge pump, one parameter byte (0x14 enables)
    pub const SET_CHARGE_PUMP: u8 = 0x8d;
}

use command::*;

/// Panel bring-up, one command or parameter byte per entry
#[rustfmt::skip]
pub const INIT_SEQUENCE: [u8; 31] = [
    SET_DISP_ON_OFF,
    SET_DCLK_FOSC, 0x80,
    SET_MUX_RATIO, (HEIGHT - 1) as u8,
    SET_DISP_OFFSET, 0x00,
    SET_DISP_START_LINE,
    SET_CHARGE_PUMP, 0x14,
    SET_SEGMENT_REMAP | 0x01,
    SET_COM_OUTPUT_DIR | 0x08,
    SET_COM_PINS_CONFIG, 0x12,
    SET_CONTRAST, 0xcf,
    SET_PRECHARGE_PERIOD, 0xf1,
    SET_VCOM_DESEL_LEVEL, 0x40,
    SET_ENTIRE_DISP_ON,
    SET_NORMAL_INVERTED,
    SET_ADDRESSING_MODE, 0x00,
    SET_COLUMN_ADDRESS, 0x00, (WIDTH - 1) as u8,
    SET_PAGE_ADDRESS, 0x00, (HEIGHT / 8 - 1) as u8,
    SET_DISP_ON_OFF | 0x01,
];

/// Pixel colour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Colour {
    /// Pixel off
    Black,
    /// Pixel on
    White,
    /// Flip whatever is there
    Invert,
}

/// Display RAM image, prefixed with the data control byte so it can be
/// queued as-is
#[derive(Clone)]
pub struct Framebuffer {
    bytes: [u8; 1 + FRAMEBUFFER_LEN],
}

impl Framebuffer {
    /// All pixels off
    pub const fn new() -> Self {
        let mut bytes = [0; 1 + FRAMEBUFFER_LEN];
        bytes[0] = DATA_CONTROL;
        Self { bytes }
    }

    /// Plot one pixel; anything off-screen is ignored
    pub fn set_pixel(&mut self, x: i16, y: i16, colour: Colour) {
        let Some(index) = Self::index(x, y) else {
            return;
        };
        let mask = 1 << (y % 8);
        let byte = &mut self.bytes[1 + index];
        match colour {
            Colour::Black => *byte &= !mask,
            Colour::White => *byte |= mask,
            Colour::Invert => *byte ^= mask,
        }
    }

    /// Pixel state; off-screen reads as off
    pub fn pixel(&self, x: i16, y: i16) -> bool {
        Self::index(x, y).is_some_and(|index| self.bytes[1 + index] & (1 << (y % 8)) != 0)
    }

    /// Fill the whole panel
    pub fn fill(&mut self, colour: Colour) {
        for byte in self.bytes[1..].iter_mut() {
            *byte = match colour {
                Colour::Black => 0x00,
                Colour::White => 0xff,
                Colour::Invert => !*byte,
            };
        }
    }

    /// Pixel data, page by page
    pub fn pixels(&self) -> &[u8] {
        &self.bytes[1..]
    }

    /// Control byte followed by pixel data
    pub fn as_transfer(&self) -> &[u8] {
        &self.bytes
    }

    fn index(x: i16, y: i16) -> Option<usize> {
        if x < 0 || y < 0 || x as usize >= WIDTH || y as usize >= HEIGHT {
            return None;
        }
        Some((y as usize / 8) * WIDTH + x as usize)
    }
}

impl Default for Framebuffer {
    fn default() -> Self {
        Self::new()
    }
}

/// Draws text into a framebuffer
pub trait TextRenderer {
    /// Render `text` with its top-left corner at pixel (`x`, `y`)
    fn draw_text(&mut self, target: &mut Framebuffer, x: i16, y: i16, text: &str);
}

/// Whether the panel answered its presence check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Presence {
    /// Presence write acknowledged, writes go to the bus
    Available,
    /// No answer, writes are dropped
    Absent,
}

/// Status display on the display bus
pub struct StatusDisplay<C, E, D, R>
where
    C: BusController + 'static,
    E: TransferEngine + 'static,
    D: DelayNs + 'static,
    R: TextRenderer,
{
    queue: &'static BusQueue<C, E, D>,
    renderer: R,
    framebuffer: Framebuffer,
    presence: Presence,
}

impl<C, E, D, R> StatusDisplay<C, E, D, R>
where
    C: BusController + 'static,
    E: TransferEngine + 'static,
    D: DelayNs + 'static,
    R: TextRenderer,
{
    /// Bring up the bus, check for the panel and queue its init sequence
    ///
    /// An absent panel is not an error: the display comes back
    /// [`Presence::Absent`].
    pub fn init(queue: &'static BusQueue<C, E, D>, renderer: R) -> Result<Self> {
        let hello = [COMMAND_CONTROL, SET_DISP_ON_OFF];
        let presence = match queue.init(&hello) {
            Ok(()) => Presence::Available,
            Err(BridgeError::DeviceAbsent) => {
                #[cfg(feature = "defmt")]
                defmt::warn!("[disp] no display, output disabled");
                Presence::Absent
            }
            Err(err) => return Err(err),
        };

        if presence == Presence::Available {
            // each command and parameter byte is its own transaction
            for &byte in INIT_SEQUENCE.iter() {
                queue.enqueue(&[COMMAND_CONTROL, byte], 0)?;
            }
        }

        Ok(Self {
            queue,
            renderer,
            framebuffer: Framebuffer::new(),
            presence,
        })
    }

    /// Presence check result
    pub fn presence(&self) -> Presence {
        self.presence
    }

    /// Draw `text` at a character cell and push the frame out
    pub fn write_text(&mut self, column: u8, row: u8, text: &str) -> Result<()> {
        if self.presence == Presence::Absent {
            return Ok(());
        }

        let x = i16::from(column) * COLUMN_PITCH;
        let y = TOP_MARGIN + i16::from(row) * ROW_PITCH;
        self.renderer.draw_text(&mut self.framebuffer, x, y, text);
        self.flush()
    }

    /// Queue the whole framebuffer
    pub fn flush(&mut self) -> Result<()> {
        if self.presence == Presence::Absent {
            return Ok(());
        }
        self.queue.enqueue(self.framebuffer.as_transfer(), 0)
    }

    /// Framebuffer as drawn so far
    pub fn framebuffer(&self) -> &Framebuffer {
        &self.framebuffer
    }

    /// Draw directly; call [`StatusDisplay::flush`] to show it
    pub fn framebuffer_mut(&mut self) -> &mut Framebuffer {
        &mut self.framebuffer
    }
}
