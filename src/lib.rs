#![no_std]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(missing_docs)]

//! USB HID to Amiga keyboard and mouse bridge
//!
//! Firmware core for a small board that sits between a USB host stack and
//! an Amiga: boot-protocol keyboard reports become frames on the Amiga's
//! serial keyboard bus, and mouse reports become button levels and
//! quadrature pulses on the mouse port. A status display hangs off an I2C
//! bus driven by burst (DMA) transfers.
//!
//! Everything is hardware-agnostic: GPIO lines and delays come in through
//! `embedded-hal`, and the I2C controller and DMA engine through the
//! [`bus::BusController`] and [`bus::TransferEngine`] traits.
//!
//! # Execution contexts
//!
//! - Event context: the USB stack callbacks ([`hid::HidBridge`]), keyboard
//!   frames and display updates
//! - Encoder loop: [`mouse::QuadratureEncoder::run`], usually on the second
//!   core, fed through a [`mouse::MotionHandoff`]
//! - Bus interrupt: [`bus::BusQueue::on_interrupt`]
//!
//! # Core Components
//!
//! - [`keyboard`] - Amiga keyboard transmitter, scancodes and keymap
//! - [`mouse`] - quadrature encoder, button lines and motion handoff
//! - [`hid`] - HID boot report parsing and the report bridge
//! - [`bus`] - display bus transaction queue and recovery
//! - [`display`] - SSD1306 status display
//! - [`config`] - board pin maps, protocol timing and bus limits
//! - [`error`] - error types

#[cfg(feature = "defmt")]
use defmt as _;

#[cfg(test)]
extern crate std;

pub mod bus;
pub mod config;
pub mod display;
pub mod error;
pub mod hid;
pub mod keyboard;
pub mod mouse;
pub mod platform;
pub mod signal;

pub use error::{BridgeError, Result};
