//! Amiga quadrature mouse port
//!
//! - [`motion`] - lock-free handoff of motion vectors to the encoder
//! - [`encoder`] - quadrature phase generation on the H/HQ and V/VQ pairs
//! - [`buttons`] - the three button lines

pub mod buttons;
pub mod encoder;
pub mod motion;

pub use buttons::{ButtonLines, MouseButton};
pub use encoder::{Axis, AxisLine, EncodeReport, QuadratureEncoder, QuadraturePhase, PHASE_TABLE};
pub use motion::{MotionHandoff, MotionVector};
