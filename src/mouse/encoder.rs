//! Quadrature motion encoder
//!
//! The Amiga counts mouse motion in hardware: each axis has two lines
//! offset by a quarter cycle, and the counter moves one step per edge in
//! the direction given by which line leads. Each axis therefore walks a
//! four-phase cycle:
//!
//! ```text
//! phase   0   1   2   3   0
//! A       ^   v   v   ^   ^      ^ released, v asserted
//! Q       ^   ^   v   v   ^
//! ```
//!
//! Forward motion (right, down) steps 0→1→2→3→0 with the main line leading;
//! backward steps 0→3→2→1→0 with the quadrature line leading. Phase 0 is
//! the idle state with both lines released. Neighbouring phases differ in
//! exactly one line, so each step drives a single edge.
//!
//! See the Amiga Hardware Reference Manual, "Mouse/trackball" timing.

use super::motion::{MotionHandoff, MotionVector};
use crate::config::timing;
use crate::signal::{LineState, OpenDrain};
use embedded_hal::delay::DelayNs;

/// Which line of an axis pair to drive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AxisLine {
    /// Main line (H or V)
    Main,
    /// Quarter-phase line (HQ or VQ)
    Quadrature,
}

/// Levels of the (main, quadrature) lines in each phase
pub const PHASE_TABLE: [(LineState, LineState); 4] = [
    (LineState::Released, LineState::Released),
    (LineState::Asserted, LineState::Released),
    (LineState::Asserted, LineState::Asserted),
    (LineState::Released, LineState::Asserted),
];

/// Two-bit phase counter of one axis
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct QuadraturePhase(u8);

impl QuadraturePhase {
    /// Current phase, always 0..=3
    pub const fn value(self) -> u8 {
        self.0
    }

    /// Next phase in the direction of `delta`'s sign
    pub const fn stepped(self, delta: i8) -> Self {
        if delta > 0 {
            Self((self.0 + 1) & 0b11)
        } else if delta < 0 {
            Self((self.0 + 3) & 0b11)
        } else {
            self
        }
    }

    /// Line levels in this phase
    pub const fn levels(self) -> (LineState, LineState) {
        PHASE_TABLE[self.0 as usize]
    }

    /// The line that changes moving from `self` to the neighbouring phase
    /// `to`, and its new level
    pub fn edge_to(self, to: Self) -> (AxisLine, LineState) {
        let (main_from, _) = self.levels();
        let (main_to, quad_to) = to.levels();
        if main_from != main_to {
            (AxisLine::Main, main_to)
        } else {
            (AxisLine::Quadrature, quad_to)
        }
    }
}

/// One axis: its line pair and phase counter
pub struct Axis<A, Q>
where
    A: OpenDrain,
    Q: OpenDrain,
{
    main: A,
    quadrature: Q,
    phase: QuadraturePhase,
}

impl<A, Q> Axis<A, Q>
where
    A: OpenDrain,
    Q: OpenDrain,
{
    /// Take both lines of an axis, leaving them released (phase 0)
    pub fn new(mut main: A, mut quadrature: Q) -> Self {
        main.release();
        quadrature.release();
        Self {
            main,
            quadrature,
            phase: QuadraturePhase::default(),
        }
    }

    /// Current phase
    pub fn phase(&self) -> QuadraturePhase {
        self.phase
    }

    /// Handle one iteration for this axis
    ///
    /// `remaining` is the motion still to be produced. A step is taken only
    /// when the remaining magnitude is a multiple of `divisor`; either way
    /// the remaining magnitude moves one unit towards zero. Returns the new
    /// remaining value and whether a transition was driven.
    pub fn advance(&mut self, remaining: i8, divisor: u8) -> (i8, bool) {
        if remaining == 0 {
            return (0, false);
        }

        let divisor = divisor.max(1) as i16;
        let stepped = (remaining as i16) % divisor == 0;
        if stepped {
            let next = self.phase.stepped(remaining);
            let (line, state) = self.phase.edge_to(next);
            self.phase = next;
            match line {
                AxisLine::Main => self.main.set_state(state),
                AxisLine::Quadrature => self.quadrature.set_state(state),
            }
        }

        (remaining - remaining.signum(), stepped)
    }

    /// Give back the lines
    pub fn free(self) -> (A, Q) {
        (self.main, self.quadrature)
    }
}

/// Outcome of working through one motion vector
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EncodeReport {
    /// Iterations run (one inter-step delay each)
    pub iterations: u16,
    /// Transitions driven on the horizontal axis
    pub x_steps: u16,
    /// Transitions driven on the vertical axis
    pub y_steps: u16,
    /// Abandoned because a newer vector arrived
    pub superseded: bool,
}

/// Quadrature mouse motion encoder
///
/// Meant to own a dedicated core or task: [`QuadratureEncoder::run`] never
/// returns. It paces transitions so the computer's counters see every edge,
/// and drops whatever is left of a vector as soon as a newer one is
/// published.
pub struct QuadratureEncoder<H, HQ, V, VQ, D>
where
    H: OpenDrain,
    HQ: OpenDrain,
    V: OpenDrain,
    VQ: OpenDrain,
    D: DelayNs,
{
    x: Axis<H, HQ>,
    y: Axis<V, VQ>,
    delay: D,
}

impl<H, HQ, V, VQ, D> QuadratureEncoder<H, HQ, V, VQ, D>
where
    H: OpenDrain,
    HQ: OpenDrain,
    V: OpenDrain,
    VQ: OpenDrain,
    D: DelayNs,
{
    /// Create an encoder; all four lines start released
    pub fn new(h: H, hq: HQ, v: V, vq: VQ, delay: D) -> Self {
        Self {
            x: Axis::new(h, hq),
            y: Axis::new(v, vq),
            delay,
        }
    }

    /// Horizontal phase
    pub fn x_phase(&self) -> QuadraturePhase {
        self.x.phase()
    }

    /// Vertical phase
    pub fn y_phase(&self) -> QuadraturePhase {
        self.y.phase()
    }

    /// Consume the pending vector and play it out
    ///
    /// Returns once the vector is exhausted or superseded. A superseded
    /// vector is simply abandoned; the next call picks up the new one.
    pub fn poll(&mut self, handoff: &MotionHandoff) -> EncodeReport {
        let MotionVector { mut dx, mut dy } = handoff.take();
        let divisor = handoff.divisor();
        let mut report = EncodeReport::default();

        while dx != 0 || dy != 0 {
            if handoff.is_pending() {
                report.superseded = true;
                break;
            }

            let (rest_x, stepped_x) = self.x.advance(dx, divisor);
            let (rest_y, stepped_y) = self.y.advance(dy, divisor);
            dx = rest_x;
            dy = rest_y;

            report.iterations += 1;
            report.x_steps += stepped_x as u16;
            report.y_steps += stepped_y as u16;

            self.delay.delay_us(timing::QUADRATURE_STEP_US);
        }

        report
    }

    /// Encoder loop
    pub fn run(&mut self, handoff: &MotionHandoff) -> ! {
        #[cfg(feature = "defmt")]
        defmt::info!("[aqm] mouse motion output loop starting");

        loop {
            let _report = self.poll(handoff);

            #[cfg(feature = "defmt")]
            {
                if _report.iterations > 0 {
                    defmt::trace!("[aqm] {}", _report);
                }
            }
        }
    }
}
