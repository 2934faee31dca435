//! Quadrature encoder tests
//!
//! Phase sequencing, divisor skipping, pacing and supersession of motion
//! vectors, all on recording lines.

mod common;

use amigahid::mouse::{Axis, MotionHandoff, MotionVector};
use common::{encoder, Event, Line, Recorder};

fn axis(log: &Recorder) -> Axis<common::MockPin, common::MockPin> {
    let axis = Axis::new(log.pin(Line::MouseH), log.pin(Line::MouseHq));
    log.clear();
    axis
}

#[test]
fn test_positive_motion_phase_sequence() {
    let log = Recorder::new();
    let mut x = axis(&log);

    let mut phases = Vec::new();
    let mut remaining = 4;
    while remaining != 0 {
        remaining = x.advance(remaining, 1).0;
        phases.push(x.phase().value());
    }

    assert_eq!(phases, [1, 2, 3, 0]);
    assert_eq!(
        log.events(),
        [
            Event::Drive(Line::MouseH, true),
            Event::Drive(Line::MouseHq, true),
            Event::Drive(Line::MouseH, false),
            Event::Drive(Line::MouseHq, false),
        ]
    );
}

#[test]
fn test_negative_motion_phase_sequence() {
    let log = Recorder::new();
    let mut x = axis(&log);

    let mut phases = Vec::new();
    let mut remaining = -4;
    while remaining != 0 {
        remaining = x.advance(remaining, 1).0;
        phases.push(x.phase().value());
    }

    assert_eq!(phases, [3, 2, 1, 0]);
    assert_eq!(
        log.events(),
        [
            Event::Drive(Line::MouseHq, true),
            Event::Drive(Line::MouseH, true),
            Event::Drive(Line::MouseHq, false),
            Event::Drive(Line::MouseH, false),
        ]
    );
}

#[test]
fn test_forward_motion_leads_with_main_line() {
    let log = Recorder::new();
    let mut x = axis(&log);

    let mut remaining = 8;
    while remaining != 0 {
        remaining = x.advance(remaining, 1).0;
    }

    // level of HQ each time H asserts
    let mut hq = false;
    let mut hq_on_h_assert = Vec::new();
    for event in log.events() {
        match event {
            Event::Drive(Line::MouseHq, asserted) => hq = asserted,
            Event::Drive(Line::MouseH, true) => hq_on_h_assert.push(hq),
            _ => {}
        }
    }
    assert_eq!(hq_on_h_assert, [false, false]);
}

#[test]
fn test_divisor_steps_on_even_magnitudes() {
    let log = Recorder::new();
    let mut x = axis(&log);

    let mut remaining: i8 = 5;
    let mut stepped_at = Vec::new();
    while remaining != 0 {
        let before = remaining;
        let (rest, stepped) = x.advance(remaining, 2);
        if stepped {
            stepped_at.push(before);
        }
        assert_eq!(rest.abs(), before.abs() - 1);
        remaining = rest;
    }

    assert_eq!(stepped_at, [4, 2]);
    assert_eq!(remaining, 0);

    let mut remaining: i8 = -5;
    let mut steps = 0;
    while remaining != 0 {
        let (rest, stepped) = x.advance(remaining, 2);
        steps += usize::from(stepped);
        remaining = rest;
    }
    assert_eq!(steps, 2);
    assert_eq!(x.phase().value(), 0);
}

#[test]
fn test_extreme_motion_terminates() {
    let log = Recorder::new();
    let mut x = axis(&log);

    let mut remaining = i8::MIN;
    let mut calls = 0;
    while remaining != 0 {
        remaining = x.advance(remaining, 3).0;
        calls += 1;
    }
    assert_eq!(calls, 128);
}

#[test]
fn test_encoder_paces_every_iteration() {
    let log = Recorder::new();
    let handoff = MotionHandoff::new();
    let mut enc = encoder(&log, log.delay());

    handoff.set_divisor(1);
    handoff.publish(MotionVector::new(3, -2));
    let report = enc.poll(&handoff);

    assert_eq!(report.iterations, 3);
    assert_eq!(report.x_steps, 3);
    assert_eq!(report.y_steps, 2);
    assert!(!report.superseded);
    assert_eq!(enc.x_phase().value(), 3);
    assert_eq!(enc.y_phase().value(), 2);
    assert_eq!(log.total_delay_ns(), 3 * 300_000);

    // nothing pending: no activity
    log.clear();
    assert_eq!(enc.poll(&handoff).iterations, 0);
    assert!(log.events().is_empty());
}

#[test]
fn test_default_divisor_halves_motion() {
    let log = Recorder::new();
    let handoff = MotionHandoff::new();
    let mut enc = encoder(&log, log.delay());

    handoff.publish(MotionVector::new(5, 0));
    let report = enc.poll(&handoff);

    assert_eq!(report.iterations, 5);
    assert_eq!(report.x_steps, 2);
    assert_eq!(report.y_steps, 0);
    assert_eq!(log.transitions(Line::MouseH) + log.transitions(Line::MouseHq), 2);
    assert_eq!(log.transitions(Line::MouseV) + log.transitions(Line::MouseVq), 0);
}

#[test]
fn test_zero_divisor_is_clamped() {
    let handoff = MotionHandoff::new();
    handoff.set_divisor(0);
    assert_eq!(handoff.divisor(), 1);
}

#[test]
fn test_newer_vector_supersedes() {
    let log = Recorder::new();
    let handoff = MotionHandoff::new();
    let newer = &handoff;
    let mut delays = 0;
    let delay = log.delay().with_hook(move || {
        delays += 1;
        if delays == 2 {
            newer.publish(MotionVector::new(0, 3));
        }
    });
    let mut enc = encoder(&log, delay);

    handoff.set_divisor(1);
    handoff.publish(MotionVector::new(100, 0));

    let first = enc.poll(&handoff);
    assert!(first.superseded);
    assert_eq!(first.iterations, 2);
    assert_eq!(first.x_steps, 2);

    let second = enc.poll(&handoff);
    assert!(!second.superseded);
    assert_eq!(second.x_steps, 0);
    assert_eq!(second.y_steps, 3);
    assert_eq!(enc.x_phase().value(), 2);
}

#[test]
fn test_vector_published_after_take_is_played() {
    let log = Recorder::new();
    let handoff = MotionHandoff::new();
    let newer = &handoff;
    let mut published = false;
    let delay = log.delay().with_hook(move || {
        // lands after the encoder took the first vector
        if !published {
            published = true;
            newer.publish(MotionVector::new(-4, 0));
        }
    });
    let mut enc = encoder(&log, delay);

    handoff.set_divisor(1);
    handoff.publish(MotionVector::new(2, 0));

    let first = enc.poll(&handoff);
    assert!(first.superseded);
    assert_eq!(first.x_steps, 1);

    let second = enc.poll(&handoff);
    assert!(!second.superseded);
    assert_eq!(second.x_steps, 4);
    assert_eq!(enc.x_phase().value(), 1);

    assert!(!handoff.is_pending());
    assert_eq!(enc.poll(&handoff).iterations, 0);
}
