//! Phase and frequency consistency helpers.
//!
//! A partial records both frequency and phase at every breakpoint, and the
//! two are redundant: integrating frequency from one breakpoint to the next
//! predicts the next phase. After analysis (or after moving breakpoints in
//! time) the prediction and the record disagree. These helpers repair one
//! from the other.

use std::f64::consts::{PI, TAU};
use std::ops::Range;

use super::{Breakpoint, Partial};

/// Wrap a phase into `[-π, π)`.
#[inline]
pub fn wrap_pi(phase: f64) -> f64 {
    phase - TAU * ((phase + PI) / TAU).floor()
}

/// Phase accumulated over `dt` seconds by a sinusoid whose frequency moves
/// linearly from `bp0`'s to `bp1`'s.
#[inline]
pub fn phase_travel(bp0: &Breakpoint, bp1: &Breakpoint, dt: f64) -> f64 {
    PI * dt * (bp0.frequency + bp1.frequency)
}

/// Recompute phases forward from the breakpoint at `range.start`.
///
/// The first breakpoint of the range keeps its phase; every later one in the
/// range gets the previous phase plus the travel from the previous breakpoint.
/// Indices past the end of the partial are ignored.
pub fn fix_phase_forward(partial: &mut Partial, range: Range<usize>) {
    let end = range.end.min(partial.num_breakpoints());
    if range.start >= end {
        return;
    }

    let mut prev: Option<(f64, Breakpoint)> = None;
    for (time, bp) in partial.iter_mut().skip(range.start).take(end - range.start) {
        if let Some((t0, bp0)) = prev {
            bp.phase = wrap_pi(bp0.phase + phase_travel(&bp0, bp, time - t0));
        }
        prev = Some((time, *bp));
    }
}

/// Nudge frequencies so each recorded phase is reachable from the one before.
///
/// For every non-null breakpoint after the first, the phase error left by
/// `phase_travel` is cancelled by changing that breakpoint's frequency, but by
/// no more than `max_fix_pct` percent of it. Phases are not modified.
pub fn fix_frequency(partial: &mut Partial, max_fix_pct: f64) {
    let mut prev: Option<(f64, Breakpoint)> = None;
    for (time, bp) in partial.iter_mut() {
        if let Some((t0, bp0)) = prev {
            let dt = time - t0;
            if !bp.is_null() && dt > 0.0 {
                let predicted = bp0.phase + phase_travel(&bp0, bp, dt);
                let err = wrap_pi(bp.phase - predicted);

                // travel grows by π·dt per Hz added to the end frequency
                let max_fix = (bp.frequency * max_fix_pct * 0.01).abs();
                let fix = (err / (PI * dt)).clamp(-max_fix, max_fix);
                bp.frequency += fix;
            }
        }
        prev = Some((time, *bp));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bp(frequency: f64, amplitude: f64, phase: f64) -> Breakpoint {
        Breakpoint::new(frequency, amplitude, 0.0, phase)
    }

    #[test]
    fn wrap_stays_in_range() {
        for x in [-10.0, -PI, -1.0, 0.0, 1.0, PI, 7.5, 100.0] {
            let w = wrap_pi(x);
            assert!((-PI..PI).contains(&w), "{x} wrapped to {w}");
            assert!(((x - w) / TAU - ((x - w) / TAU).round()).abs() < 1e-9);
        }
    }

    #[test]
    fn travel_uses_average_frequency() {
        let travel = phase_travel(&bp(100.0, 1.0, 0.0), &bp(300.0, 1.0, 0.0), 0.5);
        assert!((travel - TAU * 0.5 * 200.0).abs() < 1e-9);
    }

    #[test]
    fn forward_fix_chains_phases() {
        let mut p: Partial = [
            (0.0, bp(100.0, 1.0, 0.5)),
            (0.001, bp(100.0, 1.0, 3.0)),
            (0.002, bp(200.0, 1.0, -2.0)),
        ]
        .into_iter()
        .collect();

        let len = p.num_breakpoints();
        fix_phase_forward(&mut p, 0..len);

        let phases: Vec<f64> = p.iter().map(|(_, b)| b.phase).collect();
        assert_eq!(phases[0], 0.5);
        assert!((phases[1] - wrap_pi(0.5 + TAU * 0.001 * 100.0)).abs() < 1e-9);
        assert!((phases[2] - wrap_pi(phases[1] + TAU * 0.001 * 150.0)).abs() < 1e-9);
    }

    #[test]
    fn forward_fix_respects_range() {
        let mut p: Partial = [
            (0.0, bp(100.0, 1.0, 0.5)),
            (0.001, bp(100.0, 1.0, 3.0)),
            (0.002, bp(100.0, 1.0, -2.0)),
        ]
        .into_iter()
        .collect();

        fix_phase_forward(&mut p, 1..10);

        assert_eq!(p.get(0).map(|(_, b)| b.phase), Some(0.5));
        assert_eq!(p.get(1).map(|(_, b)| b.phase), Some(3.0));
        let expected = wrap_pi(3.0 + TAU * 0.001 * 100.0);
        assert!((p.get(2).map_or(0.0, |(_, b)| b.phase) - expected).abs() < 1e-9);
    }

    #[test]
    fn frequency_fix_closes_small_phase_error() {
        let dt = 0.01;
        let mut p: Partial = [
            (0.0, bp(100.0, 1.0, 0.0)),
            (dt, bp(100.0, 1.0, wrap_pi(TAU * dt * 100.0 + 0.1))),
        ]
        .into_iter()
        .collect();

        fix_frequency(&mut p, 20.0);

        let (t0, b0) = p.get(0).map(|(t, b)| (t, *b)).unwrap_or_default();
        let (t1, b1) = p.get(1).map(|(t, b)| (t, *b)).unwrap_or_default();
        let residual = wrap_pi(b1.phase - (b0.phase + phase_travel(&b0, &b1, t1 - t0)));
        assert!(residual.abs() < 1e-9, "residual {residual}");
        assert!(b1.frequency > 100.0);
    }

    #[test]
    fn frequency_fix_is_bounded() {
        let dt = 0.01;
        let mut p: Partial = [
            (0.0, bp(100.0, 1.0, 0.0)),
            (dt, bp(100.0, 1.0, wrap_pi(TAU * dt * 100.0 + 3.0))),
        ]
        .into_iter()
        .collect();

        fix_frequency(&mut p, 1.0);

        let f1 = p.get(1).map_or(0.0, |(_, b)| b.frequency);
        assert!((f1 - 101.0).abs() < 1e-9);
    }

    #[test]
    fn frequency_fix_skips_nulls() {
        let mut p: Partial = [
            (0.0, bp(100.0, 1.0, 0.0)),
            (0.01, bp(100.0, 0.0, 2.0)),
        ]
        .into_iter()
        .collect();

        fix_frequency(&mut p, 20.0);
        assert_eq!(p.get(1).map(|(_, b)| b.frequency), Some(100.0));
    }
}
