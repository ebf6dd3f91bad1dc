/*
Partial Envelopes
=================

A partial is one sinusoidal component of a modeled sound: a time-ordered run
of breakpoints, each giving frequency, amplitude, bandwidth and phase at one
instant.

  amp
   │      ●───●
   │     ╱     ╲        ●
   │    ●       ●──●   ╱ ╲
   │                ╲ ╱   ●
   └────────────────-●────────→ time
                     ↑
                null breakpoint (gap / phase reset)

Vocabulary
----------

  breakpoint   One control point. Times are strictly increasing and unique;
               inserting at an existing time replaces that breakpoint.

  null         A breakpoint with zero amplitude. Synthesis treats the partial
               as silent there, and the next non-null breakpoint restarts the
               oscillator at its recorded phase.

  fade time    Outside its first/last breakpoint a partial is not simply cut
               off: sampling it there fades the amplitude linearly to zero
               over the fade time, keeping the edge frequency and rolling the
               phase at that frequency.


Sampling Between Breakpoints
----------------------------

Frequency, amplitude and bandwidth are linearly interpolated. Phase is not:
it is the earlier breakpoint's phase plus the phase traveled at the
interpolated frequency (trapezoid rule):

    phase(t) = phase0 + 2π · (t - t0) · (f0 + f(t)) / 2

If the earlier breakpoint is null the oscillator is about to be reset, so the
phase is instead rolled back from the later breakpoint.
*/

use std::f64::consts::TAU;
use std::ops::RangeBounds;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::breakpoint::Breakpoint;
use super::phasefix::{phase_travel, wrap_pi};

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Partial {
    label: i32,
    // Sorted by time, times unique
    breakpoints: Vec<(f64, Breakpoint)>,
}

impl Partial {
    /// Default fade used by [`Partial::parameters_at`], 1 ms.
    pub const SHORTEST_SAFE_FADE_TIME: f64 = 0.001;

    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty partial carrying `label`.
    pub fn with_label(label: i32) -> Self {
        Self {
            label,
            breakpoints: Vec::new(),
        }
    }

    pub fn label(&self) -> i32 {
        self.label
    }

    pub fn set_label(&mut self, label: i32) {
        self.label = label;
    }

    pub fn num_breakpoints(&self) -> usize {
        self.breakpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.breakpoints.is_empty()
    }

    /// Time of the first breakpoint, 0 for an empty partial.
    pub fn start_time(&self) -> f64 {
        self.breakpoints.first().map_or(0.0, |(t, _)| *t)
    }

    /// Time of the last breakpoint, 0 for an empty partial.
    pub fn end_time(&self) -> f64 {
        self.breakpoints.last().map_or(0.0, |(t, _)| *t)
    }

    pub fn duration(&self) -> f64 {
        self.end_time() - self.start_time()
    }

    pub fn first(&self) -> Option<(f64, &Breakpoint)> {
        self.breakpoints.first().map(|(t, bp)| (*t, bp))
    }

    pub fn last(&self) -> Option<(f64, &Breakpoint)> {
        self.breakpoints.last().map(|(t, bp)| (*t, bp))
    }

    pub fn get(&self, index: usize) -> Option<(f64, &Breakpoint)> {
        self.breakpoints.get(index).map(|(t, bp)| (*t, bp))
    }

    /// Mutable access to a breakpoint's parameters. Its time cannot change.
    pub fn breakpoint_mut(&mut self, index: usize) -> Option<&mut Breakpoint> {
        self.breakpoints.get_mut(index).map(|(_, bp)| bp)
    }

    /// Iterate `(time, breakpoint)` pairs in time order.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (f64, &Breakpoint)> + ExactSizeIterator {
        self.breakpoints.iter().map(|(t, bp)| (*t, bp))
    }

    pub fn iter_mut(
        &mut self,
    ) -> impl DoubleEndedIterator<Item = (f64, &mut Breakpoint)> + ExactSizeIterator {
        self.breakpoints.iter_mut().map(|(t, bp)| (*t, bp))
    }

    /// Insert `bp` at `time`, replacing any breakpoint already there.
    /// Returns the index of the inserted breakpoint.
    pub fn insert(&mut self, time: f64, bp: Breakpoint) -> usize {
        let idx = self.breakpoints.partition_point(|(t, _)| *t < time);
        match self.breakpoints.get_mut(idx) {
            Some(slot) if slot.0 == time => slot.1 = bp,
            _ => self.breakpoints.insert(idx, (time, bp)),
        }
        idx
    }

    /// Remove the breakpoints in an index range.
    pub fn erase<R: RangeBounds<usize>>(&mut self, range: R) {
        self.breakpoints.drain(range);
    }

    /// Index of the first breakpoint later than `time`.
    pub fn find_after(&self, time: f64) -> usize {
        self.breakpoints.partition_point(|(t, _)| *t <= time)
    }

    /// Parameters at `time`, fading over [`Self::SHORTEST_SAFE_FADE_TIME`]
    /// outside the partial's extent.
    pub fn parameters_at(&self, time: f64) -> Breakpoint {
        self.parameters_at_with_fade(time, Self::SHORTEST_SAFE_FADE_TIME)
    }

    /// Parameters at `time`; outside the partial the amplitude fades to zero
    /// over `fade_time` seconds.
    pub fn parameters_at_with_fade(&self, time: f64, fade_time: f64) -> Breakpoint {
        let (Some(&(t_first, first)), Some(&(t_last, last))) =
            (self.breakpoints.first(), self.breakpoints.last())
        else {
            return Breakpoint::default();
        };

        if time <= t_first {
            let dt = t_first - time;
            return Breakpoint {
                amplitude: faded(first.amplitude, dt, fade_time),
                phase: wrap_pi(first.phase - TAU * first.frequency * dt),
                ..first
            };
        }

        if time >= t_last {
            let dt = time - t_last;
            return Breakpoint {
                amplitude: faded(last.amplitude, dt, fade_time),
                phase: wrap_pi(last.phase + TAU * last.frequency * dt),
                ..last
            };
        }

        // t_first < time < t_last, so both neighbours exist
        let hi = self.find_after(time);
        let (t0, lo) = self.breakpoints[hi - 1];
        if t0 == time {
            return lo;
        }
        let (t1, up) = self.breakpoints[hi];

        let alpha = (time - t0) / (t1 - t0);
        let mut bp = Breakpoint {
            frequency: lerp(lo.frequency, up.frequency, alpha),
            amplitude: lerp(lo.amplitude, up.amplitude, alpha),
            bandwidth: lerp(lo.bandwidth, up.bandwidth, alpha),
            phase: 0.0,
        };

        bp.phase = if lo.is_null() {
            wrap_pi(up.phase - phase_travel(&bp, &up, t1 - time))
        } else {
            wrap_pi(lo.phase + phase_travel(&lo, &bp, time - t0))
        };
        bp
    }
}

impl FromIterator<(f64, Breakpoint)> for Partial {
    fn from_iter<I: IntoIterator<Item = (f64, Breakpoint)>>(iter: I) -> Self {
        let mut partial = Partial::new();
        for (time, bp) in iter {
            partial.insert(time, bp);
        }
        partial
    }
}

#[inline]
fn lerp(a: f64, b: f64, alpha: f64) -> f64 {
    a + alpha * (b - a)
}

#[inline]
fn faded(amplitude: f64, distance: f64, fade_time: f64) -> f64 {
    if distance >= fade_time {
        0.0
    } else {
        amplitude * (1.0 - distance / fade_time)
    }
}
