/*
Grid Resampling
===============

Analysis leaves breakpoints wherever time-frequency reassignment put them.
Exchange formats and most synthesizers want them on a uniform grid instead.
The `Resampler` rewrites partials onto that grid.

  grid     0.00    0.01    0.02    0.03        (interval 0.01)
           |       |       |       |
  source    ●●              ●     ●            0.003 0.004 0.021 0.027
  resample ●───────●───────●───────●           every step, contiguous
  quantize ●───────────────●───────●           0.004 lands on 0.003's step

Vocabulary
----------

  interval        Grid spacing in seconds. Grid instants are integer steps
                  times the interval, computed as `step * interval` so no
                  rounding error accumulates along a long partial.

  resample        Sample the partial at every grid instant covering its
                  extent. Silent stretches come out as null breakpoints, not
                  gaps.

  warped          Same grid, but the grid spans a timing envelope's extent
                  and each instant samples the source at the envelope's value
                  there. Samples falling off the source partial come out null
                  and are trimmed from both ends.

  quantize        Keep the breakpoint count, move each breakpoint to its
                  nearest grid instant. Breakpoints landing on an already
                  used instant are dropped, unless they are nulls: a null
                  marks a phase reset and must survive.

  phase correct   Before resampling or quantizing, phases are re-derived
                  forward from the first breakpoint so they agree with the
                  frequencies. The warped pass keeps recorded phases. In
                  every pass, frequencies are afterwards nudged (within a
                  percentage bound) so that synthesis reaches the new phases.


Replace, Don't Patch
--------------------

Every operation builds a brand-new partial and assigns it over the old one
in a single step, keeping the label. A partial is either fully rewritten or
untouched.
*/

use std::ops::RangeInclusive;

use log::debug;

use crate::collections::EnvelopeList;
use crate::error::{Error, Result};
use crate::model::{fix_frequency, fix_phase_forward, phase_travel, wrap_pi};
use crate::model::{LinearEnvelope, Partial};

/// Frequency correction bound (percent) after `resample`.
pub const DEFAULT_MAX_FIX_PCT: f64 = 20.0;
/// Frequency correction bound (percent) after `quantize`, which moves
/// breakpoints less than resampling does.
pub const QUANTIZE_MAX_FIX_PCT: f64 = 5.0;
/// Fade time used when sampling quantized breakpoints, long enough that the
/// edge breakpoints keep their amplitude.
pub const QUANTIZE_FADE_TIME: f64 = 1.0;

/// Rewrites partial envelopes onto a uniform time grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resampler {
    interval: f64,
    phase_correct: bool,
}

impl Resampler {
    /// Create a phase-correcting resampler with grid spacing `interval`
    /// seconds.
    pub fn new(interval: f64) -> Result<Self> {
        if !(interval.is_finite() && interval > 0.0) {
            return Err(Error::InvalidInterval { interval });
        }
        Ok(Self {
            interval,
            phase_correct: true,
        })
    }

    pub fn with_phase_correct(mut self, phase_correct: bool) -> Self {
        self.phase_correct = phase_correct;
        self
    }

    pub fn interval(&self) -> f64 {
        self.interval
    }

    pub fn phase_correct(&self) -> bool {
        self.phase_correct
    }

    pub fn set_phase_correct(&mut self, phase_correct: bool) {
        self.phase_correct = phase_correct;
    }

    /// Index of the grid instant nearest to `time`.
    pub fn nearest_step(&self, time: f64) -> i64 {
        (time / self.interval).round() as i64
    }

    /// Time of grid instant `step`.
    pub fn grid_time(&self, step: i64) -> f64 {
        step as f64 * self.interval
    }

    // Steps nearest `from` through nearest `until`, never fewer than one.
    fn steps(&self, from: f64, until: f64) -> RangeInclusive<i64> {
        let first = self.nearest_step(from);
        first..=self.nearest_step(until).max(first)
    }

    /// Resample `partial` at every grid instant from the one nearest its
    /// start through the one nearest its end.
    pub fn resample(&self, partial: &mut Partial) {
        if partial.is_empty() {
            return;
        }

        if self.phase_correct {
            let len = partial.num_breakpoints();
            fix_phase_forward(partial, 0..len);
        }

        let mut resampled = Partial::with_label(partial.label());
        for step in self.steps(partial.start_time(), partial.end_time()) {
            let time = self.grid_time(step);
            resampled.insert(time, partial.parameters_at(time));
        }

        if self.phase_correct {
            fix_frequency(&mut resampled, DEFAULT_MAX_FIX_PCT);
        }
        *partial = resampled;
    }

    /// Resample `partial` on the grid spanning `timing`'s control points,
    /// sampling the source at `timing.value_at(t)` for each grid time `t`.
    ///
    /// Null breakpoints at either end of the result are trimmed; interior
    /// nulls are kept. Fails, leaving `partial` untouched, if `timing` has no
    /// control points.
    pub fn resample_warped(&self, partial: &mut Partial, timing: &LinearEnvelope) -> Result<()> {
        let (Some(first), Some(last)) = (timing.first_time(), timing.last_time()) else {
            return Err(Error::EmptyTimingEnvelope);
        };

        // recorded phases are sampled as they are; only frequencies get fixed
        let mut resampled = Partial::with_label(partial.label());
        for step in self.steps(first, last) {
            let time = self.grid_time(step);
            resampled.insert(time, partial.parameters_at(timing.value_at(time)));
        }

        trim_null_ends(&mut resampled);

        if self.phase_correct && !resampled.is_empty() {
            fix_frequency(&mut resampled, DEFAULT_MAX_FIX_PCT);
        }
        *partial = resampled;
        Ok(())
    }

    /// Move each breakpoint of `partial` to its nearest grid instant.
    pub fn quantize(&self, partial: &mut Partial) {
        if self.phase_correct {
            let len = partial.num_breakpoints();
            fix_phase_forward(partial, 0..len);
        }

        let mut quantized = Partial::with_label(partial.label());
        let mut last_step = None;

        for (time, bp) in partial.iter() {
            let step = self.nearest_step(time);
            if last_step == Some(step) && !bp.is_null() {
                continue;
            }

            let qt = self.grid_time(step);
            let mut qbp = partial.parameters_at_with_fade(qt, QUANTIZE_FADE_TIME);

            if bp.is_null() {
                // interpolated phase is only trustworthy moving forward from
                // the null; moving back, roll its phase back instead
                qbp.amplitude = 0.0;
                if qt < time {
                    qbp.phase = wrap_pi(bp.phase - phase_travel(&qbp, bp, time - qt));
                }
            }

            quantized.insert(qt, qbp);
            last_step = Some(step);
        }

        if self.phase_correct {
            fix_frequency(&mut quantized, QUANTIZE_MAX_FIX_PCT);
        }
        *partial = quantized;
    }

    /// [`resample`](Self::resample) every partial, then drop the empty ones.
    pub fn resample_all(&self, partials: &mut EnvelopeList) {
        for partial in partials.iter_mut() {
            self.resample(partial);
        }
        prune_empty(partials, "resample");
    }

    /// [`resample_warped`](Self::resample_warped) every partial, then drop
    /// the empty ones. The timing envelope is checked before any partial is
    /// touched.
    pub fn resample_all_warped(&self, partials: &mut EnvelopeList, timing: &LinearEnvelope) -> Result<()> {
        if timing.is_empty() {
            return Err(Error::EmptyTimingEnvelope);
        }
        for partial in partials.iter_mut() {
            self.resample_warped(partial, timing)?;
        }
        prune_empty(partials, "warped resample");
        Ok(())
    }

    /// [`quantize`](Self::quantize) every partial, then drop the empty ones.
    pub fn quantize_all(&self, partials: &mut EnvelopeList) {
        for partial in partials.iter_mut() {
            self.quantize(partial);
        }
        prune_empty(partials, "quantize");
    }
}

fn trim_null_ends(partial: &mut Partial) {
    let leading = partial.iter().take_while(|(_, bp)| bp.is_null()).count();
    partial.erase(..leading);

    let trailing = partial.iter().rev().take_while(|(_, bp)| bp.is_null()).count();
    let keep = partial.num_breakpoints() - trailing;
    partial.erase(keep..);
}

fn prune_empty(partials: &mut EnvelopeList, pass: &str) {
    let before = partials.len();
    partials.retain(|p| !p.is_empty());
    debug!(
        "{pass}: {} partials kept, {} empty pruned",
        partials.len(),
        before - partials.len()
    );
}
