//! Benchmarks for partial resampling and partial lists.

mod envelope_list;
mod resample;

pub use envelope_list::bench_envelope_list;
pub use resample::bench_resample;

use partial_grid::{Breakpoint, Partial};

/// A partial with `count` irregularly spaced breakpoints, 2-5 ms apart,
/// with a slow vibrato and a gap of nulls in the middle.
pub fn analysis_like_partial(count: usize, label: i32) -> Partial {
    let mut partial = Partial::with_label(label);
    let mut time = 0.0031;
    for i in 0..count {
        let wobble = (i as f64 * 0.37).sin();
        let frequency = 440.0 + 6.0 * wobble;
        let amplitude = if i > count / 2 && i < count / 2 + 4 { 0.0 } else { 0.2 + 0.05 * wobble };
        partial.insert(time, Breakpoint::new(frequency, amplitude, 0.1, 0.0));
        time += 0.002 + 0.003 * (0.5 + 0.5 * wobble);
    }
    partial
}
