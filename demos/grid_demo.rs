//! Grid Demo
//!
//! Takes a few analysis-style partials with irregular breakpoint times and
//! puts them on a 10 ms grid three ways:
//! - resample: every grid step across each partial
//! - quantize: existing breakpoints snapped to their nearest step
//! - warped: resampled through a timing curve that plays at half speed
//!
//! The source list is copied (cheaply) before each pass, so every pass
//! starts from the same partials.
//!
//! Run with: cargo run --example grid_demo

use color_eyre::eyre::{eyre, WrapErr};
use partial_grid::{Breakpoint, EnvelopeList, LinearEnvelope, Partial, Resampler};

fn source_partials() -> EnvelopeList {
    let mut list = EnvelopeList::new();

    // A steady partial with jittery breakpoint times
    let mut steady = Partial::with_label(1);
    for (i, t) in [0.003, 0.011, 0.016, 0.027, 0.034, 0.049].into_iter().enumerate() {
        steady.insert(t, Breakpoint::new(440.0, 0.5 - 0.05 * i as f64, 0.0, 0.0));
    }
    list.push_back(steady);

    // A partial with a gap: the null marks a phase reset
    let mut gapped = Partial::with_label(2);
    gapped.insert(0.002, Breakpoint::new(660.0, 0.3, 0.1, 0.0));
    gapped.insert(0.018, Breakpoint::new(662.0, 0.0, 0.1, 0.0));
    gapped.insert(0.031, Breakpoint::new(661.0, 0.25, 0.1, 1.2));
    gapped.insert(0.044, Breakpoint::new(660.0, 0.2, 0.1, 0.0));
    list.push_back(gapped);

    // Analysis sometimes leaves an empty partial behind; batch passes drop it
    list.push_back(Partial::with_label(3));

    list
}

fn describe(title: &str, list: &EnvelopeList) {
    println!("{title}");
    for partial in list {
        let times: Vec<String> = partial
            .iter()
            .map(|(t, bp)| {
                if bp.is_null() {
                    format!("{t:.3}(null)")
                } else {
                    format!("{t:.3}")
                }
            })
            .collect();
        println!("  partial {}: [{}]", partial.label(), times.join(", "));
    }
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let source = source_partials();
    describe("source", &source);

    let resampler = Resampler::new(0.01).wrap_err("building the 10 ms resampler")?;

    let mut resampled = source.clone();
    resampler.resample_all(&mut resampled);
    describe("resample", &resampled);

    let mut quantized = source.clone();
    resampler.quantize_all(&mut quantized);
    describe("quantize", &quantized);

    // Output time t reads the source at t / 2
    let timing: LinearEnvelope = [(0.0, 0.0), (0.1, 0.05)].into_iter().collect();
    let mut warped = source.clone();
    resampler
        .resample_all_warped(&mut warped, &timing)
        .wrap_err("resampling through the timing curve")?;
    describe("warped (half speed)", &warped);

    if source.len() != 3 {
        return Err(eyre!("source list changed by a pass over a copy"));
    }
    Ok(())
}
