//! Benchmarks for single-partial resampling.

use std::hint::black_box;

use criterion::{BatchSize, BenchmarkId, Criterion};
use partial_grid::{LinearEnvelope, Resampler};

use super::analysis_like_partial;
use crate::BREAKPOINT_COUNTS;

pub fn bench_resample(c: &mut Criterion) {
    let mut group = c.benchmark_group("partials/resample");
    let Ok(resampler) = Resampler::new(0.005) else {
        return;
    };
    let uncorrected = resampler.with_phase_correct(false);

    for &count in BREAKPOINT_COUNTS {
        let source = analysis_like_partial(count, 1);

        // Uniform grid, with and without frequency correction
        group.bench_with_input(BenchmarkId::new("resample", count), &count, |b, _| {
            b.iter_batched(
                || source.clone(),
                |mut p| resampler.resample(black_box(&mut p)),
                BatchSize::SmallInput,
            )
        });
        group.bench_with_input(BenchmarkId::new("resample_uncorrected", count), &count, |b, _| {
            b.iter_batched(
                || source.clone(),
                |mut p| uncorrected.resample(black_box(&mut p)),
                BatchSize::SmallInput,
            )
        });

        // Snap existing breakpoints
        group.bench_with_input(BenchmarkId::new("quantize", count), &count, |b, _| {
            b.iter_batched(
                || source.clone(),
                |mut p| resampler.quantize(black_box(&mut p)),
                BatchSize::SmallInput,
            )
        });

        // Half-speed timing curve over the partial's extent
        let timing: LinearEnvelope = [(0.0, 0.0), (2.0 * source.end_time(), source.end_time())]
            .into_iter()
            .collect();
        group.bench_with_input(BenchmarkId::new("warped", count), &count, |b, _| {
            b.iter_batched(
                || source.clone(),
                |mut p| resampler.resample_warped(black_box(&mut p), black_box(&timing)),
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}
