//! Benchmarks for copy-on-write partial lists.

use std::hint::black_box;

use criterion::{BatchSize, BenchmarkId, Criterion};
use partial_grid::{EnvelopeList, Partial, Resampler};

use super::analysis_like_partial;

const LIST_SIZES: &[usize] = &[16, 128];

fn list_of(size: usize) -> EnvelopeList {
    (0..size).map(|i| analysis_like_partial(256, i as i32)).collect()
}

pub fn bench_envelope_list(c: &mut Criterion) {
    let mut group = c.benchmark_group("partials/list");
    let Ok(resampler) = Resampler::new(0.005) else {
        return;
    };

    for &size in LIST_SIZES {
        let list = list_of(size);

        // Sharing copy vs. the private clone forced by the first write
        group.bench_with_input(BenchmarkId::new("copy", size), &size, |b, _| {
            b.iter(|| black_box(list.clone()))
        });
        group.bench_with_input(BenchmarkId::new("copy_then_write", size), &size, |b, _| {
            b.iter(|| {
                let mut alias = list.clone();
                alias.push_back(Partial::with_label(-1));
                black_box(alias)
            })
        });

        // clear() on a shared list never copies
        group.bench_with_input(BenchmarkId::new("copy_then_clear", size), &size, |b, _| {
            b.iter(|| {
                let mut alias = list.clone();
                alias.clear();
                black_box(alias)
            })
        });

        group.bench_with_input(BenchmarkId::new("extract_half", size), &size, |b, _| {
            b.iter_batched(
                || list_of(size),
                |mut l| l.extract(size / 4..size / 4 + size / 2),
                BatchSize::LargeInput,
            )
        });

        group.bench_with_input(BenchmarkId::new("quantize_all", size), &size, |b, _| {
            b.iter_batched(
                || list.clone(),
                |mut l| {
                    resampler.quantize_all(black_box(&mut l));
                    l
                },
                BatchSize::LargeInput,
            )
        });
    }

    group.finish();
}
