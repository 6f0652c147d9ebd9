//! Benchmarks for mel filterbank projections.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use saavy_spectral::{dsp::MelFilterbank, MelConfig};

use crate::WINDOW_SIZES;

pub fn bench_mel(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/mel");
    let sample_rate = 48_000.0;

    for &size in WINDOW_SIZES {
        let bins = size / 2 + 1;
        let magnitude: Vec<f32> = (0..bins).map(|i| 1.0 / (1.0 + i as f32)).collect();

        for num_bands in [40, 128] {
            let bands = MelConfig::new(num_bands, 0.0, f32::MAX).sanitize(sample_rate, size);
            let mut filterbank = MelFilterbank::new(sample_rate, size, &bands).unwrap();
            let mut working = magnitude.clone();

            group.bench_with_input(
                BenchmarkId::new(format!("smooth_{num_bands}"), size),
                &size,
                |b, _| {
                    b.iter(|| {
                        working.copy_from_slice(&magnitude);
                        filterbank.smooth(black_box(&mut working));
                    })
                },
            );
        }
    }

    group.finish();
}
