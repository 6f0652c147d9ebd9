//! Benchmarks for the STFT engine.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use saavy_spectral::{BrickWallLowPass, StftConfig, StftEngine};

use crate::WINDOW_SIZES;

pub fn bench_stft(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/stft");

    for &size in WINDOW_SIZES {
        let config = StftConfig::new(48_000.0, size, size / 4);
        let quantum = config.quantum_size;
        let input: Vec<f32> = (0..size).map(|i| (i as f32 * 0.03).sin()).collect();
        let mut output = vec![0.0f32; quantum];

        // === IDENTITY ===
        // baseline: window → FFT → IFFT → overlap-add
        let mut identity = StftEngine::new(&config).unwrap();
        group.bench_with_input(BenchmarkId::new("identity", size), &size, |b, _| {
            b.iter(|| {
                for chunk in input.chunks(quantum) {
                    identity
                        .process_block(black_box(chunk), black_box(&mut output))
                        .unwrap();
                }
            })
        });

        // === LOW PASS ===
        let mut low_pass = StftEngine::with_op(&config, BrickWallLowPass::for_window(size)).unwrap();
        group.bench_with_input(BenchmarkId::new("low_pass", size), &size, |b, _| {
            b.iter(|| {
                for chunk in input.chunks(quantum) {
                    low_pass
                        .process_block(black_box(chunk), black_box(&mut output))
                        .unwrap();
                }
            })
        });
    }

    group.finish();
}
