//! Benchmarks for the cross-synthesis vocoder.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use saavy_spectral::{StftConfig, Vocoder, VocoderConfig, VocoderFlags};

use crate::WINDOW_SIZES;

pub fn bench_vocoder(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/vocoder");

    for &size in WINDOW_SIZES {
        let config = VocoderConfig::new(StftConfig::new(48_000.0, size, size / 2));
        let quantum = config.stft.quantum_size;
        let modulator: Vec<f32> = (0..size).map(|i| (i as f32 * 0.02).sin()).collect();
        let carrier: Vec<f32> = (0..size).map(|i| (i % 100) as f32 / 50.0 - 1.0).collect();
        let mut output = vec![0.0f32; quantum];

        for (name, flags) in [
            ("sharp", VocoderFlags::NONE),
            ("mel_smoothed", VocoderFlags::MEL_SMOOTHING),
        ] {
            let mut vocoder = Vocoder::new(&config).unwrap();
            group.bench_with_input(BenchmarkId::new(name, size), &size, |b, _| {
                b.iter(|| {
                    for (m, c) in modulator.chunks(quantum).zip(carrier.chunks(quantum)) {
                        vocoder
                            .process_block(black_box(m), black_box(c), black_box(&mut output), flags)
                            .unwrap();
                    }
                })
            });
        }
    }

    group.finish();
}
