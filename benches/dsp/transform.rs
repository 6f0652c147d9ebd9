//! Benchmarks for planned real FFTs.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use saavy_spectral::dsp::{HannWindow, RealTransform};

use crate::WINDOW_SIZES;

pub fn bench_transform(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/transform");

    for &size in WINDOW_SIZES {
        let mut transform = RealTransform::new(size);
        let window = HannWindow::new(size);
        let signal: Vec<f32> = (0..size).map(|i| (i as f32 * 0.05).sin()).collect();
        let mut frame = vec![0.0f32; size];
        let mut spectrum = transform.make_spectrum();

        group.bench_with_input(BenchmarkId::new("forward", size), &size, |b, _| {
            b.iter(|| {
                for ((out, x), w) in frame.iter_mut().zip(&signal).zip(window.as_slice()) {
                    *out = x * w;
                }
                transform
                    .forward(black_box(&mut frame), black_box(&mut spectrum))
                    .unwrap();
            })
        });

        group.bench_with_input(BenchmarkId::new("round_trip", size), &size, |b, _| {
            b.iter(|| {
                frame.copy_from_slice(&signal);
                transform.forward(&mut frame, &mut spectrum).unwrap();
                transform
                    .inverse(black_box(&mut spectrum), black_box(&mut frame))
                    .unwrap();
            })
        });
    }

    group.finish();
}
