use std::f32::consts::TAU;

use saavy_spectral::{
    dsp::MelFilterbank,
    graph::{
        extensions::NodeExt,
        node::{GraphNode, RenderCtx},
    },
    EnvelopeFloor, MelConfig, SpectralError, StftConfig, Vocoder, VocoderConfig, VocoderFlags,
};

const SAMPLE_RATE: f32 = 48_000.0;

fn voice_like(len: usize) -> Vec<f32> {
    (0..len)
        .map(|i| {
            let t = i as f32 / SAMPLE_RATE;
            0.6 * (TAU * 220.0 * t).sin() + 0.3 * (TAU * 660.0 * t).sin() + 0.1 * (TAU * 1_320.0 * t).sin()
        })
        .collect()
}

fn saw(len: usize, freq: f32) -> Vec<f32> {
    (0..len)
        .map(|i| {
            let phase = (freq * i as f32 / SAMPLE_RATE).fract();
            2.0 * phase - 1.0
        })
        .collect()
}

fn run(vocoder: &mut Vocoder, modulator: &[f32], carrier: &[f32], flags: VocoderFlags) -> Vec<f32> {
    let quantum = vocoder.config().quantum_size;
    let mut output = vec![0.0f32; modulator.len()];
    for ((m, c), out) in modulator
        .chunks(quantum)
        .zip(carrier.chunks(quantum))
        .zip(output.chunks_mut(quantum))
    {
        vocoder.process_block(m, c, out, flags).unwrap();
    }
    output
}

fn mse(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| (x - y).powi(2)).sum::<f32>() / a.len() as f32
}

fn rms(buffer: &[f32]) -> f32 {
    (buffer.iter().map(|x| x * x).sum::<f32>() / buffer.len() as f32).sqrt()
}

#[test]
fn identical_streams_reproduce_input() {
    let config = VocoderConfig::new(StftConfig::new(SAMPLE_RATE, 1024, 256));
    let mut vocoder = Vocoder::new(&config).unwrap();
    let latency = vocoder.latency();

    let signal = voice_like(8192);
    let output = run(&mut vocoder, &signal, &signal, VocoderFlags::WHITEN_CARRIER);

    let count = signal.len() - latency;
    let error = mse(&output[latency..], &signal[..count]);
    assert!(error < 1e-6, "mse {error}");
}

#[test]
fn mel_smoothed_identity_stays_close() {
    let config = VocoderConfig::new(StftConfig::new(SAMPLE_RATE, 1024, 256))
        .with_mel(MelConfig::new(64, 0.0, SAMPLE_RATE / 2.0));
    let mut vocoder = Vocoder::new(&config).unwrap();
    let latency = vocoder.latency();

    let signal = voice_like(8192);
    let flags = VocoderFlags::WHITEN_CARRIER | VocoderFlags::MEL_SMOOTHING;
    let output = run(&mut vocoder, &signal, &signal, flags);

    let steady = &output[2048 + latency..];
    let reference = &signal[2048..signal.len() - latency];
    assert!(steady.iter().all(|x| x.is_finite()));

    // tolerance: mse below a tenth of the signal power
    let power = rms(reference).powi(2);
    let error = mse(steady, reference);
    assert!(error < 0.1 * power, "mse {error}, power {power}");
}

#[test]
fn unwhitened_identity_squares_magnitudes() {
    let config = VocoderConfig::new(StftConfig::new(SAMPLE_RATE, 1024, 256))
        .with_mel(MelConfig::new(64, 0.0, SAMPLE_RATE / 2.0));
    let mut vocoder = Vocoder::new(&config).unwrap();
    let latency = vocoder.latency();

    let signal = voice_like(8192);
    let output = run(&mut vocoder, &signal, &signal, VocoderFlags::MEL_SMOOTHING);

    let steady = &output[2048 + latency..];
    let reference = &signal[2048..signal.len() - latency];
    let power = rms(reference).powi(2);

    // |X| * X scales every bin by its own magnitude, far from the input
    assert!(steady.iter().all(|x| x.is_finite()));
    assert!(mse(steady, reference) > power);
    assert!(rms(steady) > 10.0 * rms(reference));
}

#[test]
fn modulator_envelope_shapes_carrier() {
    let config = VocoderConfig::new(StftConfig::new(SAMPLE_RATE, 2048, 512));
    let mut vocoder = Vocoder::new(&config).unwrap();

    // modulator present for the first half only
    let mut modulator = voice_like(16384);
    modulator[8192..].fill(0.0);
    let carrier = saw(16384, 110.0);

    let output = run(&mut vocoder, &modulator, &carrier, VocoderFlags::MEL_SMOOTHING);
    let latency = vocoder.latency();

    let voiced = rms(&output[4096..8192 - 2048]);
    let silent = &output[8192 + latency + 2048..];
    assert!(voiced > 0.0, "voiced rms {voiced}");
    assert!(silent.iter().all(|x| x.abs() < 1e-9), "carrier leaked through silence");
}

#[test]
fn envelope_floor_keeps_carrier_alive() {
    let config = VocoderConfig::new(StftConfig::new(SAMPLE_RATE, 1024, 512)).with_floor(EnvelopeFloor::unity());
    let mut vocoder = Vocoder::new(&config).unwrap();
    let latency = vocoder.latency();

    let carrier = saw(8192, 110.0);
    let output = run(&mut vocoder, &vec![0.0; 8192], &carrier, VocoderFlags::NONE);

    let count = carrier.len() - latency;
    let error = mse(&output[latency..], &carrier[..count]);
    assert!(error < 1e-6, "mse {error}");
}

#[test]
fn filterbank_boundary_bins_pass_through() {
    let config = StftConfig::new(SAMPLE_RATE, 1024, 256);
    let bands = MelConfig::new(24, 500.0, 8_000.0).sanitize(SAMPLE_RATE, config.window_size);
    let mut filterbank = MelFilterbank::new(config.sample_rate, config.window_size, &bands).unwrap();

    let edges = filterbank.edges().to_vec();
    assert!(edges.windows(2).all(|pair| pair[0] <= pair[1]));
    assert!(*edges.last().unwrap() <= config.window_size / 2);

    let original: Vec<f32> = (0..config.bins()).map(|i| 1.0 + i as f32).collect();
    let mut smoothed = original.clone();
    filterbank.smooth(&mut smoothed);

    let (low, high) = (edges[0], edges[edges.len() - 1]);
    for bin in (0..low).chain(high + 1..config.bins()) {
        assert_eq!(smoothed[bin], original[bin], "bin {bin}");
    }
}

#[test]
fn invalid_configuration_fails_fast() {
    let bad = [
        StftConfig::new(SAMPLE_RATE, 1000, 500),
        StftConfig::new(SAMPLE_RATE, 256, 512),
        StftConfig::new(0.0, 1024, 512),
        StftConfig::new(SAMPLE_RATE, 1024, 512).with_quantum(1024),
    ];
    for config in bad {
        let result = Vocoder::new(&VocoderConfig::new(config));
        assert!(result.is_err(), "{config:?} accepted");
    }

    let mut vocoder = Vocoder::new(&VocoderConfig::default()).unwrap();
    let mut out = vec![0.0f32; 64];
    let err = vocoder
        .process_block(&[0.0; 64], &[0.0; 64], &mut out, VocoderFlags::NONE)
        .unwrap_err();
    assert!(matches!(err, SpectralError::BlockSizeMismatch { expected: 128, actual: 64 }));
}

#[test]
fn vocode_combinator_renders_any_block_length() {
    let config = VocoderConfig::new(StftConfig::new(SAMPLE_RATE, 1024, 256));
    let mut node = Source::new(voice_like(8192))
        .vocode(Source::new(saw(8192, 110.0)), &config)
        .unwrap()
        .with_flags(VocoderFlags::MEL_SMOOTHING);
    assert_eq!(node.latency(), 1024);

    let ctx = RenderCtx::new(SAMPLE_RATE);
    let mut output = vec![0.0f32; 8192];
    for block in output.chunks_mut(333) {
        node.render_block(block, &ctx);
    }

    // nothing until the first hop has been processed and held
    assert!(output[..256].iter().all(|&x| x == 0.0));
    assert!(rms(&output[2048..]) > 0.0);
    assert!(node.is_active());
}

struct Source {
    samples: Vec<f32>,
    position: usize,
}

impl Source {
    fn new(samples: Vec<f32>) -> Self {
        Self { samples, position: 0 }
    }
}

impl GraphNode for Source {
    fn render_block(&mut self, out: &mut [f32], _ctx: &RenderCtx) {
        for sample in out.iter_mut() {
            *sample = self.samples.get(self.position).copied().unwrap_or(0.0);
            self.position += 1;
        }
    }
}
