//! Ring-Buffered STFT Engine
//!
//! Drives a short-time Fourier transform from fixed-size quanta supplied by a
//! host audio callback. Each call pushes one quantum of input and pulls one
//! quantum of output; every `hop / quantum` calls a full pass runs:
//!
//! ```text
//!   input ring ──→ Hann ──→ FFT ──→ SpectralOp ──→ IFFT ──→ overlap-add ──→ output ring
//! ```
//!
//! # Usage
//!
//! ```
//! use saavy_spectral::{StftConfig, StftEngine};
//!
//! let mut engine = StftEngine::new(&StftConfig::new(48_000.0, 1024, 256)).unwrap();
//! let input = [0.0f32; 128];
//!
//! engine.input_slot().copy_from_slice(&input);
//! engine.process().unwrap();
//! let output = engine.output_slot().unwrap();
//! assert_eq!(output.len(), 128);
//! ```
//!
//! With the identity operation the output is the input delayed by exactly
//! `window_size - quantum_size` samples.
//!
//! # Realtime Safety
//!
//! All buffers, the window table and the FFT plans are allocated in
//! [`StftEngine::new`]. `input_slot`, `process` and `output_slot` never
//! allocate, lock or block.

pub mod op;
pub mod stream;

use realfft::num_complex::Complex32;
use tracing::debug;

use crate::{
    config::StftConfig,
    dsp::SampleRing,
    error::{SpectralError, SpectralResult},
};

pub use op::{BrickWallLowPass, Identity, SpectralOp};
pub use stream::StreamState;

pub struct StftEngine<Op = Identity> {
    stream: StreamState,
    input: SampleRing,
    spectrum: Vec<Complex32>,
    op: Op,
}

impl StftEngine<Identity> {
    /// Build an engine that resynthesizes its input unchanged.
    pub fn new(config: &StftConfig) -> SpectralResult<Self> {
        Self::with_op(config, Identity)
    }
}

impl<Op: SpectralOp> StftEngine<Op> {
    /// Build an engine that applies `op` to every spectral frame.
    ///
    /// Fails without allocating if the configuration is invalid.
    pub fn with_op(config: &StftConfig, op: Op) -> SpectralResult<Self> {
        let stream = StreamState::new(config)?;
        let input = SampleRing::try_new(config.window_size)?;
        let spectrum = stream.make_spectrum();

        debug!(
            sample_rate = config.sample_rate,
            window_size = config.window_size,
            hop_size = config.hop_size,
            quantum_size = config.quantum_size,
            "created stft engine"
        );

        Ok(Self {
            stream,
            input,
            spectrum,
            op,
        })
    }

    pub fn config(&self) -> &StftConfig {
        self.stream.config()
    }

    /// Round-trip delay in samples for an identity operation.
    pub fn latency(&self) -> usize {
        self.config().latency()
    }

    /// Current cursor position within the window.
    pub fn cursor(&self) -> usize {
        self.stream.cursor().position()
    }

    pub fn op(&self) -> &Op {
        &self.op
    }

    pub fn op_mut(&mut self) -> &mut Op {
        &mut self.op
    }

    /// The quantum the caller must fill before the next [`process`](Self::process).
    pub fn input_slot(&mut self) -> &mut [f32] {
        self.stream.begin_quantum();
        self.input.slot_mut(self.stream.cursor())
    }

    /// The next quantum of output. Only valid after `process()`; reading it
    /// earlier is reported as [`SpectralError::OutputNotReady`].
    pub fn output_slot(&self) -> SpectralResult<&[f32]> {
        self.stream.output_slot()
    }

    /// Advance one quantum, running a full STFT pass on hop boundaries.
    pub fn process(&mut self) -> SpectralResult<()> {
        if !self.stream.advance() {
            return Ok(());
        }

        self.stream.analyze(&self.input, &mut self.spectrum)?;
        self.op.apply(&mut self.spectrum);
        self.stream.synthesize(&mut self.spectrum)
    }

    /// Push one quantum, process, and pull one quantum.
    pub fn process_block(&mut self, input: &[f32], output: &mut [f32]) -> SpectralResult<()> {
        let quantum = self.config().quantum_size;
        for len in [input.len(), output.len()] {
            if len != quantum {
                return Err(SpectralError::BlockSizeMismatch {
                    expected: quantum,
                    actual: len,
                });
            }
        }

        self.input_slot().copy_from_slice(input);
        self.process()?;
        output.copy_from_slice(self.output_slot()?);
        Ok(())
    }

    /// Clear all stream history without reallocating.
    pub fn reset(&mut self) {
        self.stream.reset();
        self.input.reset();
    }
}
