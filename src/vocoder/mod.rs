//! Cross-Synthesis Vocoder
//!
//! Imposes the spectral envelope of a modulator (typically a voice) onto a
//! carrier (typically an instrument). Both streams share one cursor, one Hann
//! window, one FFT plan and one output ring; each hop:
//!
//! ```text
//!   modulator ring ──→ Hann ──→ FFT ──→ |X| ──→ [mel smooth] ──→ [floor] ──┐
//!                                                                          ▼
//!   carrier ring   ──→ Hann ──→ FFT ──→ [whiten] ─────────────────────→ (×) ──→ IFFT ──→ overlap-add
//! ```
//!
//! The carrier keeps its phase and fine structure; only its bins are scaled
//! by the modulator magnitude. Mel smoothing blurs that magnitude across
//! triangular bands, giving a softer, formant-like result; without it the
//! effect is sharper and more robotic.
//!
//! By default the carrier's own magnitude is kept, so the output carries the
//! product of both spectra. With [`VocoderFlags::WHITEN_CARRIER`] the carrier
//! is first flattened to unit magnitude, and feeding the same signal to both
//! inputs reproduces it (delayed by `window_size - quantum_size`).
//!
//! # Identity Tolerance
//!
//! With identical modulator and carrier, measured as mean squared error
//! against the delayed input:
//!
//! | flags                              | bound                        |
//! | ---------------------------------- | ---------------------------- |
//! | `WHITEN_CARRIER`                   | `mse < 1e-6`                 |
//! | `WHITEN_CARRIER \| MEL_SMOOTHING`  | `mse < 0.1 × signal power`   |
//! | `NONE` or `MEL_SMOOTHING`          | no bound: magnitudes square  |
//!
//! Mel smoothing replaces each bin's magnitude with a blend of its bands, so
//! the smoothed identity is close but not exact.

mod flags;

pub use flags::VocoderFlags;

use realfft::num_complex::Complex32;
use tracing::debug;

use crate::{
    config::{EnvelopeFloor, StftConfig, VocoderConfig},
    dsp::{try_filled, MelFilterbank, SampleRing},
    error::{SpectralError, SpectralResult},
    stft::StreamState,
};

/// Below this carrier magnitude whitening leaves the bin alone.
const WHITEN_EPSILON: f32 = 1e-20;

pub struct Vocoder {
    stream: StreamState,
    modulator: SampleRing,
    carrier: SampleRing,
    modulator_spectrum: Vec<Complex32>,
    carrier_spectrum: Vec<Complex32>,
    envelope: Vec<f32>,
    filterbank: MelFilterbank,
    floor: EnvelopeFloor,
}

impl Vocoder {
    /// Build a vocoder. Fails without allocating if the sizes are invalid,
    /// and fails cleanly if memory runs out. Mel parameters are sanitized
    /// rather than rejected.
    pub fn new(config: &VocoderConfig) -> SpectralResult<Self> {
        let stft = &config.stft;
        let stream = StreamState::new(stft)?;

        let bands = config.mel.sanitize(stft.sample_rate, stft.window_size);
        let filterbank = MelFilterbank::new(stft.sample_rate, stft.window_size, &bands)?;
        let modulator = SampleRing::try_new(stft.window_size)?;
        let carrier = SampleRing::try_new(stft.window_size)?;
        let envelope = try_filled(stft.bins(), 0.0)?;

        debug!(
            sample_rate = stft.sample_rate,
            window_size = stft.window_size,
            hop_size = stft.hop_size,
            quantum_size = stft.quantum_size,
            mel_bands = bands.num_bands,
            "created vocoder"
        );

        Ok(Self {
            modulator,
            carrier,
            modulator_spectrum: stream.make_spectrum(),
            carrier_spectrum: stream.make_spectrum(),
            envelope,
            filterbank,
            floor: config.floor,
            stream,
        })
    }

    pub fn config(&self) -> &StftConfig {
        self.stream.config()
    }

    pub fn latency(&self) -> usize {
        self.config().latency()
    }

    pub fn cursor(&self) -> usize {
        self.stream.cursor().position()
    }

    pub fn filterbank(&self) -> &MelFilterbank {
        &self.filterbank
    }

    pub fn floor(&self) -> EnvelopeFloor {
        self.floor
    }

    pub fn set_floor(&mut self, floor: EnvelopeFloor) {
        self.floor = floor;
    }

    /// The modulator quantum to fill before the next `process()`.
    pub fn modulator_slot(&mut self) -> &mut [f32] {
        self.stream.begin_quantum();
        self.modulator.slot_mut(self.stream.cursor())
    }

    /// The carrier quantum to fill before the next `process()`.
    pub fn carrier_slot(&mut self) -> &mut [f32] {
        self.stream.begin_quantum();
        self.carrier.slot_mut(self.stream.cursor())
    }

    /// The next quantum of output, valid after `process()`.
    pub fn output_slot(&self) -> SpectralResult<&[f32]> {
        self.stream.output_slot()
    }

    /// Advance one quantum, running a cross-synthesis pass on hop boundaries.
    pub fn process(&mut self, flags: VocoderFlags) -> SpectralResult<()> {
        if !self.stream.advance() {
            return Ok(());
        }

        self.stream
            .analyze(&self.modulator, &mut self.modulator_spectrum)?;
        self.stream.analyze(&self.carrier, &mut self.carrier_spectrum)?;

        for (mag, bin) in self.envelope.iter_mut().zip(&self.modulator_spectrum) {
            *mag = bin.norm();
        }
        if flags.mel_smoothing() {
            self.filterbank.smooth(&mut self.envelope);
        }
        self.floor.apply(&mut self.envelope);

        let whiten = flags.whiten_carrier();
        for (bin, &mag) in self.carrier_spectrum.iter_mut().zip(&self.envelope) {
            let gain = if whiten {
                let norm = bin.norm();
                if norm > WHITEN_EPSILON {
                    mag / norm
                } else {
                    mag
                }
            } else {
                mag
            };
            *bin *= gain;
        }

        self.stream.synthesize(&mut self.carrier_spectrum)
    }

    /// Push one quantum of each input, process, and pull one quantum.
    pub fn process_block(
        &mut self,
        modulator: &[f32],
        carrier: &[f32],
        output: &mut [f32],
        flags: VocoderFlags,
    ) -> SpectralResult<()> {
        let quantum = self.config().quantum_size;
        for len in [modulator.len(), carrier.len(), output.len()] {
            if len != quantum {
                return Err(SpectralError::BlockSizeMismatch {
                    expected: quantum,
                    actual: len,
                });
            }
        }

        self.modulator_slot().copy_from_slice(modulator);
        self.carrier_slot().copy_from_slice(carrier);
        self.process(flags)?;
        output.copy_from_slice(self.output_slot()?);
        Ok(())
    }

    /// Clear all stream history without reallocating.
    pub fn reset(&mut self) {
        self.stream.reset();
        self.modulator.reset();
        self.carrier.reset();
    }
}
