//! Construction-time configuration.
//!
//! Every engine is built from one of these immutable descriptions. Sizes are
//! validated up front so a constructed engine never has to check them again on
//! the audio thread; mel parameters are sanitized instead of rejected.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{
    error::{SpectralError, SpectralResult},
    MAX_WINDOW_SIZE, QUANTUM_SIZE,
};

/*
Size Relationships
==================

    quantum  ──  fixed by the host, one process() call per quantum
    hop      ──  stride between analysis passes, a multiple of the quantum
    window   ──  FFT length, a multiple of the hop

    |<──────────────────── window ────────────────────>|
    |<──── hop ────>|<──── hop ────>|  ...
    |<─ q ─>|<─ q ─>|

All three are powers of two and window >= hop >= quantum. With those
constraints the cursor lands on a hop boundary every hop/quantum calls and
wraps after window/quantum calls.
*/

/// Sizes and sample rate for a streaming STFT engine.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StftConfig {
    /// Sample rate in Hz. Only used to map Hz to mel to FFT bins.
    pub sample_rate: f32,
    /// FFT size and analysis window length.
    pub window_size: usize,
    /// Stride between analysis passes.
    pub hop_size: usize,
    /// Per-call I/O granularity, fixed by the host.
    pub quantum_size: usize,
}

impl Default for StftConfig {
    fn default() -> Self {
        Self::new(48_000.0, 2048, 1024)
    }
}

impl StftConfig {
    /// Create a configuration using the default host quantum.
    pub fn new(sample_rate: f32, window_size: usize, hop_size: usize) -> Self {
        Self {
            sample_rate,
            window_size,
            hop_size,
            quantum_size: QUANTUM_SIZE,
        }
    }

    pub fn with_quantum(mut self, quantum_size: usize) -> Self {
        self.quantum_size = quantum_size;
        self
    }

    /// Check every invariant the engines rely on.
    pub fn validate(&self) -> SpectralResult<()> {
        if !self.sample_rate.is_finite() || self.sample_rate <= 0.0 {
            return Err(SpectralError::InvalidSampleRate {
                rate: self.sample_rate,
            });
        }

        for (name, value) in [
            ("window_size", self.window_size),
            ("hop_size", self.hop_size),
            ("quantum_size", self.quantum_size),
        ] {
            if !value.is_power_of_two() {
                return Err(SpectralError::NotPowerOfTwo { name, value });
            }
        }

        if self.window_size > MAX_WINDOW_SIZE {
            return Err(SpectralError::WindowTooLarge {
                value: self.window_size,
                max: MAX_WINDOW_SIZE,
            });
        }

        if self.window_size < self.hop_size || self.hop_size < self.quantum_size {
            return Err(SpectralError::SizeOrder {
                window: self.window_size,
                hop: self.hop_size,
                quantum: self.quantum_size,
            });
        }

        // Implied by the checks above for powers of two.
        if self.window_size % self.hop_size != 0 {
            return Err(SpectralError::NotMultiple {
                name: "window_size",
                value: self.window_size,
                of: self.hop_size,
            });
        }
        if self.hop_size % self.quantum_size != 0 {
            return Err(SpectralError::NotMultiple {
                name: "hop_size",
                value: self.hop_size,
                of: self.quantum_size,
            });
        }

        Ok(())
    }

    /// Number of overlapping frames contributing to every output sample.
    #[inline]
    pub fn hops_per_window(&self) -> usize {
        self.window_size / self.hop_size
    }

    /// Number of complex bins in one spectral frame.
    #[inline]
    pub fn bins(&self) -> usize {
        self.window_size / 2 + 1
    }

    #[inline]
    pub fn nyquist(&self) -> f32 {
        self.sample_rate / 2.0
    }

    /// SOLA gain: `2 / (window / hop)` for Hann overlap, divided by the
    /// window size to undo the unnormalized inverse transform.
    #[inline]
    pub fn normalization(&self) -> f32 {
        2.0 / self.hops_per_window() as f32 / self.window_size as f32
    }

    /// Round-trip delay in samples through an identity pipeline.
    #[inline]
    pub fn latency(&self) -> usize {
        self.window_size - self.quantum_size
    }
}

/// Requested mel filterbank layout, prior to sanitization.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MelConfig {
    /// Number of triangular filters. Zero selects the default of 128.
    pub num_bands: usize,
    /// Lower edge of the filterbank in Hz.
    pub freq_min: f32,
    /// Upper edge of the filterbank in Hz. Anything above Nyquist means Nyquist.
    pub freq_max: f32,
}

pub const DEFAULT_MEL_BANDS: usize = 128;

impl Default for MelConfig {
    fn default() -> Self {
        Self {
            num_bands: DEFAULT_MEL_BANDS,
            freq_min: 0.0,
            freq_max: f32::MAX,
        }
    }
}

/// Mel layout after sanitization against a sample rate. Always usable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MelBands {
    pub num_bands: usize,
    pub freq_min: f32,
    pub freq_max: f32,
}

impl MelConfig {
    pub fn new(num_bands: usize, freq_min: f32, freq_max: f32) -> Self {
        Self {
            num_bands,
            freq_min,
            freq_max,
        }
    }

    /// Resolve this request into a valid band layout for a window of
    /// `window_size` samples. Never fails.
    ///
    /// The band count is capped at the number of spectral bins.
    pub fn sanitize(&self, sample_rate: f32, window_size: usize) -> MelBands {
        let nyquist = sample_rate / 2.0;
        let bins = window_size / 2 + 1;

        let mut num_bands = self.num_bands;
        if num_bands == 0 {
            warn!(default = DEFAULT_MEL_BANDS, "mel band count of 0 replaced");
            num_bands = DEFAULT_MEL_BANDS;
        }
        if num_bands > bins {
            warn!(num_bands, bins, "mel band count above bin count, clamping");
            num_bands = bins;
        }

        let mut freq_min = if self.freq_min.is_finite() {
            self.freq_min
        } else {
            0.0
        };
        let mut freq_max = if self.freq_max.is_nan() {
            nyquist
        } else {
            self.freq_max
        };

        if freq_min > freq_max {
            warn!(freq_min, freq_max, "mel frequency span inverted, swapping");
            std::mem::swap(&mut freq_min, &mut freq_max);
        }
        if freq_min < 0.0 {
            freq_min = 0.0;
        }
        if freq_min > nyquist {
            warn!(freq_min, nyquist, "mel lower edge above nyquist, clamping");
            freq_min = nyquist;
        }
        if freq_max <= 0.0 || freq_max > nyquist {
            freq_max = nyquist;
        }

        MelBands {
            num_bands,
            freq_min,
            freq_max,
        }
    }
}

/// What to do with modulator envelope bins that are (nearly) silent.
///
/// With `Off` a silent modulator mutes the carrier. `Substitute` replaces
/// quiet bins with a fixed gain so the carrier still passes through.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum EnvelopeFloor {
    #[default]
    Off,
    Substitute { threshold: f32, value: f32 },
}

impl EnvelopeFloor {
    /// Replace bins below `f32::EPSILON` with unity gain.
    pub fn unity() -> Self {
        EnvelopeFloor::Substitute {
            threshold: f32::EPSILON,
            value: 1.0,
        }
    }

    #[inline]
    pub fn apply(&self, envelope: &mut [f32]) {
        if let EnvelopeFloor::Substitute { threshold, value } = *self {
            for bin in envelope.iter_mut() {
                if *bin < threshold {
                    *bin = value;
                }
            }
        }
    }
}

/// Full configuration for the cross-synthesis vocoder.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct VocoderConfig {
    pub stft: StftConfig,
    pub mel: MelConfig,
    pub floor: EnvelopeFloor,
}

impl VocoderConfig {
    pub fn new(stft: StftConfig) -> Self {
        Self {
            stft,
            ..Default::default()
        }
    }

    pub fn with_mel(mut self, mel: MelConfig) -> Self {
        self.mel = mel;
        self
    }

    pub fn with_floor(mut self, floor: EnvelopeFloor) -> Self {
        self.floor = floor;
        self
    }
}
