//! Mel Filterbank - Spectral Envelope Smoothing
//!
//! Projects a linear magnitude spectrum onto a set of overlapping triangular
//! bands spaced evenly on the mel scale, and projects band energies back out
//! to a full-resolution spectrum with the transposed weights.
//!
//! # Mel Scale
//!
//! ```text
//! mel(f) = 1127 · ln(1 + f / 700)
//! f(mel) = 700 · (exp(mel / 1127) - 1)
//! ```
//!
//! Equal steps in mel are narrow at low frequencies and wide at high ones, so
//! the bands follow roughly how pitch resolution falls off with frequency.
//!
//! # Band Layout
//!
//! `num_bands + 2` edges are placed evenly in mel between the lower and upper
//! frequency, then mapped to FFT bin indices. Band `r` is a triangle over
//! edges `r`, `r+1`, `r+2`:
//!
//! ```text
//!  weight
//!    1 ┤        ╱╲      ╱╲
//!      │       ╱  ╲    ╱  ╲
//!    0 ┼──────╱────╲──╱────╲─────── bin
//!          e[r]  e[r+1] e[r+2]
//! ```
//!
//! The outer edges of each triangle carry zero weight, so a bin that sits on
//! a shared edge is never counted twice.
//!
//! # Round Trip
//!
//! `synthesize(analyze(x))` is a smoothing, not an identity: every bin inside
//! the filterbank span is replaced by a blend of the band energies it belongs
//! to. Bins below the first edge and above the last are left untouched.
//!
//! Weights are computed on the fly from the edges; nothing beyond the edge
//! table and two scratch arrays is stored.

use tracing::debug;

use crate::{config::MelBands, dsp::try_filled, error::SpectralResult};

#[inline]
pub fn hz_to_mel(freq: f32) -> f32 {
    1127.0 * (freq / 700.0).ln_1p()
}

#[inline]
pub fn mel_to_hz(mel: f32) -> f32 {
    700.0 * (mel / 1127.0).exp_m1()
}

pub struct MelFilterbank {
    edges: Vec<usize>,
    num_bands: usize,
    bins: usize,
    // scratch for `smooth`
    bands: Vec<f32>,
    reconstructed: Vec<f32>,
}

impl MelFilterbank {
    /// Build the edge table. `bands` must come from [`MelConfig::sanitize`].
    /// Fails if the tables cannot be allocated.
    ///
    /// [`MelConfig::sanitize`]: crate::config::MelConfig::sanitize
    pub fn new(sample_rate: f32, window_size: usize, bands: &MelBands) -> SpectralResult<Self> {
        let num_bands = bands.num_bands;
        let bins = window_size / 2 + 1;
        let max_bin = (window_size / 2) as f32;

        // saturates into an allocation error rather than wrapping
        let mut edges = try_filled(num_bands.saturating_add(2), 0usize)?;
        let band_scratch = try_filled(num_bands, 0.0)?;
        let reconstructed = try_filled(bins, 0.0)?;

        let mel_min = hz_to_mel(bands.freq_min);
        let mel_max = hz_to_mel(bands.freq_max);
        let mel_step = (mel_max - mel_min) / (num_bands + 1) as f32;
        let bin_per_hz = window_size as f32 / sample_rate;

        for (i, edge) in edges.iter_mut().enumerate() {
            let freq = mel_to_hz(mel_min + i as f32 * mel_step);
            let bin = (freq * bin_per_hz).clamp(0.0, max_bin);
            *edge = bin.round() as usize;
        }

        debug!(
            num_bands,
            freq_min = bands.freq_min,
            freq_max = bands.freq_max,
            window_size,
            "built mel filterbank"
        );

        Ok(Self {
            edges,
            num_bands,
            bins,
            bands: band_scratch,
            reconstructed,
        })
    }

    #[inline]
    pub fn num_bands(&self) -> usize {
        self.num_bands
    }

    /// Length of the linear spectrum this filterbank maps.
    #[inline]
    pub fn bins(&self) -> usize {
        self.bins
    }

    /// The `num_bands + 2` bin edges, non-decreasing.
    #[inline]
    pub fn edges(&self) -> &[usize] {
        &self.edges
    }

    /// First and last bin covered by the filterbank.
    #[inline]
    pub fn span(&self) -> (usize, usize) {
        (self.edges[0], self.edges[self.num_bands + 1])
    }

    /// Weight of `bin` in `band`.
    #[inline]
    pub fn weight(&self, band: usize, bin: usize) -> f32 {
        let lo = self.edges[band];
        let peak = self.edges[band + 1];
        let hi = self.edges[band + 2];

        if bin <= lo || bin >= hi {
            0.0
        } else if bin < peak {
            (bin - lo) as f32 / (peak - lo) as f32
        } else if bin == peak {
            1.0
        } else {
            (hi - bin) as f32 / (hi - peak) as f32
        }
    }

    /// Linear magnitudes to band energies.
    ///
    /// `magnitude` must hold at least [`bins`](Self::bins) values and `bands`
    /// at least [`num_bands`](Self::num_bands).
    pub fn analyze(&self, magnitude: &[f32], bands: &mut [f32]) {
        debug_assert!(magnitude.len() >= self.bins, "magnitude shorter than bins");
        debug_assert!(bands.len() >= self.num_bands, "bands shorter than num_bands");
        for (band, energy) in bands.iter_mut().enumerate().take(self.num_bands) {
            let lo = self.edges[band];
            let hi = self.edges[band + 2].min(self.bins - 1);

            *energy = (lo..=hi)
                .map(|bin| self.weight(band, bin) * magnitude[bin])
                .sum();
        }
    }

    /// Band energies back to linear magnitudes via the transposed weights.
    /// Bins outside the filterbank span are copied from `original`.
    ///
    /// `original` and `out` must hold at least [`bins`](Self::bins) values and
    /// `bands` at least [`num_bands`](Self::num_bands).
    pub fn synthesize(&self, bands: &[f32], original: &[f32], out: &mut [f32]) {
        debug_assert!(bands.len() >= self.num_bands, "bands shorter than num_bands");
        debug_assert!(original.len() >= self.bins, "original shorter than bins");
        debug_assert!(out.len() >= self.bins, "out shorter than bins");
        let (first, last) = self.span();
        out[..self.bins].fill(0.0);

        for (band, &energy) in bands.iter().enumerate().take(self.num_bands) {
            if energy == 0.0 {
                continue;
            }
            let lo = self.edges[band];
            let hi = self.edges[band + 2].min(self.bins - 1);
            for bin in lo..=hi {
                out[bin] += self.weight(band, bin) * energy;
            }
        }

        out[..first].copy_from_slice(&original[..first]);
        if last + 1 < self.bins {
            out[last + 1..self.bins].copy_from_slice(&original[last + 1..self.bins]);
        }
    }

    /// Replace `magnitude` with `synthesize(analyze(magnitude))` in place,
    /// using internal scratch. `magnitude` must hold at least
    /// [`bins`](Self::bins) values.
    pub fn smooth(&mut self, magnitude: &mut [f32]) {
        debug_assert!(magnitude.len() >= self.bins, "magnitude shorter than bins");
        let mut bands = std::mem::take(&mut self.bands);
        let mut reconstructed = std::mem::take(&mut self.reconstructed);

        self.analyze(magnitude, &mut bands);
        self.synthesize(&bands, magnitude, &mut reconstructed);
        magnitude[..self.bins].copy_from_slice(&reconstructed);

        self.bands = bands;
        self.reconstructed = reconstructed;
    }
}
