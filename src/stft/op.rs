//! Per-hop spectral operations.

use realfft::num_complex::Complex32;

/// Transformation applied to each spectral frame between analysis and
/// synthesis. Runs on the audio thread: must not allocate or block.
pub trait SpectralOp: Send {
    fn apply(&mut self, spectrum: &mut [Complex32]);
}

impl<F> SpectralOp for F
where
    F: FnMut(&mut [Complex32]) + Send,
{
    #[inline]
    fn apply(&mut self, spectrum: &mut [Complex32]) {
        self(spectrum)
    }
}

/// Leaves the spectrum untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct Identity;

impl SpectralOp for Identity {
    #[inline]
    fn apply(&mut self, _spectrum: &mut [Complex32]) {}
}

/// Zeroes every bin at or above `cutoff_bin`.
#[derive(Debug, Clone, Copy)]
pub struct BrickWallLowPass {
    pub cutoff_bin: usize,
}

impl BrickWallLowPass {
    pub fn new(cutoff_bin: usize) -> Self {
        Self { cutoff_bin }
    }

    /// Keep the lowest `window_size / 8` bins.
    pub fn for_window(window_size: usize) -> Self {
        Self::new(window_size / 8)
    }

    /// Cutoff expressed in Hz, rounded down to a bin.
    pub fn from_hz(cutoff_hz: f32, sample_rate: f32, window_size: usize) -> Self {
        let bin = (cutoff_hz.max(0.0) * window_size as f32 / sample_rate) as usize;
        Self::new(bin)
    }

    pub fn set_cutoff_bin(&mut self, cutoff_bin: usize) {
        self.cutoff_bin = cutoff_bin;
    }
}

impl SpectralOp for BrickWallLowPass {
    #[inline]
    fn apply(&mut self, spectrum: &mut [Complex32]) {
        let start = self.cutoff_bin.min(spectrum.len());
        spectrum[start..].fill(Complex32::new(0.0, 0.0));
    }
}
