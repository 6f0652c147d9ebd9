//! Planned real-valued FFT with preallocated scratch.
//!
//! The forward transform turns `N` real samples into `N/2 + 1` complex bins;
//! the inverse goes back and is unnormalized (output is scaled by `N`). Both
//! plans and their scratch space are created once so neither direction
//! allocates after construction.

use std::sync::Arc;

use realfft::{num_complex::Complex32, ComplexToReal, RealFftPlanner, RealToComplex};

use crate::error::SpectralResult;

pub struct RealTransform {
    size: usize,
    forward: Arc<dyn RealToComplex<f32>>,
    inverse: Arc<dyn ComplexToReal<f32>>,
    forward_scratch: Vec<Complex32>,
    inverse_scratch: Vec<Complex32>,
}

impl RealTransform {
    pub fn new(size: usize) -> Self {
        let mut planner = RealFftPlanner::<f32>::new();
        let forward = planner.plan_fft_forward(size);
        let inverse = planner.plan_fft_inverse(size);
        let forward_scratch = forward.make_scratch_vec();
        let inverse_scratch = inverse.make_scratch_vec();

        Self {
            size,
            forward,
            inverse,
            forward_scratch,
            inverse_scratch,
        }
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of complex bins produced by [`forward`](Self::forward).
    #[inline]
    pub fn bins(&self) -> usize {
        self.size / 2 + 1
    }

    /// Allocate a zeroed spectrum of the right length. Construction-time only.
    pub fn make_spectrum(&self) -> Vec<Complex32> {
        self.forward.make_output_vec()
    }

    /// Real samples to complex bins. `time` is used as scratch and left
    /// unspecified.
    pub fn forward(&mut self, time: &mut [f32], spectrum: &mut [Complex32]) -> SpectralResult<()> {
        self.forward
            .process_with_scratch(time, spectrum, &mut self.forward_scratch)?;
        Ok(())
    }

    /// Complex bins to real samples, scaled by `size`. `spectrum` is used as
    /// scratch and left unspecified.
    ///
    /// The DC and Nyquist bins of a real signal have no imaginary part; any
    /// imaginary component left there by spectral processing is dropped.
    pub fn inverse(&mut self, spectrum: &mut [Complex32], time: &mut [f32]) -> SpectralResult<()> {
        if let Some(dc) = spectrum.first_mut() {
            dc.im = 0.0;
        }
        if self.size % 2 == 0 {
            if let Some(nyquist) = spectrum.last_mut() {
                nyquist.im = 0.0;
            }
        }
        self.inverse
            .process_with_scratch(spectrum, time, &mut self.inverse_scratch)?;
        Ok(())
    }
}
