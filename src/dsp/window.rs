//! Hann analysis window.

use std::f64::consts::PI;

use crate::{dsp::try_filled, error::SpectralResult};

/*
Periodic Hann Window
====================

    w[i] = 0.5 * (1 - cos(2π·i / N))      i in [0, N)

The periodic form (divide by N, not N-1) is the one that overlaps cleanly:
shifted copies spaced N/R apart sum to R/2 for any R >= 2. Scaling each copy
by 2/R therefore sums to exactly 1.0 at every phase, which is the COLA
property the overlap-add stage depends on.

    R = 2:   /\  /\          R = 4:   /\/\/\/\
            /  \/  \                 / /\/\/\ \
    sum:  ──────────          sum:  ──────────
*/

/// Precomputed Hann window, built once per engine.
#[derive(Debug, Clone)]
pub struct HannWindow {
    coefficients: Vec<f32>,
}

impl HannWindow {
    pub fn new(len: usize) -> Self {
        let coefficients = (0..len).map(|i| Self::coefficient(i, len)).collect();
        Self { coefficients }
    }

    /// Like [`new`](Self::new), but fails instead of aborting when the table
    /// cannot be allocated.
    pub fn try_new(len: usize) -> SpectralResult<Self> {
        let mut coefficients = try_filled(len, 0.0)?;
        for (i, w) in coefficients.iter_mut().enumerate() {
            *w = Self::coefficient(i, len);
        }
        Ok(Self { coefficients })
    }

    #[inline]
    fn coefficient(i: usize, len: usize) -> f32 {
        (0.5 * (1.0 - (2.0 * PI * i as f64 / len as f64).cos())) as f32
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.coefficients.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.coefficients.is_empty()
    }

    #[inline]
    pub fn as_slice(&self) -> &[f32] {
        &self.coefficients
    }
}
