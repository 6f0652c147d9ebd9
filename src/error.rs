//! Error types for the spectral engines.

use std::collections::TryReserveError;

use thiserror::Error;

/// Result type for spectral engine operations.
pub type SpectralResult<T> = Result<T, SpectralError>;

/// Errors reported by engine construction and the block-level API boundary.
///
/// Configuration errors are only produced at construction; a successfully
/// built engine never allocates again and its per-quantum path can only fail
/// with [`SpectralError::Transform`].
#[derive(Debug, Error)]
pub enum SpectralError {
    /// Sample rate is zero, negative or not finite.
    #[error("invalid sample rate: {rate}")]
    InvalidSampleRate {
        /// The rejected sample rate.
        rate: f32,
    },

    /// A size parameter is zero or not a power of two.
    #[error("{name} must be a non-zero power of two, got {value}")]
    NotPowerOfTwo {
        /// Parameter name.
        name: &'static str,
        /// The rejected value.
        value: usize,
    },

    /// The sizes violate `window >= hop >= quantum`.
    #[error("expected window ({window}) >= hop ({hop}) >= quantum ({quantum})")]
    SizeOrder {
        /// Window size in samples.
        window: usize,
        /// Hop size in samples.
        hop: usize,
        /// Quantum size in samples.
        quantum: usize,
    },

    /// A size is not an integer multiple of the next smaller size.
    #[error("{name} ({value}) is not a multiple of {of}")]
    NotMultiple {
        /// Parameter name.
        name: &'static str,
        /// The rejected value.
        value: usize,
        /// The required divisor.
        of: usize,
    },

    /// The window exceeds [`MAX_WINDOW_SIZE`](crate::MAX_WINDOW_SIZE).
    #[error("window_size {value} exceeds the maximum of {max}")]
    WindowTooLarge {
        /// The rejected window size.
        value: usize,
        /// Largest supported window size.
        max: usize,
    },

    /// Memory for an engine buffer could not be obtained.
    #[error("buffer allocation failed: {0}")]
    Allocation(#[from] TryReserveError),

    /// A caller-supplied block does not match the engine's quantum.
    #[error("block size mismatch: expected {expected} samples, got {actual}")]
    BlockSizeMismatch {
        /// Quantum size of the engine.
        expected: usize,
        /// Length of the supplied block.
        actual: usize,
    },

    /// The output slot was read before the paired `process()` call.
    #[error("output slot read before process()")]
    OutputNotReady,

    /// The FFT library rejected its buffers.
    #[error("transform failed: {0}")]
    Transform(#[from] realfft::FftError),
}

impl SpectralError {
    /// Returns true for errors caused by misusing the block API rather than by
    /// configuration.
    pub fn is_misuse(&self) -> bool {
        matches!(
            self,
            SpectralError::BlockSizeMismatch { .. } | SpectralError::OutputNotReady
        )
    }
}
