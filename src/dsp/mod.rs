//! Low-level spectral primitives used by the engines.
//!
//! Everything here is sized once at construction and allocation-free
//! afterwards, so these pieces can sit directly inside an engine that runs on
//! the audio thread.

/// Mel-spaced triangular filterbank.
pub mod mel;
/// Circular sample buffers and the quantum cursor.
pub mod ring;
/// Planned forward/inverse real FFT.
pub mod transform;
/// Hann analysis window.
pub mod window;

pub use mel::MelFilterbank;
pub use ring::{Cursor, SampleRing};
pub use transform::RealTransform;
pub use window::HannWindow;

use crate::error::SpectralResult;

/// `vec![value; len]` that reports allocation failure instead of aborting.
pub(crate) fn try_filled<T: Clone>(len: usize, value: T) -> SpectralResult<Vec<T>> {
    let mut buffer = Vec::new();
    buffer.try_reserve_exact(len)?;
    buffer.resize(len, value);
    Ok(buffer)
}
