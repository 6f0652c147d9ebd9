//! Streaming benchmarks for the complete engines.
//!
//! Each iteration pushes one full window of quanta, so every hop inside the
//! window is included in the measured cost.

mod stft;
mod vocoder;

pub use stft::bench_stft;
pub use vocoder::bench_vocoder;
