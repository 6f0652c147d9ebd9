pub mod config; // Engine sizes, mel bands and envelope floor
pub mod dsp; // Window, ring buffers, FFT plans, mel filterbank
pub mod error;
pub mod graph; // Graph nodes hosting the engines
pub mod stft; // Ring-buffered STFT engine with SOLA resynthesis
pub mod vocoder; // Cross-synthesis vocoder

pub use config::{EnvelopeFloor, MelConfig, StftConfig, VocoderConfig};
pub use error::{SpectralError, SpectralResult};
pub use stft::{BrickWallLowPass, Identity, SpectralOp, StftEngine};
pub use vocoder::{Vocoder, VocoderFlags};

/// Samples per host callback quantum.
pub const QUANTUM_SIZE: usize = 128;
pub const MAX_BLOCK_SIZE: usize = 2048;
/// Largest accepted FFT window, about 21 seconds at 48kHz.
pub const MAX_WINDOW_SIZE: usize = 1 << 20;
