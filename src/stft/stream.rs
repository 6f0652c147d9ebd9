//! Shared streaming state: cursor, output ring and the analysis/synthesis
//! halves of one STFT pass.

use realfft::num_complex::Complex32;

use crate::{
    config::StftConfig,
    dsp::{try_filled, Cursor, HannWindow, RealTransform, SampleRing},
    error::{SpectralError, SpectralResult},
};

/*
Synthesis Overlap-Add
=====================

Every hop a full window is analyzed and synthesized. The synthesized frame is
added into the output ring starting at the cursor, so each output sample
collects window/hop overlapping frames before the cursor reaches it:

  cursor ─┐
          ▼
  output  [ settled | ...accumulating... | fresh ]
          │<── read next ──>│             │<hop>│
                                           cleared, then receives its first frame

Just before adding, the hop that ends at the cursor is cleared. Those samples
were read during the previous hop and are now reused as the tail of the new
frame. Output at the cursor is therefore complete when it is read, which
fixes the round-trip delay at window - quantum samples.

Gain is 2/(window/hop) for the Hann overlap sum and 1/window for the
unnormalized inverse FFT.
*/

pub struct StreamState {
    config: StftConfig,
    cursor: Cursor,
    output: SampleRing,
    window: HannWindow,
    transform: RealTransform,
    frame: Vec<f32>,
    gain: f32,
    output_ready: bool,
}

impl StreamState {
    pub fn new(config: &StftConfig) -> SpectralResult<Self> {
        config.validate()?;

        // plain buffers first so an allocation failure is reported before
        // the FFT is planned
        let window_size = config.window_size;
        let output = SampleRing::try_new(window_size)?;
        let window = HannWindow::try_new(window_size)?;
        let frame = try_filled(window_size, 0.0)?;

        Ok(Self {
            config: *config,
            cursor: Cursor::new(window_size, config.quantum_size),
            output,
            window,
            transform: RealTransform::new(window_size),
            frame,
            gain: config.normalization(),
            output_ready: false,
        })
    }

    #[inline]
    pub fn config(&self) -> &StftConfig {
        &self.config
    }

    #[inline]
    pub fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    pub fn window(&self) -> &HannWindow {
        &self.window
    }

    /// A zeroed spectrum buffer sized for this stream.
    pub fn make_spectrum(&self) -> Vec<Complex32> {
        self.transform.make_spectrum()
    }

    /// Called whenever an input slot is handed out.
    #[inline]
    pub fn begin_quantum(&mut self) {
        self.output_ready = false;
    }

    /// Advance one quantum. Returns true when the cursor lands on a hop
    /// boundary and a full analysis/synthesis pass is due.
    #[inline]
    pub fn advance(&mut self) -> bool {
        self.cursor.advance();
        self.output_ready = true;
        self.cursor.is_aligned(self.config.hop_size)
    }

    /// Window the most recent `window_size` samples of `input` and transform
    /// them into `spectrum`.
    pub fn analyze(&mut self, input: &SampleRing, spectrum: &mut [Complex32]) -> SpectralResult<()> {
        input.read_windowed(
            self.cursor.position(),
            self.window.as_slice(),
            &mut self.frame,
        );
        self.transform.forward(&mut self.frame, spectrum)
    }

    /// Transform `spectrum` back to time and overlap-add it at the cursor.
    pub fn synthesize(&mut self, spectrum: &mut [Complex32]) -> SpectralResult<()> {
        self.transform.inverse(spectrum, &mut self.frame)?;

        let window_size = self.config.window_size;
        let hop_size = self.config.hop_size;
        let position = self.cursor.position();

        self.output
            .clear(position + window_size - hop_size, hop_size);
        self.output.overlap_add(position, &self.frame, self.gain);
        Ok(())
    }

    /// The settled quantum at the cursor.
    pub fn output_slot(&self) -> SpectralResult<&[f32]> {
        if !self.output_ready {
            return Err(SpectralError::OutputNotReady);
        }
        Ok(self.output.slot(&self.cursor))
    }

    pub fn reset(&mut self) {
        self.cursor.reset();
        self.output.reset();
        self.frame.fill(0.0);
        self.output_ready = false;
    }
}
