//! Circular sample storage addressed by a quantum cursor.
//!
//! The cursor always sits on a quantum boundary and the ring length is a
//! multiple of the quantum, so a quantum slot never straddles the wrap point.
//! Whole-window reads and overlap-add writes do wrap; that is handled here by
//! splitting into two contiguous spans instead of taking a modulo per sample.

use crate::{dsp::try_filled, error::SpectralResult};

/// Write position shared by every ring of one engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    position: usize,
    quantum: usize,
    len: usize,
}

impl Cursor {
    pub fn new(len: usize, quantum: usize) -> Self {
        Self {
            position: 0,
            quantum,
            len,
        }
    }

    #[inline]
    pub fn position(&self) -> usize {
        self.position
    }

    #[inline]
    pub fn quantum(&self) -> usize {
        self.quantum
    }

    /// Move forward one quantum, wrapping at the ring length.
    #[inline]
    pub fn advance(&mut self) {
        self.position = (self.position + self.quantum) % self.len;
    }

    /// True when the cursor sits on a multiple of `stride`.
    #[inline]
    pub fn is_aligned(&self, stride: usize) -> bool {
        self.position % stride == 0
    }

    pub fn reset(&mut self) {
        self.position = 0;
    }
}

/// Fixed-length circular buffer of samples.
#[derive(Debug, Clone)]
pub struct SampleRing {
    data: Vec<f32>,
}

impl SampleRing {
    pub fn new(len: usize) -> Self {
        Self {
            data: vec![0.0; len],
        }
    }

    /// Like [`new`](Self::new), but fails instead of aborting when the
    /// buffer cannot be allocated.
    pub fn try_new(len: usize) -> SpectralResult<Self> {
        Ok(Self {
            data: try_filled(len, 0.0)?,
        })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The quantum at the cursor.
    #[inline]
    pub fn slot(&self, cursor: &Cursor) -> &[f32] {
        let start = cursor.position();
        &self.data[start..start + cursor.quantum()]
    }

    #[inline]
    pub fn slot_mut(&mut self, cursor: &Cursor) -> &mut [f32] {
        let start = cursor.position();
        &mut self.data[start..start + cursor.quantum()]
    }

    /// `out[i] = window[i] * ring[(start + i) mod len]` over the whole ring.
    pub fn read_windowed(&self, start: usize, window: &[f32], out: &mut [f32]) {
        let (head, tail) = self.data.split_at(start);
        let (window_tail, window_head) = window.split_at(tail.len());
        let (out_tail, out_head) = out.split_at_mut(tail.len());

        for ((o, &x), &w) in out_tail.iter_mut().zip(tail).zip(window_tail) {
            *o = x * w;
        }
        for ((o, &x), &w) in out_head.iter_mut().zip(head).zip(window_head) {
            *o = x * w;
        }
    }

    /// `ring[(start + i) mod len] += gain * frame[i]` over the whole ring.
    pub fn overlap_add(&mut self, start: usize, frame: &[f32], gain: f32) {
        let (head, tail) = self.data.split_at_mut(start);
        let (frame_tail, frame_head) = frame.split_at(tail.len());

        for (o, &x) in tail.iter_mut().zip(frame_tail) {
            *o += gain * x;
        }
        for (o, &x) in head.iter_mut().zip(frame_head) {
            *o += gain * x;
        }
    }

    /// Zero `count` samples starting at `start`, wrapping.
    pub fn clear(&mut self, start: usize, count: usize) {
        let len = self.data.len();
        let start = start % len;
        let first = count.min(len - start);
        self.data[start..start + first].fill(0.0);
        self.data[..count - first].fill(0.0);
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    pub fn reset(&mut self) {
        self.data.fill(0.0);
    }
}
