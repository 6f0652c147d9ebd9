use std::ops::Range;

/*
Host Blocks vs. Engine Quanta
=============================

The engines consume exactly one quantum per process() call, but a host may
render blocks of any length. The adapter sits between the two:

  host block:   [ 100 ][      300      ][ 28 ]
  quanta:       [   128   ][   128   ][   128   ] ...

For each host sample it writes into the engine's input slot and reads from a
held copy of the engine's last output quantum at the same offset. When the
slot fills, the engine processes and the new output quantum is held.

Reading the held quantum instead of the live output slot costs exactly one
extra quantum of delay and makes the result independent of how the host
splits its blocks.
*/

pub struct QuantumAdapter {
    quantum: usize,
    position: usize,
    held: Vec<f32>,
}

impl QuantumAdapter {
    pub fn new(quantum: usize) -> Self {
        Self {
            quantum,
            position: 0,
            held: vec![0.0; quantum],
        }
    }

    #[inline]
    pub fn quantum(&self) -> usize {
        self.quantum
    }

    /// Offsets within the current quantum covered by the next `remaining`
    /// host samples, stopping at the quantum boundary.
    #[inline]
    pub fn span(&self, remaining: usize) -> Range<usize> {
        let len = remaining.min(self.quantum - self.position);
        self.position..self.position + len
    }

    /// The output quantum produced by the previous process() call.
    #[inline]
    pub fn held(&self) -> &[f32] {
        &self.held
    }

    /// Consume `len` samples. Returns true when the quantum is complete and
    /// the engine must process.
    #[inline]
    pub fn advance(&mut self, len: usize) -> bool {
        self.position += len;
        if self.position == self.quantum {
            self.position = 0;
            true
        } else {
            false
        }
    }

    #[inline]
    pub fn hold(&mut self, output: &[f32]) {
        self.held.copy_from_slice(output);
    }

    pub fn reset(&mut self) {
        self.position = 0;
        self.held.fill(0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_stops_at_quantum_boundary() {
        let mut adapter = QuantumAdapter::new(128);
        assert_eq!(adapter.span(100), 0..100);
        assert!(!adapter.advance(100));

        assert_eq!(adapter.span(300), 100..128);
        assert!(adapter.advance(28));

        assert_eq!(adapter.span(300), 0..128);
    }

    #[test]
    fn test_hold_replaces_output() {
        let mut adapter = QuantumAdapter::new(4);
        assert_eq!(adapter.held(), &[0.0; 4]);
        adapter.hold(&[1.0, 2.0, 3.0, 4.0]);
        assert_eq!(adapter.held(), &[1.0, 2.0, 3.0, 4.0]);

        adapter.reset();
        assert_eq!(adapter.held(), &[0.0; 4]);
    }
}
