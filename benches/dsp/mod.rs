//! Benchmarks for low-level spectral primitives.

mod mel;
mod transform;

pub use mel::bench_mel;
pub use transform::bench_transform;
