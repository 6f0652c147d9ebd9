//! Graph nodes that host the spectral engines.
//!
//! The engines work in fixed quanta; the nodes here adapt them to arbitrary
//! host block lengths so they can be chained with `.through()` and
//! `.vocode()` like any other source or effect.

/// Host block to engine quantum bridging.
pub mod adapter;
/// Fluent combinators (`.through()`, `.vocode()`).
pub mod extensions;
/// Core traits shared by all graph nodes.
pub mod node;
/// STFT engine as an in-place effect.
pub mod spectral;
/// Serial chaining of two nodes (source → effect).
pub mod through;
/// Two-source cross-synthesis node with an optional control handle.
pub mod vocoder;

#[cfg(test)]
pub(crate) mod testing;
