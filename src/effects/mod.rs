//! Stateless pixel-buffer glitch primitives.

/// Block swaps, random block displacement and block flips.
pub(crate) mod block;
/// Per-channel slide-and-clip shifts.
pub(crate) mod channel;
/// Salt-and-pepper noise.
pub(crate) mod noise;
/// Scanline band overlay.
pub(crate) mod scanlines;
