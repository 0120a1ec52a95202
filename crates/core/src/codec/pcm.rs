//! Helpers for packing and unpacking little-endian signed PCM samples.

use super::types::AudioBuffer;

/// Reads one sample of `bytes.len()` bytes (1-4), sign-extended to `i32`.
pub(crate) fn read_sample(bytes: &[u8]) -> i32 {
    let width = bytes.len();
    let mut raw = [0u8; 4];
    raw[4 - width..].copy_from_slice(bytes);
    i32::from_le_bytes(raw) >> (8 * (4 - width))
}

/// Appends the low `width` bytes of `value`.
pub(crate) fn push_sample(out: &mut Vec<u8>, value: i32, width: usize) {
    out.extend_from_slice(&value.to_le_bytes()[..width]);
}

/// Appends a full-scale `i32` sample truncated to `width` bytes.
pub(crate) fn push_scaled(out: &mut Vec<u8>, value: i32, width: usize) {
    push_sample(out, value >> (8 * (4 - width)), width);
}

/// Iterates the samples of a buffer in interleaved order.
pub(crate) fn samples(buffer: &AudioBuffer) -> impl Iterator<Item = i32> + '_ {
    buffer
        .data()
        .chunks_exact(buffer.sample_width() as usize)
        .map(read_sample)
}
