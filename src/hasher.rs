//! Positional weighted-sum hash used to place keys into buckets.
//!
//! Each UTF-16 code unit of the key is multiplied by its one-based position and the
//! products are summed. The sum is reduced modulo the bucket count. This is a checksum,
//! not a well-mixed hash: short keys only ever reach the low end of a large table, and
//! it offers no protection against crafted collisions.

use std::num::NonZeroUsize;

/// Computes the raw positional sum of `key` before reduction.
///
/// Arithmetic wraps, so arbitrarily long keys never overflow.
#[must_use]
pub fn positional_sum(key: &str) -> usize {
    key.encode_utf16().enumerate().fold(0_usize, |sum, (position, unit)| {
        let weight = position.wrapping_add(1);
        sum.wrapping_add(usize::from(unit).wrapping_mul(weight))
    })
}

/// Maps `key` to a bucket index in `[0, capacity)`.
///
/// The index is recomputed from scratch on every call; nothing is cached per entry,
/// which is what lets a resize redistribute keys by simply reinserting them.
#[must_use]
pub fn bucket_index(key: &str, capacity: NonZeroUsize) -> usize {
    positional_sum(key) % capacity
}
