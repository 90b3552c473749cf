// SPDX-License-Identifier: PMPL-1.0-or-later
//! Stable hash mixing.
//!
//! Key hashes must be identical across processes and toolchain versions so
//! they can be logged and compared between nodes. `std`'s `DefaultHasher`
//! makes no such promise, so keys are hashed with a plain ×31 polynomial
//! over fixed-width inputs instead.

/// Multiplier used for ordered combination.
pub(crate) const MULTIPLIER: u64 = 31;

/// Seed for ordered sequences and for the key itself.
pub(crate) const SEED: u64 = 1;

/// Fold `value` into `acc` (order-sensitive).
#[inline]
pub(crate) fn mix(acc: u64, value: u64) -> u64 {
    acc.wrapping_mul(MULTIPLIER).wrapping_add(value)
}

/// Ordered hash of a sequence of already-hashed elements.
pub(crate) fn ordered<I>(items: I) -> u64
where
    I: IntoIterator<Item = u64>,
{
    items.into_iter().fold(SEED, mix)
}

pub(crate) fn hash_bytes(data: &[u8]) -> u64 {
    data.iter().fold(0, |acc, b| mix(acc, u64::from(*b)))
}

pub(crate) fn hash_str(s: &str) -> u64 {
    hash_bytes(s.as_bytes())
}

pub(crate) fn hash_bool(b: bool) -> u64 {
    if b {
        1231
    } else {
        1237
    }
}

pub(crate) fn hash_u32(v: u32) -> u64 {
    u64::from(v)
}
