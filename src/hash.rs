// Copyright (c) 2024-present, fjall-rs
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

/// Multiplier of the composite key fold
pub const FOLD_FACTOR: u64 = 7;

/// Hashes a byte string, stable across runs and platforms.
#[must_use]
pub fn hash64(bytes: &[u8]) -> u64 {
    xxhash_rust::xxh3::xxh3_64(bytes)
}

/// Order-sensitive fold over component hashes: `hash = 7 * hash + component`.
pub fn fold<I: IntoIterator<Item = u64>>(hashes: I) -> u64 {
    hashes.into_iter().fold(0, |acc, h| {
        acc.wrapping_mul(FOLD_FACTOR).wrapping_add(h)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn hash_is_deterministic() {
        assert_eq!(hash64(b"movie"), hash64(b"movie"));
        assert_ne!(hash64(b"movie"), hash64(b"cinema"));
    }

    #[test]
    fn fold_is_order_sensitive() {
        assert_eq!(fold([1, 2]), 9);
        assert_eq!(fold([2, 1]), 15);
        assert_eq!(fold([]), 0);
    }

    #[test]
    fn fold_wraps() {
        assert_eq!(fold([u64::MAX, 1]), u64::MAX.wrapping_mul(7).wrapping_add(1));
    }
}
