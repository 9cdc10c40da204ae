// Copyright (c) 2024-present, fjall-rs
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

use crate::hash::hash64;
use std::hash::{Hash, Hasher};

/// Key contract of the index
///
/// Equal keys must produce equal hashes, and neither equality nor the hash
/// may change while the key is stored. The hash must also be stable across
/// processes, which rules out randomly seeded hashers.
pub trait IndexKey: Eq {
    /// Returns the stable hash of the key.
    fn stable_hash(&self) -> u64;

    /// Returns `false` if the key is detectably unable to honor the contract.
    ///
    /// Such keys are rejected on insertion.
    fn is_well_formed(&self) -> bool {
        true
    }
}

macro_rules! impl_integer_key {
    ($($t:ty),* $(,)?) => {
        $(
            impl IndexKey for $t {
                #[allow(
                    clippy::cast_sign_loss,
                    clippy::cast_possible_truncation,
                    clippy::cast_lossless,
                    clippy::unnecessary_cast
                )]
                fn stable_hash(&self) -> u64 {
                    *self as u64
                }
            }
        )*
    };
}

impl_integer_key!(u8, u16, u32, u64, usize, i8, i16, i32, i64, isize);

impl IndexKey for u128 {
    #[allow(clippy::cast_possible_truncation)]
    fn stable_hash(&self) -> u64 {
        (*self as u64) ^ ((*self >> 64) as u64)
    }
}

impl IndexKey for i128 {
    #[allow(clippy::cast_sign_loss)]
    fn stable_hash(&self) -> u64 {
        (*self as u128).stable_hash()
    }
}

impl IndexKey for bool {
    fn stable_hash(&self) -> u64 {
        u64::from(*self)
    }
}

impl IndexKey for char {
    fn stable_hash(&self) -> u64 {
        u64::from(u32::from(*self))
    }
}

impl IndexKey for str {
    fn stable_hash(&self) -> u64 {
        hash64(self.as_bytes())
    }
}

impl IndexKey for String {
    fn stable_hash(&self) -> u64 {
        hash64(self.as_bytes())
    }
}

impl IndexKey for Box<str> {
    fn stable_hash(&self) -> u64 {
        hash64(self.as_bytes())
    }
}

impl IndexKey for [u8] {
    fn stable_hash(&self) -> u64 {
        hash64(self)
    }
}

impl IndexKey for Vec<u8> {
    fn stable_hash(&self) -> u64 {
        hash64(self)
    }
}

impl IndexKey for Box<[u8]> {
    fn stable_hash(&self) -> u64 {
        hash64(self)
    }
}

impl<T: IndexKey + ?Sized> IndexKey for &T {
    fn stable_hash(&self) -> u64 {
        (**self).stable_hash()
    }

    fn is_well_formed(&self) -> bool {
        (**self).is_well_formed()
    }
}

/// Adapts any [`Hash`] type into an [`IndexKey`]
///
/// The hash is computed with `FxHasher`, which is unseeded and therefore
/// gives the same result in every process. The key's `Hash` impl itself
/// must be deterministic for this to hold.
///
/// ```
/// use linhash::{LinHashMap, StableKey};
///
/// let mut map = LinHashMap::new();
/// map.put(StableKey((1u8, "a")), "first")?;
/// assert_eq!(Some(&"first"), map.get(&StableKey((1u8, "a"))));
/// # Ok::<(), linhash::Error>(())
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StableKey<K>(pub K);

impl<K: Hash + Eq> IndexKey for StableKey<K> {
    fn stable_hash(&self) -> u64 {
        let mut hasher = rustc_hash::FxHasher::default();
        self.0.hash(&mut hasher);
        hasher.finish()
    }
}

impl<K> From<K> for StableKey<K> {
    fn from(value: K) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn integer_hash_is_identity() {
        assert_eq!(5, 5u32.stable_hash());
        assert_eq!(17, 17usize.stable_hash());
        assert_eq!(1 % 4, 5i32.stable_hash() % 4);
    }

    #[test]
    fn negative_integer_hash() {
        assert_eq!(u64::MAX, (-1i64).stable_hash());
        assert_eq!((-1i8).stable_hash(), (-1i64).stable_hash());
    }

    #[test]
    fn string_hash_agrees_across_types() {
        let owned = String::from("Star_Wars");
        assert_eq!(owned.stable_hash(), "Star_Wars".stable_hash());
        assert_eq!(owned.stable_hash(), owned.as_bytes().stable_hash());
        assert_eq!(owned.stable_hash(), (&owned).stable_hash());
    }

    #[test]
    fn stable_key_hash_is_deterministic() {
        let a = StableKey(("Rocky", 1985));
        let b = StableKey(("Rocky", 1985));
        assert_eq!(a.stable_hash(), b.stable_hash());
        assert!(a.is_well_formed());
    }
}
