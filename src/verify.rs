// Copyright (c) 2024-present, fjall-rs
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

//! Structural verification of a hash index.
//!
//! Checks that:
//! - the directory length matches the growth state
//! - the split pointer stays below the low modulus
//! - no bucket holds more entries than its capacity
//! - every entry lives in the chain its key is addressed to
//! - no key is stored twice
//! - the key count matches the number of stored entries

use crate::{Error, IndexKey, LinHashMap};

impl<K: IndexKey, V> LinHashMap<K, V> {
    /// Checks the structural invariants of the index.
    ///
    /// This walks every entry, so it is meant for tests and diagnostics.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Corrupted`] describing the first broken invariant.
    pub fn verify(&self) -> crate::Result<()> {
        let growth = self.growth();
        let directory = self.directory();

        if growth.split_pointer() >= growth.low_modulus() {
            return Err(Error::Corrupted(format!(
                "split pointer {} is not below low modulus {}",
                growth.split_pointer(),
                growth.low_modulus(),
            )));
        }

        if growth.high_modulus() != growth.low_modulus() * 2 {
            return Err(Error::Corrupted(format!(
                "high modulus {} is not twice low modulus {}",
                growth.high_modulus(),
                growth.low_modulus(),
            )));
        }

        if directory.len() != growth.directory_len() {
            return Err(Error::Corrupted(format!(
                "directory has {} buckets, growth state expects {}",
                directory.len(),
                growth.directory_len(),
            )));
        }

        let mut counted = 0;

        for (idx, home) in directory.iter().enumerate() {
            let mut seen: Vec<&K> = Vec::with_capacity(home.chain_population());

            for bucket in home.chain() {
                if bucket.len() > bucket.capacity() {
                    return Err(Error::Corrupted(format!(
                        "bucket in chain {idx} holds {} entries, capacity is {}",
                        bucket.len(),
                        bucket.capacity(),
                    )));
                }

                for (key, _) in bucket.slots() {
                    let addr = self.address_of(key);
                    if addr != idx {
                        return Err(Error::Corrupted(format!(
                            "entry in chain {idx} is addressed to chain {addr}",
                        )));
                    }

                    // NOTE: Keys are only ever placed into their addressed chain,
                    // so duplicates can only occur within one chain
                    if seen.contains(&key) {
                        return Err(Error::Corrupted(format!(
                            "duplicate key in chain {idx}"
                        )));
                    }
                    seen.push(key);
                }
            }

            counted += seen.len();
        }

        if counted != growth.key_count() {
            return Err(Error::Corrupted(format!(
                "key count is {}, but {counted} entries are stored",
                growth.key_count(),
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::{Config, LinHashMap};
    use test_log::test;

    #[test]
    fn verify_empty() -> crate::Result<()> {
        LinHashMap::<u64, ()>::new().verify()
    }

    #[test]
    fn verify_after_many_rounds() -> crate::Result<()> {
        let mut map = Config::new()
            .initial_modulus(2)
            .bucket_capacity(3)
            .load_factor(0.5)
            .build()?;

        for i in 0..2_000u64 {
            map.put(i.wrapping_mul(0x9E37_79B9_7F4A_7C15), i)?;
        }

        map.verify()
    }

    #[test]
    fn verify_string_keys() -> crate::Result<()> {
        let mut map = LinHashMap::new();

        for i in 0..300 {
            map.put(format!("movie-{i}"), i)?;
        }
        for i in 0..300 {
            map.put(format!("movie-{i}"), i + 1)?;
        }

        assert_eq!(300, map.population());
        map.verify()
    }
}
