// Copyright (c) 2024-present, fjall-rs
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

/// Growth-control state of the directory
///
/// The fields only ever change together, through insertion and splitting,
/// so they are kept in one value.
#[derive(Clone, Debug, PartialEq)]
pub struct GrowthState {
    low_mod: usize,
    high_mod: usize,
    split_pointer: usize,
    key_count: usize,
    threshold: f64,
}

/// What a call to [`GrowthState::advance`] did
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Advance {
    /// The split pointer moved to the next home bucket
    Step,

    /// Every home bucket of the round was split, and a new round started
    RoundComplete,
}

impl GrowthState {
    pub(crate) fn new(initial_modulus: usize, threshold: f64) -> Self {
        Self {
            low_mod: initial_modulus,
            high_mod: initial_modulus * 2,
            split_pointer: 0,
            key_count: 0,
            threshold,
        }
    }

    /// Base modulus of the current round
    #[must_use]
    pub fn low_modulus(&self) -> usize {
        self.low_mod
    }

    /// Modulus used for home buckets already split in this round
    #[must_use]
    pub fn high_modulus(&self) -> usize {
        self.high_mod
    }

    /// Index of the next home bucket to split
    #[must_use]
    pub fn split_pointer(&self) -> usize {
        self.split_pointer
    }

    /// Number of stored entries
    #[must_use]
    pub fn key_count(&self) -> usize {
        self.key_count
    }

    /// Load factor at which a split is triggered
    #[must_use]
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Number of home buckets the directory has in this state.
    #[must_use]
    pub fn directory_len(&self) -> usize {
        self.low_mod + self.split_pointer
    }

    /// Maps a key hash to the index of the home bucket owning it.
    ///
    /// Home buckets below the split pointer were already split in this round,
    /// so their keys are addressed with the higher modulus.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn address(&self, hash: u64) -> usize {
        let idx = (hash % self.low_mod as u64) as usize;

        if idx < self.split_pointer {
            (hash % self.high_mod as u64) as usize
        } else {
            idx
        }
    }

    /// Returns `true` if the load factor has reached the threshold.
    #[allow(clippy::cast_precision_loss)]
    pub(crate) fn is_overloaded(&self, capacity: usize) -> bool {
        (self.key_count as f64 / capacity as f64) >= self.threshold
    }

    pub(crate) fn increment_keys(&mut self) {
        self.key_count += 1;
    }

    /// Moves the split pointer past the home bucket that was just split.
    pub(crate) fn advance(&mut self) -> Advance {
        self.split_pointer += 1;

        if self.split_pointer == self.low_mod {
            self.split_pointer = 0;
            self.low_mod = self.high_mod;
            self.high_mod = self.low_mod * 2;
            Advance::RoundComplete
        } else {
            Advance::Step
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn growth_address_before_split() {
        let state = GrowthState::new(4, 0.7);
        assert_eq!(1, state.address(1));
        assert_eq!(1, state.address(5));
        assert_eq!(0, state.address(8));
        assert_eq!(3, state.address(u64::MAX));
    }

    #[test]
    fn growth_address_after_split() {
        let mut state = GrowthState::new(4, 0.7);
        assert_eq!(Advance::Step, state.advance());

        // Bucket 0 was split: its keys go to 0 or 4
        assert_eq!(0, state.address(8));
        assert_eq!(4, state.address(4));
        assert_eq!(4, state.address(12));

        // Bucket 1 was not split yet
        assert_eq!(1, state.address(5));
    }

    #[test]
    fn growth_round_completes() {
        let mut state = GrowthState::new(4, 0.7);

        for expected_len in 5..8 {
            assert_eq!(Advance::Step, state.advance());
            assert_eq!(expected_len, state.directory_len());
        }

        assert_eq!(Advance::RoundComplete, state.advance());
        assert_eq!(0, state.split_pointer());
        assert_eq!(8, state.low_modulus());
        assert_eq!(16, state.high_modulus());
        assert_eq!(8, state.directory_len());
    }

    #[test]
    fn growth_single_bucket_round() {
        let mut state = GrowthState::new(1, 0.5);
        assert_eq!(0, state.address(7));

        assert_eq!(Advance::RoundComplete, state.advance());
        assert_eq!(2, state.low_modulus());
        assert_eq!(1, state.address(7));
    }

    #[test]
    fn growth_overload() {
        let mut state = GrowthState::new(4, 0.75);
        for _ in 0..11 {
            state.increment_keys();
        }
        assert!(!state.is_overloaded(16));

        state.increment_keys();
        assert!(state.is_overloaded(16));
        assert_eq!(12, state.key_count());
    }
}
