// Copyright (c) 2024-present, fjall-rs
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

use crate::{Error, IndexKey, LinHashMap};

/// Default number of home buckets
pub const DEFAULT_INITIAL_MODULUS: usize = 4;

/// Default number of slots per bucket
pub const DEFAULT_BUCKET_CAPACITY: usize = 4;

/// Default load factor threshold
pub const DEFAULT_LOAD_FACTOR: f64 = 0.7;

/// Index configuration builder
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    /// Number of home buckets the directory starts with
    ///
    /// This is the low modulus of the first growth round.
    pub initial_modulus: usize,

    /// Number of entries each bucket (home or overflow) holds
    pub bucket_capacity: usize,

    /// Load factor (entries / slot capacity) at which buckets are split
    pub load_factor: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            initial_modulus: DEFAULT_INITIAL_MODULUS,
            bucket_capacity: DEFAULT_BUCKET_CAPACITY,
            load_factor: DEFAULT_LOAD_FACTOR,
        }
    }
}

impl Config {
    /// Initializes a new config with the default parameters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the initial number of home buckets.
    ///
    /// Conventionally a small power of two.
    ///
    /// Defaults to 4.
    #[must_use]
    pub fn initial_modulus(mut self, n: usize) -> Self {
        self.initial_modulus = n;
        self
    }

    /// Sets the number of slots per bucket.
    ///
    /// Defaults to 4.
    #[must_use]
    pub fn bucket_capacity(mut self, n: usize) -> Self {
        self.bucket_capacity = n;
        self
    }

    /// Sets the load factor threshold.
    ///
    /// Lower values split earlier, trading memory for shorter overflow chains.
    /// The threshold may not be lower than `1 / bucket_capacity`, so that a
    /// single insertion splits at most one bucket.
    ///
    /// Defaults to 0.7.
    #[must_use]
    pub fn load_factor(mut self, ratio: f64) -> Self {
        self.load_factor = ratio;
        self
    }

    /// Smallest accepted load factor for the configured bucket capacity.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn min_load_factor(&self) -> f64 {
        1.0 / self.bucket_capacity.max(1) as f64
    }

    /// Checks the parameters.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if a parameter is out of range.
    pub fn validate(&self) -> crate::Result<()> {
        if self.initial_modulus == 0 {
            return Err(Error::InvalidConfig("initial modulus must be at least 1"));
        }

        if self.bucket_capacity == 0 {
            return Err(Error::InvalidConfig("bucket capacity must be at least 1"));
        }

        // NOTE: A zero threshold would split forever
        if !self.load_factor.is_finite() || self.load_factor <= 0.0 {
            return Err(Error::InvalidConfig(
                "load factor must be a finite number greater than 0",
            ));
        }

        if self.load_factor < self.min_load_factor() {
            return Err(Error::InvalidConfig(
                "load factor must be at least 1 / bucket capacity",
            ));
        }

        Ok(())
    }

    /// Creates an empty index with this configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if a parameter is out of range.
    pub fn build<K: IndexKey, V>(self) -> crate::Result<LinHashMap<K, V>> {
        LinHashMap::with_config(&self)
    }
}
