// Copyright (c) 2024-present, fjall-rs
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

use crate::{
    bucket::Bucket,
    growth::{Advance, GrowthState},
    iter::{ChainIter, Entries},
    Config, Error, IndexKey,
};
use std::borrow::Borrow;

#[cfg(feature = "metrics")]
use crate::Metrics;

/// Hash index using the Linear Hashing scheme
///
/// The directory grows by exactly one home bucket per split, so no single
/// insertion ever rehashes the whole structure.
///
/// ```
/// use linhash::LinHashMap;
///
/// let mut map = LinHashMap::new();
///
/// for i in 1..=17u64 {
///     map.put(i, i * i)?;
/// }
///
/// assert_eq!(Some(&49), map.get(&7));
/// assert_eq!(17, map.population());
/// assert!(map.directory_len() > 4);
/// # Ok::<(), linhash::Error>(())
/// ```
#[derive(Debug)]
pub struct LinHashMap<K, V> {
    directory: Vec<Bucket<K, V>>,
    growth: GrowthState,
    bucket_capacity: usize,

    #[cfg(feature = "metrics")]
    metrics: Metrics,
}

impl<K: IndexKey, V> Default for LinHashMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: IndexKey, V> LinHashMap<K, V> {
    /// Creates an empty index with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::from_valid_config(&Config::default())
    }

    /// Creates an empty index.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if a parameter is out of range.
    pub fn with_config(config: &Config) -> crate::Result<Self> {
        config.validate()?;
        Ok(Self::from_valid_config(config))
    }

    fn from_valid_config(config: &Config) -> Self {
        log::debug!(
            "Creating linear hash index with {} home buckets of {} slots, load factor {}",
            config.initial_modulus,
            config.bucket_capacity,
            config.load_factor,
        );

        Self {
            directory: (0..config.initial_modulus)
                .map(|_| Bucket::new(config.bucket_capacity))
                .collect(),
            growth: GrowthState::new(config.initial_modulus, config.load_factor),
            bucket_capacity: config.bucket_capacity,

            #[cfg(feature = "metrics")]
            metrics: Metrics::default(),
        }
    }

    /// Returns the index of the home bucket whose chain holds (or would hold) `key`.
    ///
    /// Lookups and insertions both go through this function.
    pub fn address_of<Q>(&self, key: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: IndexKey + ?Sized,
    {
        self.growth.address(key.stable_hash())
    }

    fn home_bucket<Q>(&self, key: &Q) -> Option<&Bucket<K, V>>
    where
        K: Borrow<Q>,
        Q: IndexKey + ?Sized,
    {
        self.directory.get(self.address_of(key))
    }

    fn home_bucket_mut<Q>(&mut self, key: &Q) -> Option<&mut Bucket<K, V>>
    where
        K: Borrow<Q>,
        Q: IndexKey + ?Sized,
    {
        let idx = self.address_of(key);
        self.directory.get_mut(idx)
    }

    /// Returns the value associated with `key`.
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: IndexKey + ?Sized,
    {
        let (entry, visited) = self.home_bucket(key)?.find(key);

        #[cfg(feature = "metrics")]
        self.metrics.record_lookup(visited);

        #[cfg(not(feature = "metrics"))]
        let _ = visited;

        entry.map(|(_, v)| v)
    }

    /// Returns a mutable reference to the value associated with `key`.
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: IndexKey + ?Sized,
    {
        self.home_bucket_mut(key)?
            .find_mut(key)
            .map(|(_, v)| v)
    }

    /// Returns `true` if the index contains `key`.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: IndexKey + ?Sized,
    {
        self.get(key).is_some()
    }

    /// Inserts a key-value pair, returning the previous value if the key was present.
    ///
    /// An existing entry is overwritten in place. A new entry may trigger
    /// one or more splits before this returns.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidKey`] if the key is not well-formed,
    /// see [`IndexKey::is_well_formed`].
    pub fn put(&mut self, key: K, value: V) -> crate::Result<Option<V>> {
        if !key.is_well_formed() {
            return Err(Error::InvalidKey);
        }

        if let Some((_, slot)) = self
            .home_bucket_mut(&key)
            .and_then(|bucket| bucket.find_mut(&key))
        {
            return Ok(Some(std::mem::replace(slot, value)));
        }

        self.place((key, value));
        self.growth.increment_keys();

        while self.growth.is_overloaded(self.capacity()) {
            self.split();
        }

        Ok(None)
    }

    /// Puts an entry into the chain its key is addressed to.
    ///
    /// Does not update the key count or check the load factor.
    fn place(&mut self, entry: (K, V)) {
        let idx = self.address_of(&entry.0);

        debug_assert!(idx < self.directory.len(), "address out of directory bounds");

        if let Some(bucket) = self.directory.get_mut(idx) {
            bucket.insert_into_chain(entry);
        }
    }

    /// Splits the home bucket at the split pointer.
    ///
    /// Appends one bucket to the directory, advances the growth state and
    /// redistributes the split chain's entries between the split bucket and
    /// the new one. Splitting an empty chain still grows the directory.
    ///
    /// [`LinHashMap::put`] calls this whenever the load factor reaches its
    /// threshold, so calling it by hand is only useful to pre-grow the
    /// directory. Entries stay reachable through [`LinHashMap::get`], and
    /// the home bucket of any key not stored in the split chain is unchanged.
    ///
    /// ```
    /// use linhash::LinHashMap;
    ///
    /// let mut map = LinHashMap::new();
    /// map.put(4u64, "four")?;
    ///
    /// assert_eq!(0, map.growth().split_pointer());
    /// map.split();
    ///
    /// assert_eq!(5, map.directory_len());
    /// assert_eq!(1, map.growth().split_pointer());
    /// assert_eq!(4, map.address_of(&4));
    /// assert_eq!(Some(&"four"), map.get(&4));
    /// # Ok::<(), linhash::Error>(())
    /// ```
    pub fn split(&mut self) {
        let split_idx = self.growth.split_pointer();

        let migrating = self
            .directory
            .get_mut(split_idx)
            .map(Bucket::drain_chain)
            .unwrap_or_default();

        self.directory.push(Bucket::new(self.bucket_capacity));

        match self.growth.advance() {
            Advance::Step => {}
            Advance::RoundComplete => {
                log::debug!(
                    "Linear hashing round complete, low modulus is now {}",
                    self.growth.low_modulus(),
                );
            }
        }

        log::trace!(
            "Split bucket {split_idx}, moving {} entries, directory has {} buckets",
            migrating.len(),
            self.directory.len(),
        );

        for entry in migrating {
            self.place(entry);
        }

        #[cfg(feature = "metrics")]
        self.metrics.record_split();
    }

    /// Removing keys is not supported.
    ///
    /// # Errors
    ///
    /// Always returns [`Error::Unsupported`].
    pub fn remove<Q>(&mut self, _key: &Q) -> crate::Result<Option<V>>
    where
        K: Borrow<Q>,
        Q: IndexKey + ?Sized,
    {
        Err(Error::Unsupported("removal is not supported by linear hash index"))
    }
}

impl<K, V> LinHashMap<K, V> {
    /// Number of stored entries.
    #[must_use]
    pub fn population(&self) -> usize {
        self.growth.key_count()
    }

    /// Total slot capacity of the home buckets (`bucket capacity * directory length`).
    ///
    /// Overflow buckets are not counted.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.bucket_capacity * self.directory.len()
    }

    /// Number of stored entries, same as [`LinHashMap::population`].
    #[must_use]
    pub fn len(&self) -> usize {
        self.population()
    }

    /// Returns `true` if nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.population() == 0
    }

    /// Current ratio of stored entries to slot capacity.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn load_factor(&self) -> f64 {
        self.population() as f64 / self.capacity() as f64
    }

    /// Number of slots per bucket.
    #[must_use]
    pub fn bucket_capacity(&self) -> usize {
        self.bucket_capacity
    }

    /// Number of home buckets.
    #[must_use]
    pub fn directory_len(&self) -> usize {
        self.directory.len()
    }

    /// Growth-control state.
    #[must_use]
    pub fn growth(&self) -> &GrowthState {
        &self.growth
    }

    /// Diagnostic counters.
    #[cfg(feature = "metrics")]
    #[must_use]
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Iterates over all entries, in no particular order.
    #[must_use]
    pub fn entries(&self) -> Entries<'_, K, V> {
        Entries::new(&self.directory)
    }

    /// Same as [`LinHashMap::entries`].
    #[must_use]
    pub fn iter(&self) -> Entries<'_, K, V> {
        self.entries()
    }

    /// Iterates over the entries of the chain at directory index `idx`.
    ///
    /// Returns `None` if `idx` is out of bounds.
    #[must_use]
    pub fn chain(&self, idx: usize) -> Option<ChainIter<'_, K, V>> {
        self.directory.get(idx).map(ChainIter::new)
    }

    /// Number of buckets (home and overflow) in the chain at directory index `idx`.
    #[must_use]
    pub fn chain_len(&self, idx: usize) -> Option<usize> {
        self.directory.get(idx).map(Bucket::chain_len)
    }

    pub(crate) fn directory(&self) -> &[Bucket<K, V>] {
        &self.directory
    }
}

impl<K: std::fmt::Debug, V: std::fmt::Debug> LinHashMap<K, V> {
    /// Renders every bucket chain, one line per home bucket.
    #[must_use]
    pub fn dump(&self) -> String {
        use std::fmt::Write;

        let mut out = String::new();

        for (idx, home) in self.directory.iter().enumerate() {
            let _ = write!(out, "Bucket {idx}:");

            for (n, bucket) in home.chain().enumerate() {
                if n > 0 {
                    out.push_str(" ->");
                }
                out.push_str(" [");
                for (i, (k, v)) in bucket.slots().iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    let _ = write!(out, "{k:?}={v:?}");
                }
                out.push(']');
            }

            out.push('\n');
        }

        out
    }
}

impl<'a, K, V> IntoIterator for &'a LinHashMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Entries<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries()
    }
}
