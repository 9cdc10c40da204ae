// Copyright (c) 2024-present, fjall-rs
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

use crate::IndexKey;
use std::borrow::Borrow;

/// Fixed-capacity holder of key-value entries, plus an overflow chain
///
/// The bucket at the head of a chain is the home bucket owned by the
/// directory; every overflow bucket is owned by its predecessor.
#[derive(Clone, Debug)]
pub struct Bucket<K, V> {
    slots: Vec<(K, V)>,
    capacity: usize,
    overflow: Option<Box<Self>>,
}

impl<K, V> Bucket<K, V> {
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            capacity,
            overflow: None,
        }
    }

    /// Slot capacity of this bucket
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of occupied slots in this bucket (not the chain)
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_full(&self) -> bool {
        self.slots.len() >= self.capacity
    }

    pub fn slots(&self) -> &[(K, V)] {
        &self.slots
    }

    pub fn overflow(&self) -> Option<&Self> {
        self.overflow.as_deref()
    }

    /// Appends the entry to the first free slot.
    ///
    /// Hands the entry back untouched if the bucket is full.
    pub fn try_insert(&mut self, entry: (K, V)) -> Result<(), (K, V)> {
        if self.is_full() {
            Err(entry)
        } else {
            self.slots.push(entry);
            Ok(())
        }
    }

    /// Inserts the entry somewhere in this chain, growing it at the tail if
    /// every bucket is full.
    ///
    /// Does not check for an existing entry with the same key.
    pub fn insert_into_chain(&mut self, entry: (K, V)) {
        let capacity = self.capacity;

        let mut entry = match self.try_insert(entry) {
            Ok(()) => return,
            Err(rejected) => rejected,
        };

        let mut tail = &mut self.overflow;

        while let Some(bucket) = tail {
            entry = match bucket.try_insert(entry) {
                Ok(()) => return,
                Err(rejected) => rejected,
            };
            tail = &mut bucket.overflow;
        }

        *tail = Some(Box::new(Self::overflow_with(capacity, entry)));
    }

    /// Creates an overflow bucket holding a single entry.
    fn overflow_with(capacity: usize, entry: (K, V)) -> Self {
        let mut bucket = Self::new(capacity);
        bucket.slots.push(entry);
        bucket
    }

    /// Number of buckets in this chain, including this one
    pub fn chain_len(&self) -> usize {
        self.chain().count()
    }

    /// Number of entries stored in this chain
    pub fn chain_population(&self) -> usize {
        self.chain().map(Self::len).sum()
    }

    /// Iterates over this bucket and its overflow buckets.
    pub fn chain(&self) -> impl Iterator<Item = &Self> {
        std::iter::successors(Some(self), |b| b.overflow())
    }

    /// Moves every entry of the chain out, leaving an empty single bucket behind.
    pub fn drain_chain(&mut self) -> Vec<(K, V)> {
        let mut entries = std::mem::take(&mut self.slots);
        let mut next = self.overflow.take();

        while let Some(mut bucket) = next {
            entries.append(&mut bucket.slots);
            next = bucket.overflow.take();
        }

        self.slots.reserve(self.capacity);
        entries
    }
}

impl<K: IndexKey, V> Bucket<K, V> {
    /// Scans the chain for `key`, returning the entry and the number of buckets visited.
    pub fn find<Q>(&self, key: &Q) -> (Option<&(K, V)>, usize)
    where
        K: Borrow<Q>,
        Q: IndexKey + ?Sized,
    {
        let mut visited = 0;

        for bucket in self.chain() {
            visited += 1;

            if let Some(entry) = bucket.slots.iter().find(|(k, _)| k.borrow() == key) {
                return (Some(entry), visited);
            }
        }

        (None, visited)
    }

    pub fn find_mut<Q>(&mut self, key: &Q) -> Option<&mut (K, V)>
    where
        K: Borrow<Q>,
        Q: IndexKey + ?Sized,
    {
        let mut next = Some(self);

        while let Some(bucket) = next {
            if let Some(entry) = bucket.slots.iter_mut().find(|(k, _)| k.borrow() == key) {
                return Some(entry);
            }
            next = bucket.overflow.as_deref_mut();
        }

        None
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn bucket_try_insert_full() {
        let mut bucket = Bucket::new(2);
        assert!(bucket.try_insert((1, "a")).is_ok());
        assert!(bucket.try_insert((2, "b")).is_ok());
        assert!(bucket.is_full());

        assert_eq!(Err((3, "c")), bucket.try_insert((3, "c")));
        assert_eq!(2, bucket.len());
        assert!(bucket.overflow().is_none());
    }

    #[test]
    fn bucket_overflow_chain() {
        let mut bucket = Bucket::new(2);
        for i in 0..7 {
            bucket.insert_into_chain((i, i * 10));
        }

        assert_eq!(4, bucket.chain_len());
        assert_eq!(7, bucket.chain_population());

        for i in 0..7 {
            let (entry, _) = bucket.find(&i);
            assert_eq!(Some(&(i, i * 10)), entry);
        }

        // 6 is in the last overflow bucket
        assert_eq!(4, bucket.find(&6).1);
        assert_eq!(1, bucket.find(&0).1);
    }

    #[test]
    fn bucket_find_missing_visits_whole_chain() {
        let mut bucket = Bucket::new(1);
        bucket.insert_into_chain((1, ()));
        bucket.insert_into_chain((2, ()));
        bucket.insert_into_chain((3, ()));

        let (entry, visited) = bucket.find(&4);
        assert!(entry.is_none());
        assert_eq!(3, visited);
    }

    #[test]
    fn bucket_find_mut() {
        let mut bucket = Bucket::new(1);
        bucket.insert_into_chain((1, "a"));
        bucket.insert_into_chain((2, "b"));

        bucket.find_mut(&2).unwrap().1 = "z";
        assert_eq!(Some(&(2, "z")), bucket.find(&2).0);
        assert!(bucket.find_mut(&3).is_none());
    }

    #[test]
    fn bucket_drain_chain() {
        let mut bucket = Bucket::new(2);
        for i in 0..5 {
            bucket.insert_into_chain((i, ()));
        }

        let mut entries = bucket.drain_chain();
        entries.sort_unstable();

        assert_eq!(vec![(0, ()), (1, ()), (2, ()), (3, ()), (4, ())], entries);
        assert_eq!(1, bucket.chain_len());
        assert_eq!(0, bucket.chain_population());
        assert_eq!(2, bucket.capacity());
    }

    #[test]
    fn bucket_drain_empty_chain() {
        let mut bucket = Bucket::<u32, ()>::new(4);
        assert!(bucket.drain_chain().is_empty());
        assert_eq!(1, bucket.chain_len());
    }
}
