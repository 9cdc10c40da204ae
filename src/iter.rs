// Copyright (c) 2024-present, fjall-rs
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

use crate::bucket::Bucket;

/// Iterator over the entries of a single bucket chain
#[derive(Clone, Debug)]
pub struct ChainIter<'a, K, V> {
    bucket: Option<&'a Bucket<K, V>>,
    slot: usize,
}

impl<'a, K, V> ChainIter<'a, K, V> {
    pub(crate) fn new(home: &'a Bucket<K, V>) -> Self {
        Self {
            bucket: Some(home),
            slot: 0,
        }
    }
}

impl<'a, K, V> Iterator for ChainIter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let bucket = self.bucket?;

            if let Some((k, v)) = bucket.slots().get(self.slot) {
                self.slot += 1;
                return Some((k, v));
            }

            self.bucket = bucket.overflow();
            self.slot = 0;
        }
    }
}

/// Iterator over all entries of an index, in directory order
///
/// Created by [`crate::LinHashMap::entries`].
#[derive(Clone, Debug)]
pub struct Entries<'a, K, V> {
    directory: std::slice::Iter<'a, Bucket<K, V>>,
    current: Option<ChainIter<'a, K, V>>,
}

impl<'a, K, V> Entries<'a, K, V> {
    pub(crate) fn new(directory: &'a [Bucket<K, V>]) -> Self {
        Self {
            directory: directory.iter(),
            current: None,
        }
    }
}

impl<'a, K, V> Iterator for Entries<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(item) = self.current.as_mut().and_then(Iterator::next) {
                return Some(item);
            }

            self.current = Some(ChainIter::new(self.directory.next()?));
        }
    }
}

impl<K, V> std::iter::FusedIterator for Entries<'_, K, V> {}
