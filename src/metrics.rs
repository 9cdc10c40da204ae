// Copyright (c) 2024-present, fjall-rs
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering::Relaxed;

/// Diagnostic counters of a hash index
#[derive(Debug, Default)]
pub struct Metrics {
    /// Number of point lookups that were performed
    pub(crate) lookups: AtomicUsize,

    /// Number of buckets (home or overflow) visited by lookups
    pub(crate) buckets_accessed: AtomicUsize,

    /// Number of splits that were performed
    pub(crate) splits: AtomicUsize,
}

#[allow(clippy::cast_precision_loss)]
impl Metrics {
    pub(crate) fn record_lookup(&self, visited: usize) {
        self.lookups.fetch_add(1, Relaxed);
        self.buckets_accessed.fetch_add(visited, Relaxed);
    }

    pub(crate) fn record_split(&self) {
        self.splits.fetch_add(1, Relaxed);
    }

    /// Number of point lookups.
    pub fn lookups(&self) -> usize {
        self.lookups.load(Relaxed)
    }

    /// Number of buckets visited across all lookups.
    pub fn buckets_accessed(&self) -> usize {
        self.buckets_accessed.load(Relaxed)
    }

    /// Number of splits.
    pub fn splits(&self) -> usize {
        self.splits.load(Relaxed)
    }

    /// Average number of buckets visited per lookup (0.0 if nothing was looked up).
    pub fn average_buckets_accessed(&self) -> f64 {
        match self.lookups() {
            0 => 0.0,
            lookups => self.buckets_accessed() as f64 / lookups as f64,
        }
    }

    /// Resets all counters to zero.
    pub fn reset(&self) {
        self.lookups.store(0, Relaxed);
        self.buckets_accessed.store(0, Relaxed);
        self.splits.store(0, Relaxed);
    }
}
