// Copyright (c) 2024-present, fjall-rs
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

//! An in-memory hash index implementing Linear Hashing.
//!
//! ##### About
//!
//! This crate exports a `LinHashMap`, the access path a table layer uses for
//! equality lookups. It supports point reads, insertions (with overwrite
//! semantics) and full enumeration; it does not support removal or ordered
//! iteration.
//!
//! Instead of rehashing everything once it becomes overloaded, the index
//! grows by splitting one home bucket at a time. A split pointer walks
//! the directory from left to right; every bucket it passes is split in two
//! using a modulus twice as large. Once all home buckets of a round have been
//! split, the modulus doubles and the split pointer starts over.
//!
//! This bounds the cost of any single insertion, at the expense of uneven
//! bucket occupancy until a growth round completes.
//!
//! Keys implement [`IndexKey`], which requires a hash that is stable across
//! processes. Integers hash to themselves, strings and bytes use XXH3, and
//! [`StableKey`] adapts any [`std::hash::Hash`] type.
//!
//! ```
//! use linhash::{composite_key, Config, CompositeKey};
//!
//! let mut movies = Config::new()
//!     .initial_modulus(4)
//!     .bucket_capacity(4)
//!     .load_factor(0.7)
//!     .build::<CompositeKey, u32>()?;
//!
//! movies.put(composite_key!["Star_Wars", 1977], 124)?;
//! movies.put(composite_key!["Rocky", 1985], 200)?;
//!
//! assert_eq!(Some(&200), movies.get(&composite_key!["Rocky", 1985]));
//! assert_eq!(2, movies.population());
//! assert_eq!(16, movies.capacity());
//! # Ok::<(), linhash::Error>(())
//! ```
//!
//! The index is not internally synchronized. Readers may share it, but
//! writers need exclusive access, which the borrow checker enforces
//! through `&mut self`.

#![deny(clippy::all, missing_docs, clippy::cargo)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::indexing_slicing)]
#![warn(clippy::pedantic, clippy::nursery)]
#![warn(clippy::expect_used)]
#![allow(clippy::missing_const_for_fn)]
#![warn(clippy::multiple_crate_versions)]
#![allow(clippy::option_if_let_else)]
#![warn(clippy::redundant_feature_names)]
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

mod bucket;
mod composite_key;

/// Configuration
pub mod config;

mod error;
mod growth;

#[doc(hidden)]
pub mod hash;

mod iter;
mod key;
mod map;

#[cfg(feature = "metrics")]
mod metrics;

mod verify;

pub use {
    composite_key::{CompositeKey, Component},
    config::Config,
    error::{Error, Result},
    growth::GrowthState,
    iter::{ChainIter, Entries},
    key::{IndexKey, StableKey},
    map::LinHashMap,
};

#[cfg(feature = "metrics")]
pub use metrics::Metrics;
