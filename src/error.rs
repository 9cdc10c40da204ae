// Copyright (c) 2024-present, fjall-rs
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

/// Represents errors that can occur in the hash index
#[derive(Debug)]
pub enum Error {
    /// A constructor parameter was rejected
    InvalidConfig(&'static str),

    /// The key violates its own equality/hash contract
    /// (see [`crate::IndexKey::is_well_formed`])
    InvalidKey,

    /// The requested operation is not supported by the index
    Unsupported(&'static str),

    /// A structural invariant does not hold
    Corrupted(String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "LinHashError: {self:?}")
    }
}

impl std::error::Error for Error {}

/// Index result
pub type Result<T> = std::result::Result<T, Error>;
