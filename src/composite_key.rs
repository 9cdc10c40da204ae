// Copyright (c) 2024-present, fjall-rs
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

use crate::{
    hash::{fold, hash64},
    IndexKey,
};
use std::cmp::Ordering;

/// A single attribute value of a [`CompositeKey`]
#[derive(Clone, Debug)]
pub enum Component {
    /// Integer attribute
    Int(i64),

    /// Floating point attribute
    Float(f64),

    /// Character attribute
    Char(char),

    /// String attribute
    Str(String),
}

impl Component {
    // Cross-kind comparisons order by kind
    fn rank(&self) -> u8 {
        match self {
            Self::Int(_) => 0,
            Self::Float(_) => 1,
            Self::Char(_) => 2,
            Self::Str(_) => 3,
        }
    }

    fn hash(&self) -> u64 {
        match self {
            Self::Int(v) => v.stable_hash(),
            Self::Float(v) => v.to_bits(),
            Self::Char(v) => v.stable_hash(),
            Self::Str(v) => hash64(v.as_bytes()),
        }
    }
}

impl PartialEq for Component {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Component {}

impl PartialOrd for Component {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Component {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => a.cmp(b),
            (Self::Float(a), Self::Float(b)) => a.total_cmp(b),
            (Self::Char(a), Self::Char(b)) => a.cmp(b),
            (Self::Str(a), Self::Str(b)) => a.cmp(b),
            (a, b) => a.rank().cmp(&b.rank()),
        }
    }
}

impl std::fmt::Display for Component {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Char(v) => write!(f, "{v}"),
            Self::Str(v) => write!(f, "{v}"),
        }
    }
}

impl From<i64> for Component {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for Component {
    fn from(value: i32) -> Self {
        Self::Int(value.into())
    }
}

impl From<f64> for Component {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<char> for Component {
    fn from(value: char) -> Self {
        Self::Char(value)
    }
}

impl From<&str> for Component {
    fn from(value: &str) -> Self {
        Self::Str(value.into())
    }
}

impl From<String> for Component {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

/// Key made of a fixed, ordered list of attribute values
///
/// Used as the key type of multi-attribute indexes, e.g. a movie keyed by
/// `(title, year)`. Keys compare lexicographically, and hash with the fold
/// `hash = 7 * hash + component_hash`.
///
/// ```
/// use linhash::composite_key;
///
/// let a = composite_key!["Star_Wars_2", 1980];
/// let b = composite_key!["Rocky", 1985];
/// let c = composite_key!["Star_Wars_2", 1980];
///
/// assert!(b < a);
/// assert_eq!(a, c);
/// assert_eq!("Key ( Star_Wars_2 1980 )", a.to_string());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct CompositeKey(Vec<Component>);

impl CompositeKey {
    /// Creates a key from its components.
    #[must_use]
    pub fn new(components: Vec<Component>) -> Self {
        Self(components)
    }

    /// Returns the components of the key.
    #[must_use]
    pub fn components(&self) -> &[Component] {
        &self.0
    }

    /// Returns the number of components.
    #[must_use]
    pub fn arity(&self) -> usize {
        self.0.len()
    }
}

impl From<Vec<Component>> for CompositeKey {
    fn from(value: Vec<Component>) -> Self {
        Self(value)
    }
}

impl IndexKey for CompositeKey {
    fn stable_hash(&self) -> u64 {
        fold(self.0.iter().map(Component::hash))
    }

    fn is_well_formed(&self) -> bool {
        !self.0.is_empty()
            && self
                .0
                .iter()
                .all(|c| !matches!(c, Component::Float(v) if v.is_nan()))
    }
}

impl std::fmt::Display for CompositeKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Key (")?;
        for component in &self.0 {
            write!(f, " {component}")?;
        }
        write!(f, " )")
    }
}

/// Builds a [`CompositeKey`] from a list of values convertible into [`Component`]s.
#[macro_export]
macro_rules! composite_key {
    ($($component:expr),* $(,)?) => {
        $crate::CompositeKey::new(vec![$($crate::Component::from($component)),*])
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn composite_key_ordering() {
        let key1 = composite_key!["Star_Wars_2", 1980];
        let key2 = composite_key!["Rocky", 1985];
        let key3 = composite_key!["Star_Wars_2", 1980];

        assert!(key2 < key1);
        assert!(key1 > key2);
        assert_eq!(Ordering::Equal, key1.cmp(&key3));
        assert_eq!(key1, key3);
        assert_ne!(key1, key2);
    }

    #[test]
    fn composite_key_hash() {
        let key1 = composite_key!["Star_Wars_2", 1980];
        let key3 = composite_key!["Star_Wars_2", 1980];
        assert_eq!(key1.stable_hash(), key3.stable_hash());

        let ints = composite_key![1, 2];
        assert_eq!(9, ints.stable_hash());

        let swapped = composite_key![2, 1];
        assert_ne!(ints.stable_hash(), swapped.stable_hash());
    }

    #[test]
    fn composite_key_mixed_kinds() {
        let a = composite_key![1];
        let b = composite_key!['a'];
        let c = composite_key!["a"];
        assert!(a < b);
        assert!(b < c);
    }

    #[test]
    fn composite_key_well_formed() {
        assert!(composite_key!["Carrie_Fisher", 'F', 1.5].is_well_formed());
        assert!(!CompositeKey::new(vec![]).is_well_formed());
        assert!(!composite_key![f64::NAN].is_well_formed());
    }

    #[test]
    fn composite_key_display() {
        let key = composite_key!["Mark_Hamill", 'M'];
        assert_eq!("Key ( Mark_Hamill M )", key.to_string());
        assert_eq!(2, key.arity());
    }
}
