//! MvccKey - user key plus version timestamp
//!
//! A zero timestamp marks the metadata row of a key. Ordering puts the
//! metadata row first, then versions newest to oldest.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::hlc::Timestamp;

/// A versioned storage key.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MvccKey {
    /// User key
    pub key: Vec<u8>,
    /// Version timestamp; zero for metadata rows
    pub timestamp: Timestamp,
}

impl MvccKey {
    /// Creates a versioned key.
    pub fn new(key: impl Into<Vec<u8>>, timestamp: Timestamp) -> Self {
        Self {
            key: key.into(),
            timestamp,
        }
    }

    /// Creates the metadata key for `key`.
    ///
    /// This is the smallest `MvccKey` for the user key, so seeking to it
    /// positions an iterator at the first row of the key.
    pub fn metadata(key: impl Into<Vec<u8>>) -> Self {
        Self::new(key, Timestamp::ZERO)
    }

    /// Returns true if this key addresses a versioned value.
    #[inline]
    pub fn is_value(&self) -> bool {
        !self.timestamp.is_zero()
    }
}

impl Ord for MvccKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key.cmp(&other.key).then_with(|| {
            match (self.timestamp.is_zero(), other.timestamp.is_zero()) {
                (true, true) => Ordering::Equal,
                (true, false) => Ordering::Less,
                (false, true) => Ordering::Greater,
                (false, false) => other.timestamp.cmp(&self.timestamp),
            }
        })
    }
}

impl PartialOrd for MvccKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for MvccKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(&self.key))?;
        if self.is_value() {
            write!(f, "/{}", self.timestamp)?;
        }
        Ok(())
    }
}

/// One snapshot row.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MvccKeyValue {
    /// Row key
    pub key: MvccKey,
    /// Raw row payload. Encoded `MvccMetadata` for metadata rows.
    pub value: Vec<u8>,
}

impl MvccKeyValue {
    /// Creates a row.
    pub fn new(key: MvccKey, value: impl Into<Vec<u8>>) -> Self {
        Self {
            key,
            value: value.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(k: &str, ts: i64) -> MvccKey {
        MvccKey::new(k.as_bytes().to_vec(), Timestamp::from_wall(ts))
    }

    #[test]
    fn test_metadata_sorts_before_versions() {
        assert!(MvccKey::metadata(b"c".to_vec()) < key("c", 1));
        assert!(MvccKey::metadata(b"c".to_vec()) < key("c", 100));
    }

    #[test]
    fn test_versions_sort_newest_first() {
        assert!(key("c", 11) < key("c", 9));
        assert_eq!(key("c", 9).cmp(&key("c", 9)), Ordering::Equal);
    }

    #[test]
    fn test_user_key_dominates() {
        assert!(key("a", 1) < MvccKey::metadata(b"b".to_vec()));
        assert!(key("a", 100) < key("b", 1));
    }

    #[test]
    fn test_is_value() {
        assert!(!MvccKey::metadata(b"x".to_vec()).is_value());
        assert!(key("x", 3).is_value());
    }

    #[test]
    fn test_display() {
        assert_eq!(MvccKey::metadata(b"k".to_vec()).to_string(), "k");
        assert_eq!(key("k", 2).to_string(), "k/2.0000000000");
    }
}
