//! Key spans

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::mvcc::MvccKey;

/// A half-open user key range `[start, end)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    /// Inclusive start key
    pub start: Vec<u8>,
    /// Exclusive end key
    pub end: Vec<u8>,
}

impl Span {
    /// Creates a span.
    pub fn new(start: impl Into<Vec<u8>>, end: impl Into<Vec<u8>>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }

    /// Returns true if `key` lies in `[start, end)`.
    pub fn contains(&self, key: &[u8]) -> bool {
        self.start.as_slice() <= key && key < self.end.as_slice()
    }

    /// Seek target for the first row of the span.
    pub fn start_key(&self) -> MvccKey {
        MvccKey::metadata(self.start.clone())
    }

    /// Returns true once an iterator positioned at `key` has left the span.
    pub fn is_past_end(&self, key: &MvccKey) -> bool {
        key.key.as_slice() >= self.end.as_slice()
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}, {})",
            String::from_utf8_lossy(&self.start),
            String::from_utf8_lossy(&self.end)
        )
    }
}
