//! Timestamp - Totally ordered MVCC timestamp
//!
//! Ordering is by wall time first, then by the logical counter.
//! `Timestamp::ZERO` sorts before every other timestamp.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A hybrid logical clock timestamp.
#[derive(
    Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Timestamp {
    /// Physical component (nanoseconds, caller-defined epoch)
    pub wall_time: i64,
    /// Logical counter for ordering within one wall time
    pub logical: i32,
}

impl Timestamp {
    /// The zero timestamp. Marks metadata rows at the storage layer.
    pub const ZERO: Timestamp = Timestamp {
        wall_time: 0,
        logical: 0,
    };

    /// Creates a timestamp from both components.
    #[inline]
    pub const fn new(wall_time: i64, logical: i32) -> Self {
        Self { wall_time, logical }
    }

    /// Creates a timestamp with a zero logical component.
    #[inline]
    pub const fn from_wall(wall_time: i64) -> Self {
        Self::new(wall_time, 0)
    }

    /// Returns true for the zero timestamp.
    #[inline]
    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }

    /// Returns true if `self` is strictly earlier than `other`.
    #[inline]
    pub fn less(&self, other: Timestamp) -> bool {
        *self < other
    }

    /// Ratchets `self` up to `other` if `other` is later.
    ///
    /// Returns true if `self` changed.
    pub fn forward(&mut self, other: Timestamp) -> bool {
        if *self < other {
            *self = other;
            true
        } else {
            false
        }
    }

    /// Ratchets `self` down to `other` if `other` is earlier.
    ///
    /// Returns true if `self` changed.
    pub fn backward(&mut self, other: Timestamp) -> bool {
        if other < *self {
            *self = other;
            true
        } else {
            false
        }
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:010}", self.wall_time, self.logical)
    }
}
