//! Hybrid logical clock timestamps
//!
//! This module provides:
//! - `Timestamp` - Totally ordered MVCC timestamp (wall time + logical counter)
//!
//! The zero timestamp is reserved: storage uses it to mark metadata rows
//! (inline values and intents), and the rangefeed treats inline values as
//! visible at zero.

mod timestamp;

pub use timestamp::Timestamp;
