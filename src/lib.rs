//! aerodb-rangefeed - Background tasks of the AeroDB rangefeed processor
//!
//! A rangefeed streams committed value changes of a key span plus a
//! resolved timestamp: a lower bound below which no further committed
//! writes will show up. This crate holds the work behind it:
//!
//! - `rangefeed` - the three background tasks, their event model and the
//!   processor handle they report through
//! - `mvcc` - multi-version snapshot rows and the iterator the scans read
//! - `txn` - transaction references and status records
//! - `hlc` - timestamps
//! - `observability` - task lifecycle logging and counters

pub mod hlc;
pub mod mvcc;
pub mod observability;
pub mod rangefeed;
pub mod txn;
