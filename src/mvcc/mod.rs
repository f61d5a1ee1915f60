//! MVCC Snapshot Types
//!
//! This module provides:
//! - `MvccKey` - User key plus version timestamp, in storage order
//! - `MvccKeyValue` - One row of a multi-version snapshot
//! - `MvccMetadata` - Payload of a metadata row: inline value or intent
//! - `SnapshotIterator` - Seekable read-only cursor over a snapshot
//! - `SliceIterator` - In-memory `SnapshotIterator` over sorted rows
//!
//! # Row layout
//!
//! For one user key, the metadata row (zero timestamp) sorts immediately
//! before the key's versioned values, and versioned values follow in
//! strictly decreasing timestamp order.

mod errors;
mod iterator;
mod key;
mod metadata;
mod slice_iterator;

pub use errors::{SnapshotError, SnapshotResult};
pub use iterator::SnapshotIterator;
pub use key::{MvccKey, MvccKeyValue};
pub use metadata::MvccMetadata;
pub use slice_iterator::SliceIterator;
