//! Snapshot read errors

use thiserror::Error;

/// Result type for snapshot reads
pub type SnapshotResult<T> = Result<T, SnapshotError>;

/// Snapshot read failure.
///
/// Once an iterator reports an error it is unusable and must be closed
/// without further stepping.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SnapshotError {
    /// The underlying storage failed to produce the next row
    #[error("snapshot read failed: {0}")]
    Read(String),

    /// Rows handed to an in-memory iterator were not in storage order
    #[error("snapshot rows out of order at index {0}")]
    Unsorted(usize),
}

impl SnapshotError {
    /// Create a read error.
    pub fn read(message: impl Into<String>) -> Self {
        SnapshotError::Read(message.into())
    }
}
