//! # Rangefeed Errors
//!
//! Error types for the rangefeed background tasks.
//!
//! Tasks never retry. They fail fast and hand the error to whoever spawned
//! them; retry and backoff belong to the processor.

use thiserror::Error;
use uuid::Uuid;

use crate::mvcc::SnapshotError;

/// Result type for rangefeed operations
pub type RangefeedResult<T> = Result<T, RangefeedError>;

/// Rangefeed errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RangefeedError {
    // ==================
    // Snapshot Errors
    // ==================
    /// The snapshot iterator failed mid-scan
    #[error(transparent)]
    SnapshotRead(#[from] SnapshotError),

    /// A metadata row could not be decoded
    #[error("unmarshaling mvcc meta at {key}: {reason}")]
    Decode {
        /// Printable key of the offending row
        key: String,
        /// Decoder message
        reason: String,
    },

    // ==================
    // Push Errors
    // ==================
    /// The transaction pusher failed
    #[error("pushing transactions failed: {0}")]
    PushFailed(String),

    /// The pusher answered for a different number of transactions
    #[error("tried to push {requested} transactions, got response for {received}")]
    PushResultMismatch {
        /// Transactions submitted
        requested: usize,
        /// Status records returned
        received: usize,
    },

    /// The push call did not finish in time
    #[error("pushing transactions timed out after {0}ms")]
    PushTimeout(u64),

    /// Submitting intent cleanup failed
    #[error("intent cleanup failed: {0}")]
    CleanupFailed(String),

    // ==================
    // Delivery Errors
    // ==================
    /// The subscriber's sink is gone
    #[error("registration {0} disconnected")]
    RegistrationDisconnected(Uuid),

    /// The processor dropped its event queue
    #[error("event queue closed")]
    EventQueueClosed,

    // ==================
    // Lifecycle Errors
    // ==================
    /// The task observed cancellation
    #[error("task cancelled")]
    Cancelled,

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

impl RangefeedError {
    /// Create a push error.
    pub fn push_failed(message: impl Into<String>) -> Self {
        RangefeedError::PushFailed(message.into())
    }

    /// Create a cleanup error.
    pub fn cleanup_failed(message: impl Into<String>) -> Self {
        RangefeedError::CleanupFailed(message.into())
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        RangefeedError::Config(message.into())
    }

    /// Returns true if the task stopped because it was cancelled.
    pub fn is_cancellation(&self) -> bool {
        matches!(self, RangefeedError::Cancelled)
    }
}
