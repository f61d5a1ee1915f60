//! # Rangefeed Events
//!
//! Logical operations describing intent lifecycle, the events that carry
//! them to the processor, and the values delivered to subscribers.

use serde::{Deserialize, Serialize};

use crate::hlc::Timestamp;
use crate::txn::TxnId;

/// A logical operation on an intent.
///
/// Carries no value payload. The processor uses these to keep its
/// unresolved-intent tracking in step with storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum LogicalOp {
    /// An intent was written (or discovered) at `timestamp`
    WriteIntent {
        /// Owning transaction
        txn_id: TxnId,
        /// Transaction record key
        txn_key: Vec<u8>,
        /// Provisional timestamp
        timestamp: Timestamp,
    },
    /// The transaction's timestamp moved to `timestamp`
    UpdateIntent {
        /// Owning transaction
        txn_id: TxnId,
        /// New timestamp
        timestamp: Timestamp,
    },
    /// An intent of the transaction was committed as a value
    CommitIntent {
        /// Owning transaction
        txn_id: TxnId,
        /// Committed user key
        key: Vec<u8>,
        /// Commit timestamp
        timestamp: Timestamp,
    },
    /// An intent of the transaction was removed
    AbortIntent {
        /// Owning transaction
        txn_id: TxnId,
    },
}

impl LogicalOp {
    /// Transaction the operation refers to.
    pub fn txn_id(&self) -> TxnId {
        match self {
            LogicalOp::WriteIntent { txn_id, .. }
            | LogicalOp::UpdateIntent { txn_id, .. }
            | LogicalOp::CommitIntent { txn_id, .. }
            | LogicalOp::AbortIntent { txn_id } => *txn_id,
        }
    }
}

/// Builds a WriteIntent operation.
pub fn write_intent_op(txn_id: TxnId, txn_key: impl Into<Vec<u8>>, ts: Timestamp) -> LogicalOp {
    LogicalOp::WriteIntent {
        txn_id,
        txn_key: txn_key.into(),
        timestamp: ts,
    }
}

/// Builds an UpdateIntent operation.
pub fn update_intent_op(txn_id: TxnId, ts: Timestamp) -> LogicalOp {
    LogicalOp::UpdateIntent {
        txn_id,
        timestamp: ts,
    }
}

/// Builds a CommitIntent operation.
pub fn commit_intent_op(txn_id: TxnId, key: impl Into<Vec<u8>>, ts: Timestamp) -> LogicalOp {
    LogicalOp::CommitIntent {
        txn_id,
        key: key.into(),
        timestamp: ts,
    }
}

/// Builds an AbortIntent operation.
pub fn abort_intent_op(txn_id: TxnId) -> LogicalOp {
    LogicalOp::AbortIntent { txn_id }
}

/// An event delivered to the processor's event queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Event {
    /// A non-empty, ordered batch of logical operations
    Ops(Vec<LogicalOp>),
    /// All intents present at startup have been delivered; the processor
    /// may start computing a resolved timestamp
    InitResolvedTs,
}

impl Event {
    /// Wraps a batch of operations. Returns `None` for an empty batch.
    pub fn from_ops(ops: Vec<LogicalOp>) -> Option<Self> {
        if ops.is_empty() {
            None
        } else {
            Some(Event::Ops(ops))
        }
    }

    /// Wraps a single operation.
    pub fn single(op: LogicalOp) -> Self {
        Event::Ops(vec![op])
    }

    /// Operations carried by the event (empty for the init marker).
    pub fn ops(&self) -> &[LogicalOp] {
        match self {
            Event::Ops(ops) => ops,
            Event::InitResolvedTs => &[],
        }
    }

    /// Returns true for the resolved-timestamp-initialized marker.
    pub fn is_init_resolved_ts(&self) -> bool {
        matches!(self, Event::InitResolvedTs)
    }
}

/// "A value became readable" notification for a subscriber.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeFeedValue {
    /// User key
    pub key: Vec<u8>,
    /// Value bytes
    pub value: Vec<u8>,
    /// Timestamp the value became visible at (zero for inline values)
    pub timestamp: Timestamp,
}

impl RangeFeedValue {
    /// Creates a value notification.
    pub fn new(key: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>, timestamp: Timestamp) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            timestamp,
        }
    }
}
