//! Transaction references and status records
//!
//! An intent carries a `TxnMeta` naming its transaction, the key of the
//! transaction record, and the provisional timestamp of the write. Several
//! intents may share one transaction id.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::hlc::Timestamp;

/// Transaction identity.
pub type TxnId = Uuid;

/// Reference from an intent to its owning transaction.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TxnMeta {
    /// Transaction id
    pub id: TxnId,
    /// Key of the transaction record (the transaction's anchor key)
    pub key: Vec<u8>,
    /// Provisional timestamp of the transaction
    pub timestamp: Timestamp,
}

impl TxnMeta {
    /// Creates a new transaction reference.
    pub fn new(id: TxnId, key: impl Into<Vec<u8>>, timestamp: Timestamp) -> Self {
        Self {
            id,
            key: key.into(),
            timestamp,
        }
    }
}

/// Resolution state of a transaction.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TxnStatus {
    /// Still running; its timestamp may have been pushed forward
    Pending,
    /// Committed at its (final) timestamp
    Committed,
    /// Aborted; its intents will never become values
    Aborted,
}

impl TxnStatus {
    /// Returns true for Committed and Aborted.
    #[inline]
    pub fn is_finalized(&self) -> bool {
        !matches!(self, TxnStatus::Pending)
    }
}

impl fmt::Display for TxnStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TxnStatus::Pending => write!(f, "PENDING"),
            TxnStatus::Committed => write!(f, "COMMITTED"),
            TxnStatus::Aborted => write!(f, "ABORTED"),
        }
    }
}

/// A transaction status record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// The transaction this record describes
    pub meta: TxnMeta,
    /// Current status
    pub status: TxnStatus,
}

impl Transaction {
    /// Creates a status record.
    pub fn new(meta: TxnMeta, status: TxnStatus) -> Self {
        Self { meta, status }
    }

    /// Transaction id.
    #[inline]
    pub fn id(&self) -> TxnId {
        self.meta.id
    }

    /// Current timestamp. Final when the status is Committed.
    #[inline]
    pub fn timestamp(&self) -> Timestamp {
        self.meta.timestamp
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_finalized() {
        assert!(!TxnStatus::Pending.is_finalized());
        assert!(TxnStatus::Committed.is_finalized());
        assert!(TxnStatus::Aborted.is_finalized());
    }

    #[test]
    fn test_status_serializes_uppercase() {
        let json = serde_json::to_string(&TxnStatus::Committed).unwrap();
        assert_eq!(json, "\"COMMITTED\"");
    }

    #[test]
    fn test_transaction_accessors() {
        let id = Uuid::new_v4();
        let txn = Transaction::new(
            TxnMeta::new(id, b"anchor".to_vec(), Timestamp::from_wall(7)),
            TxnStatus::Pending,
        );
        assert_eq!(txn.id(), id);
        assert_eq!(txn.timestamp(), Timestamp::from_wall(7));
        assert_eq!(txn.meta.key, b"anchor");
    }
}
