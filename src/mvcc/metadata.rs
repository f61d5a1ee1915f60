//! MvccMetadata - payload of a metadata row
//!
//! A metadata row holds either an inline (non-versioned) value or an intent
//! pointing at its transaction. The payload is stored encoded; consumers
//! decode it with `MvccMetadata::decode`.

use serde::{Deserialize, Serialize};

use crate::txn::TxnMeta;

/// Decoded metadata row.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MvccMetadata {
    /// Non-versioned value, visible at the zero timestamp
    Inline(Vec<u8>),
    /// Provisional write owned by a transaction
    Intent(TxnMeta),
}

impl MvccMetadata {
    /// Encodes the metadata for storage.
    pub fn encode(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(self)
    }

    /// Decodes a stored metadata payload.
    pub fn decode(bytes: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(bytes)
    }

    /// Returns the transaction reference if this is an intent.
    #[inline]
    pub fn txn(&self) -> Option<&TxnMeta> {
        match self {
            MvccMetadata::Intent(txn) => Some(txn),
            MvccMetadata::Inline(_) => None,
        }
    }

    /// Returns true if this is an inline value.
    #[inline]
    pub fn is_inline(&self) -> bool {
        matches!(self, MvccMetadata::Inline(_))
    }
}
