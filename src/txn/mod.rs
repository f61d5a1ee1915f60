//! Transaction Domain Types
//!
//! This module provides:
//! - `TxnMeta` - The reference an intent carries to its owning transaction
//! - `TxnStatus` - Pending / Committed / Aborted
//! - `Transaction` - A transaction status record as returned by a push

mod meta;

pub use meta::{Transaction, TxnId, TxnMeta, TxnStatus};
