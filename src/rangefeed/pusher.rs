//! # Transaction Pusher
//!
//! The collaborator that moves stuck transactions forward and cleans up
//! intents of finished ones. Implemented outside this crate, usually over
//! RPC.

use futures_util::future::BoxFuture;

use super::errors::RangefeedResult;
use crate::hlc::Timestamp;
use crate::txn::{Transaction, TxnMeta};

/// Pushes transactions and triggers intent cleanup.
pub trait TxnPusher: Send + Sync + 'static {
    /// Push every transaction to at least `ts`, or learn that it finished.
    ///
    /// Must return one status record per input, in input order.
    fn push_txns(
        &self,
        txns: Vec<TxnMeta>,
        ts: Timestamp,
    ) -> BoxFuture<'_, RangefeedResult<Vec<Transaction>>>;

    /// Start resolving the intents of finished transactions.
    ///
    /// An error only reports that the request could not be submitted, not
    /// how the cleanup eventually went.
    fn cleanup_txn_intents_async(
        &self,
        txns: Vec<Transaction>,
    ) -> BoxFuture<'_, RangefeedResult<()>>;
}
