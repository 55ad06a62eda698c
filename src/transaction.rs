//! Transaction facade.
//!
//! This surface is a stub, kept deliberately: [`KvClient::multi`] hands
//! back an inert [`Transaction`], and `watch`/`unwatch`/`exec`/`discard`
//! all succeed without queueing, watching, or executing anything. No
//! MULTI/EXEC/WATCH traffic is sent. Callers must not rely on atomicity
//! or optimistic locking from this module; real transaction semantics
//! are out-of-scope future work.

use crate::client::KvClient;
use crate::error::KvMiddlewareError;
use crate::resp::Reply;

/// Inert transaction handle returned by [`KvClient::multi`].
#[derive(Debug, Default)]
pub struct Transaction {
    _private: (),
}

impl Transaction {
    /// Execute the queued batch. Stub: nothing was queued, so this
    /// returns an empty reply list.
    #[allow(clippy::unused_async)]
    pub async fn exec(self) -> Result<Vec<Reply>, KvMiddlewareError> {
        Ok(Vec::new())
    }

    /// Abandon the transaction. Stub: nothing to discard.
    #[allow(clippy::unused_async)]
    pub async fn discard(self) -> Result<(), KvMiddlewareError> {
        Ok(())
    }
}

impl KvClient {
    /// Begin a transaction. Stub: the returned handle queues nothing.
    pub fn multi(&self) -> Result<Transaction, KvMiddlewareError> {
        Ok(Transaction::default())
    }

    /// Mark `keys` for conditional execution. Stub: no WATCH is sent.
    #[allow(clippy::unused_async)]
    pub async fn watch(&self, _keys: &[&str]) -> Result<(), KvMiddlewareError> {
        Ok(())
    }

    /// Clear watched keys. Stub: no UNWATCH is sent.
    #[allow(clippy::unused_async)]
    pub async fn unwatch(&self) -> Result<(), KvMiddlewareError> {
        Ok(())
    }
}
