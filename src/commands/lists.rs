//! List commands.

use super::{all_non_blank, non_blank, non_empty, prepend};
use crate::client::KvClient;
use crate::error::KvMiddlewareError;

impl KvClient {
    /// Length of the list at `key`.
    ///
    /// # Errors
    /// `InvalidArgument` for a blank key.
    pub async fn llen(&self, key: &str) -> Result<i64, KvMiddlewareError> {
        non_blank(key, "key")?;
        self.exec_i64("LLEN", |mut conn| async move {
            conn.execute("LLEN", &[key]).await?.into_i64()
        })
        .await
    }

    /// Remove and return the first element of the list at `key`.
    ///
    /// # Errors
    /// `NilReply` when the list is empty or missing.
    pub async fn lpop(&self, key: &str) -> Result<String, KvMiddlewareError> {
        non_blank(key, "key")?;
        self.exec_string("LPOP", |mut conn| async move {
            conn.execute("LPOP", &[key]).await?.into_string()
        })
        .await
    }

    /// Insert `items` at the head of the list at `key`; returns the new
    /// length.
    ///
    /// # Errors
    /// `InvalidArgument` for an empty item list or blank items.
    pub async fn lpush(&self, key: &str, items: &[&str]) -> Result<i64, KvMiddlewareError> {
        non_blank(key, "key")?;
        non_empty(items, "item")?;
        all_non_blank(items, "item")?;
        let args = prepend(key, items);
        self.exec_i64("LPUSH", |mut conn| async move {
            conn.execute("LPUSH", &args).await?.into_i64()
        })
        .await
    }

    /// Remove and return the last element of the list at `key`.
    ///
    /// # Errors
    /// `NilReply` when the list is empty or missing.
    pub async fn rpop(&self, key: &str) -> Result<String, KvMiddlewareError> {
        non_blank(key, "key")?;
        self.exec_string("RPOP", |mut conn| async move {
            conn.execute("RPOP", &[key]).await?.into_string()
        })
        .await
    }

    /// Insert `items` at the tail of the list at `key`; returns the new
    /// length.
    ///
    /// # Errors
    /// `InvalidArgument` for an empty item list or blank items.
    pub async fn rpush(&self, key: &str, items: &[&str]) -> Result<i64, KvMiddlewareError> {
        non_blank(key, "key")?;
        non_empty(items, "item")?;
        all_non_blank(items, "item")?;
        let args = prepend(key, items);
        self.exec_i64("RPUSH", |mut conn| async move {
            conn.execute("RPUSH", &args).await?.into_i64()
        })
        .await
    }
}
