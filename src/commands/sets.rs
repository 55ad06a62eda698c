//! Set commands.

use super::{all_non_blank, non_blank, non_empty, prepend};
use crate::client::KvClient;
use crate::error::KvMiddlewareError;

impl KvClient {
    /// Add `members` to the set at `key`; returns how many were new.
    ///
    /// # Errors
    /// `InvalidArgument` for an empty member list or a blank key.
    pub async fn sadd(&self, key: &str, members: &[&str]) -> Result<i64, KvMiddlewareError> {
        non_blank(key, "key")?;
        non_empty(members, "member")?;
        let args = prepend(key, members);
        self.exec_i64("SADD", |mut conn| async move {
            conn.execute("SADD", &args).await?.into_i64()
        })
        .await
    }

    /// Cardinality of the set at `key`.
    ///
    /// # Errors
    /// `InvalidArgument` for a blank key.
    pub async fn scard(&self, key: &str) -> Result<i64, KvMiddlewareError> {
        non_blank(key, "key")?;
        self.exec_i64("SCARD", |mut conn| async move {
            conn.execute("SCARD", &[key]).await?.into_i64()
        })
        .await
    }

    /// Store the difference of the sets at `keys` into `dest`; returns the
    /// resulting cardinality.
    ///
    /// # Errors
    /// `InvalidArgument` for a blank destination or empty/blank source
    /// keys.
    pub async fn sdiff_store(&self, dest: &str, keys: &[&str]) -> Result<i64, KvMiddlewareError> {
        non_blank(dest, "destination key")?;
        non_empty(keys, "set key")?;
        all_non_blank(keys, "set key")?;
        let args = prepend(dest, keys);
        self.exec_i64("SDIFFSTORE", |mut conn| async move {
            conn.execute("SDIFFSTORE", &args).await?.into_i64()
        })
        .await
    }

    /// Members of the set at `key`.
    ///
    /// # Errors
    /// `InvalidArgument` for a blank key.
    pub async fn smembers(&self, key: &str) -> Result<Vec<String>, KvMiddlewareError> {
        non_blank(key, "key")?;
        self.exec_strings("SMEMBERS", |mut conn| async move {
            conn.execute("SMEMBERS", &[key]).await?.into_strings()
        })
        .await
    }

    /// Store the union of the sets at `keys` into `dest`; returns the
    /// resulting cardinality.
    ///
    /// # Errors
    /// `InvalidArgument` for a blank destination or empty/blank source
    /// keys.
    pub async fn sunion_store(&self, dest: &str, keys: &[&str]) -> Result<i64, KvMiddlewareError> {
        non_blank(dest, "destination key")?;
        non_empty(keys, "set key")?;
        all_non_blank(keys, "set key")?;
        let args = prepend(dest, keys);
        self.exec_i64("SUNIONSTORE", |mut conn| async move {
            conn.execute("SUNIONSTORE", &args).await?.into_i64()
        })
        .await
    }
}
