//! Key-space commands.

use super::{all_non_blank, non_blank, non_empty};
use crate::client::KvClient;
use crate::error::KvMiddlewareError;

impl KvClient {
    /// Delete `keys`; returns how many actually existed.
    ///
    /// # Errors
    /// `InvalidArgument` for an empty list or blank keys.
    pub async fn del(&self, keys: &[&str]) -> Result<i64, KvMiddlewareError> {
        non_empty(keys, "key")?;
        all_non_blank(keys, "key")?;
        self.exec_i64("DEL", |mut conn| async move {
            conn.execute("DEL", keys).await?.into_i64()
        })
        .await
    }

    /// Delete every key matching `pattern`: a `KEYS` scan followed by one
    /// `DEL`. Returns the number deleted, zero when nothing matched.
    /// Walking the whole key space is expensive on large databases, which
    /// is why this is gated like the other whole-database destructors.
    ///
    /// # Errors
    /// `PolicyError` on a restricted client, before any network contact.
    pub async fn del_pattern(&self, pattern: &str) -> Result<i64, KvMiddlewareError> {
        self.require_unrestricted("DEL_PATTERN")?;
        non_blank(pattern, "pattern")?;
        let keys = self.keys(pattern).await?;
        if keys.is_empty() {
            return Ok(0);
        }
        let keys: Vec<&str> = keys.iter().map(String::as_str).collect();
        self.del(&keys).await
    }

    /// Whether `key` exists. Restricted to a single key so the answer is
    /// unambiguous.
    ///
    /// # Errors
    /// `InvalidArgument` for a blank key.
    pub async fn exists(&self, key: &str) -> Result<bool, KvMiddlewareError> {
        non_blank(key, "key")?;
        self.exec_bool("EXISTS", |mut conn| async move {
            conn.execute("EXISTS", &[key]).await?.into_bool()
        })
        .await
    }

    /// Set a timeout of `seconds` on `key`. `false` means the key does
    /// not exist or the timeout could not be set.
    ///
    /// # Errors
    /// `InvalidArgument` for a blank key.
    pub async fn expire(&self, key: &str, seconds: i64) -> Result<bool, KvMiddlewareError> {
        non_blank(key, "key")?;
        let seconds = seconds.to_string();
        self.exec_bool("EXPIRE", |mut conn| async move {
            conn.execute("EXPIRE", &[key, &seconds]).await?.into_bool()
        })
        .await
    }

    /// All keys matching `pattern`.
    ///
    /// # Errors
    /// `InvalidArgument` for a blank pattern.
    pub async fn keys(&self, pattern: &str) -> Result<Vec<String>, KvMiddlewareError> {
        non_blank(pattern, "pattern")?;
        self.exec_strings("KEYS", |mut conn| async move {
            conn.execute("KEYS", &[pattern]).await?.into_strings()
        })
        .await
    }

    /// Rename `from` to `to`.
    ///
    /// # Errors
    /// `InvalidArgument` for blank or identical names; renaming a missing
    /// key surfaces as a store error.
    pub async fn rename(&self, from: &str, to: &str) -> Result<(), KvMiddlewareError> {
        non_blank(from, "source key")?;
        non_blank(to, "destination key")?;
        if from == to {
            return Err(KvMiddlewareError::InvalidArgument(
                "rename requires distinct keys".to_string(),
            ));
        }
        self.exec_ok("RENAME", |mut conn| async move {
            conn.execute("RENAME", &[from, to]).await?.into_string()
        })
        .await
    }
}
