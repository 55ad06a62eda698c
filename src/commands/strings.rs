//! String commands.

use std::time::Duration;

use super::{all_non_blank, non_blank};
use crate::client::KvClient;
use crate::error::KvMiddlewareError;

impl KvClient {
    /// Append `value` to the string at `key`, creating it when missing.
    /// Returns the new length.
    ///
    /// # Errors
    /// `InvalidArgument` for a blank key; store errors pass through.
    pub async fn append(&self, key: &str, value: &str) -> Result<i64, KvMiddlewareError> {
        non_blank(key, "key")?;
        self.exec_i64("APPEND", |mut conn| async move {
            conn.execute("APPEND", &[key, value]).await?.into_i64()
        })
        .await
    }

    /// Join `values` with `sep` and append the result to `key`.
    ///
    /// # Errors
    /// `InvalidArgument` for a blank key; store errors pass through.
    pub async fn append_joined(
        &self,
        key: &str,
        sep: &str,
        values: &[&str],
    ) -> Result<i64, KvMiddlewareError> {
        self.append(key, &values.join(sep)).await
    }

    /// Fetch the string value at `key`.
    ///
    /// # Errors
    /// `NilReply` when the key does not exist; `InvalidArgument` for a
    /// blank key.
    pub async fn get(&self, key: &str) -> Result<String, KvMiddlewareError> {
        non_blank(key, "key")?;
        self.exec_string("GET", |mut conn| async move {
            conn.execute("GET", &[key]).await?.into_string()
        })
        .await
    }

    /// Increment the number at `key` by one, creating it at zero when
    /// missing. Returns the new value.
    ///
    /// # Errors
    /// `InvalidArgument` for a blank key; non-numeric values surface as
    /// store errors.
    pub async fn incr(&self, key: &str) -> Result<i64, KvMiddlewareError> {
        non_blank(key, "key")?;
        self.exec_i64("INCR", |mut conn| async move {
            conn.execute("INCR", &[key]).await?.into_i64()
        })
        .await
    }

    /// Fetch the values of all `keys`; missing keys come back as empty
    /// strings.
    ///
    /// # Errors
    /// `InvalidArgument` when any key is blank.
    pub async fn mget(&self, keys: &[&str]) -> Result<Vec<String>, KvMiddlewareError> {
        all_non_blank(keys, "key")?;
        self.exec_strings("MGET", |mut conn| async move {
            conn.execute("MGET", keys).await?.into_strings()
        })
        .await
    }

    /// Set `key` to `value`.
    ///
    /// # Errors
    /// `InvalidArgument` for a blank key; a non-`OK` reply surfaces as
    /// `ResponseMismatch`.
    pub async fn set(&self, key: &str, value: &str) -> Result<(), KvMiddlewareError> {
        non_blank(key, "key")?;
        self.exec_ok("SET", |mut conn| async move {
            conn.execute("SET", &[key, value]).await?.into_string()
        })
        .await
    }

    /// Set `key` to `value` with an expiry in seconds.
    ///
    /// # Errors
    /// `InvalidArgument` for a blank key or zero expiry.
    pub async fn set_ex(
        &self,
        key: &str,
        value: &str,
        seconds: u64,
    ) -> Result<(), KvMiddlewareError> {
        non_blank(key, "key")?;
        if seconds == 0 {
            return Err(KvMiddlewareError::InvalidArgument(
                "expiry must be at least one second".to_string(),
            ));
        }
        let seconds = seconds.to_string();
        self.exec_ok("SETEX", |mut conn| async move {
            conn.execute("SETEX", &[key, &seconds, value])
                .await?
                .into_string()
        })
        .await
    }

    /// [`set_ex`](Self::set_ex) with the expiry given as a duration,
    /// truncated to whole seconds.
    ///
    /// # Errors
    /// `InvalidArgument` for durations under one second.
    pub async fn set_ex_duration(
        &self,
        key: &str,
        value: &str,
        expiry: Duration,
    ) -> Result<(), KvMiddlewareError> {
        if expiry < Duration::from_secs(1) {
            return Err(KvMiddlewareError::InvalidArgument(
                "expiry must be at least one second".to_string(),
            ));
        }
        self.set_ex(key, value, expiry.as_secs()).await
    }
}
