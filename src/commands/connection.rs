//! Connection commands.

use super::non_blank;
use crate::client::KvClient;
use crate::error::KvMiddlewareError;

impl KvClient {
    /// Echo `message` back from the store.
    ///
    /// # Errors
    /// A differing reply surfaces as `ResponseMismatch`.
    pub async fn echo(&self, message: &str) -> Result<String, KvMiddlewareError> {
        non_blank(message, "message")?;
        self.exec_match("ECHO", message, |mut conn| async move {
            conn.execute("ECHO", &[message]).await?.into_string()
        })
        .await
    }

    /// Ping the store. With no message the expected reply is `PONG`;
    /// with one, the message itself.
    ///
    /// # Errors
    /// A differing reply surfaces as `ResponseMismatch`.
    pub async fn ping(&self, message: Option<&str>) -> Result<String, KvMiddlewareError> {
        let expected = message.unwrap_or("PONG");
        let args: Vec<&str> = message.into_iter().collect();
        self.exec_match("PING", expected, |mut conn| async move {
            conn.execute("PING", &args).await?.into_string()
        })
        .await
    }

    /// Ask the store to close the connection this command runs on. The
    /// connection still returns to the pool and fails on next use, so
    /// prefer [`close`](Self::close) for orderly shutdown.
    ///
    /// # Errors
    /// A non-`OK` reply surfaces as `ResponseMismatch`.
    pub async fn quit(&self) -> Result<(), KvMiddlewareError> {
        self.exec_ok("QUIT", |mut conn| async move {
            conn.execute("QUIT", &[]).await?.into_string()
        })
        .await
    }
}
