//! Server-scope commands. The destructive ones consult the safe-mode
//! gate before touching the network.

use crate::client::KvClient;
use crate::error::KvMiddlewareError;

impl KvClient {
    /// Number of keys in the selected database.
    pub async fn db_size(&self) -> Result<i64, KvMiddlewareError> {
        self.exec_i64("DBSIZE", |mut conn| async move {
            conn.execute("DBSIZE", &[]).await?.into_i64()
        })
        .await
    }

    /// Delete every key in every database on the server.
    ///
    /// # Errors
    /// `PolicyError` on a restricted client, before any network contact.
    pub async fn flush_all(&self) -> Result<(), KvMiddlewareError> {
        self.require_unrestricted("FLUSHALL")?;
        self.exec_ok("FLUSHALL", |mut conn| async move {
            conn.execute("FLUSHALL", &[]).await?.into_string()
        })
        .await
    }

    /// Delete every key in the selected database.
    ///
    /// # Errors
    /// `PolicyError` on a restricted client, before any network contact.
    pub async fn flush_db(&self) -> Result<(), KvMiddlewareError> {
        self.require_unrestricted("FLUSHDB")?;
        self.exec_ok("FLUSHDB", |mut conn| async move {
            conn.execute("FLUSHDB", &[]).await?.into_string()
        })
        .await
    }
}
