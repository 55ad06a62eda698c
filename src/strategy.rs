//! Replaceable connection-establishment and health-check strategies.
//!
//! The provider calls [`DialStrategy::dial`] for every new connection and
//! [`BorrowStrategy::check`] each time a pooled connection is handed back
//! out. Both are swappable through [`options::dialer`] and
//! [`options::test_on_borrow`].
//!
//! [`options::dialer`]: crate::options::dialer
//! [`options::test_on_borrow`]: crate::options::test_on_borrow

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::config::Config;
use crate::connection::StoreConnection;
use crate::error::KvMiddlewareError;

/// Establishes a ready-to-use store connection for a configuration.
#[async_trait]
pub trait DialStrategy: Send + Sync {
    /// Dial the store and prepare the connection for use (authentication,
    /// database selection).
    ///
    /// # Errors
    /// Returns a connection, IO, or store error when the connection cannot
    /// be established or prepared.
    async fn dial(&self, config: &Config) -> Result<StoreConnection, KvMiddlewareError>;
}

/// Health check applied to a pooled connection at borrow time.
#[async_trait]
pub trait BorrowStrategy: Send + Sync {
    /// Decide whether the connection is still fit for use. `idle_for` is
    /// the time since the connection was last handed back.
    ///
    /// # Errors
    /// An error discards the connection; the pool dials a replacement.
    async fn check(
        &self,
        conn: &mut StoreConnection,
        idle_for: Duration,
    ) -> Result<(), KvMiddlewareError>;
}

/// Default dial strategy: TCP connect, AUTH when a password is configured,
/// then SELECT the configured database index.
pub struct DefaultDialer;

#[async_trait]
impl DialStrategy for DefaultDialer {
    async fn dial(&self, config: &Config) -> Result<StoreConnection, KvMiddlewareError> {
        let addr = config.addr();
        debug!(addr = %addr, db = config.db(), "dialing store");
        let mut conn = StoreConnection::dial(&addr).await?;
        if let Some(password) = config.password() {
            conn.execute("AUTH", &[password]).await?.into_string()?;
        }
        conn.execute("SELECT", &[&config.db().to_string()])
            .await?
            .into_string()?;
        Ok(conn)
    }
}

/// Default borrow strategy: accept every connection.
pub struct NoopBorrowTest;

#[async_trait]
impl BorrowStrategy for NoopBorrowTest {
    async fn check(
        &self,
        _conn: &mut StoreConnection,
        _idle_for: Duration,
    ) -> Result<(), KvMiddlewareError> {
        Ok(())
    }
}
