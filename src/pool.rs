//! Connection provider: a deadpool-managed pool of store connections.
//!
//! The [`StoreManager`] is where the configuration's strategies meet the
//! pool: `create` runs the dial strategy, `recycle` enforces the
//! idle/lifetime bounds from pool metrics and then runs the borrow-test
//! strategy. Everything above this module sees only acquire / status /
//! close.

use std::fmt;

use deadpool::Runtime;
use deadpool::managed::{Manager, Metrics, Object, Pool, RecycleError, RecycleResult};
use tracing::{debug, trace};

use crate::config::Config;
use crate::connection::StoreConnection;
use crate::error::KvMiddlewareError;

/// Effective size used when `max_active` is zero ("no cap").
const UNBOUNDED_ACTIVE: usize = 1 << 20;

/// A pooled connection guard. Dereferences to [`StoreConnection`];
/// dropping it returns the connection to the pool.
pub type PooledConnection = Object<StoreManager>;

/// deadpool manager wiring the configuration's dial and borrow-test
/// strategies into the pool lifecycle.
#[derive(Debug)]
pub struct StoreManager {
    config: Config,
}

impl Manager for StoreManager {
    type Type = StoreConnection;
    type Error = KvMiddlewareError;

    async fn create(&self) -> Result<StoreConnection, KvMiddlewareError> {
        self.config.dialer().dial(&self.config).await
    }

    async fn recycle(
        &self,
        conn: &mut StoreConnection,
        metrics: &Metrics,
    ) -> RecycleResult<KvMiddlewareError> {
        let max_lifetime = self.config.max_conn_lifetime();
        if !max_lifetime.is_zero() && metrics.age() >= max_lifetime {
            trace!(age = ?metrics.age(), "discarding connection past max lifetime");
            return Err(RecycleError::Backend(KvMiddlewareError::ConnectionError(
                "max connection lifetime exceeded".to_string(),
            )));
        }
        let idle_timeout = self.config.idle_timeout();
        let idle_for = metrics.last_used();
        if !idle_timeout.is_zero() && idle_for >= idle_timeout {
            trace!(idle = ?idle_for, "discarding connection past idle timeout");
            return Err(RecycleError::Backend(KvMiddlewareError::ConnectionError(
                "idle timeout exceeded".to_string(),
            )));
        }
        self.config
            .test_on_borrow()
            .check(conn, idle_for)
            .await
            .map_err(RecycleError::Backend)
    }
}

/// Snapshot of pool shape at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolStatus {
    /// Configured connection cap.
    pub max_active: usize,
    /// Connections currently open, idle or in use.
    pub open: usize,
    /// Connections sitting idle in the pool.
    pub idle: usize,
    /// Callers waiting for capacity.
    pub waiting: usize,
}

/// Owns the pool for one client. Acquire hands out RAII guards; close
/// releases every pooled connection.
pub struct ConnectionProvider {
    pool: Pool<StoreManager>,
}

impl ConnectionProvider {
    /// Build a pool shaped by the configuration: `max_active` caps total
    /// connections (zero means uncapped) and `wait` decides whether a
    /// saturated pool queues the caller or fails immediately.
    pub(crate) fn new(config: Config) -> Result<Self, KvMiddlewareError> {
        let max_size = match config.max_active() {
            0 => UNBOUNDED_ACTIVE,
            n => n,
        };
        let wait_timeout = if config.wait() {
            None
        } else {
            Some(std::time::Duration::ZERO)
        };
        let pool = Pool::builder(StoreManager { config })
            .max_size(max_size)
            .wait_timeout(wait_timeout)
            .runtime(Runtime::Tokio1)
            .build()
            .map_err(|err| {
                KvMiddlewareError::ConfigError(format!("failed to build connection pool: {err}"))
            })?;
        Ok(ConnectionProvider { pool })
    }

    /// Acquire one healthy connection.
    ///
    /// # Errors
    /// `ConnectionError` when the pool is exhausted (without `wait`) or
    /// closed; dial and borrow-test failures pass through.
    pub async fn acquire(&self) -> Result<PooledConnection, KvMiddlewareError> {
        self.pool.get().await.map_err(KvMiddlewareError::from)
    }

    /// Point-in-time pool statistics.
    #[must_use]
    pub fn status(&self) -> PoolStatus {
        let status = self.pool.status();
        PoolStatus {
            max_active: status.max_size,
            open: status.size,
            idle: status.available,
            waiting: status.waiting,
        }
    }

    /// Close the pool and release every pooled connection. Subsequent
    /// acquires fail with a connection error.
    pub fn close(&self) {
        debug!("closing connection pool");
        self.pool.close();
    }
}

// Manual Debug because Pool's manager type doesn't implement it.
impl fmt::Debug for ConnectionProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionProvider")
            .field("status", &self.status())
            .finish()
    }
}
