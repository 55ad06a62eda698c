//! The pooled client: lifecycle, execution helpers, statistics, and the
//! safe-mode gate.

use std::future::Future;

use tracing::debug;

use crate::config::Config;
use crate::error::KvMiddlewareError;
use crate::options::{self, Opt};
use crate::pool::{ConnectionProvider, PooledConnection};
use crate::stats::{CommandCounters, Stats};

/// Pooled store client.
///
/// A client exclusively owns its connection pool. The restricted and
/// unrestricted variants differ only in whether whole-store destructive
/// commands (`flush_all`, `flush_db`, `del_pattern`) are permitted; the
/// gate is a client-side misuse guard, not a security boundary.
///
/// Every command acquires a connection from the pool, executes one store
/// round-trip, and releases the connection on every exit path.
#[derive(Debug)]
pub struct KvClient {
    config: Config,
    provider: ConnectionProvider,
    unrestricted: bool,
    counters: CommandCounters,
}

impl KvClient {
    /// Build a restricted client: destructive whole-store commands are
    /// rejected with a policy error.
    ///
    /// # Errors
    /// Returns the first configuration error.
    pub fn restricted(opts: impl IntoIterator<Item = Opt>) -> Result<Self, KvMiddlewareError> {
        let config = Config::new(opts)?;
        Self::from_config(config, false)
    }

    /// Build an unrestricted client: destructive whole-store commands are
    /// permitted. Use deliberately; `flush_all` against the wrong host is
    /// not recoverable.
    ///
    /// # Errors
    /// Returns the first configuration error.
    pub fn unrestricted(opts: impl IntoIterator<Item = Opt>) -> Result<Self, KvMiddlewareError> {
        let config = Config::new(opts)?;
        Self::from_config(config, true)
    }

    pub(crate) fn from_config(
        config: Config,
        unrestricted: bool,
    ) -> Result<Self, KvMiddlewareError> {
        debug!(addr = %config.addr(), db = config.db(), unrestricted, "building client");
        let provider = ConnectionProvider::new(config.clone())?;
        Ok(KvClient {
            config,
            provider,
            unrestricted,
            counters: CommandCounters::default(),
        })
    }

    /// The configuration this client was built from.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Whether destructive whole-store commands are permitted.
    #[must_use]
    pub fn is_unrestricted(&self) -> bool {
        self.unrestricted
    }

    /// Close the pool, releasing every pooled connection. Commands issued
    /// afterwards fail with a connection error.
    pub fn close(&self) {
        self.provider.close();
    }

    /// Acquire one pooled connection. Blocks for capacity only when the
    /// configuration sets `wait`; otherwise a saturated pool fails
    /// immediately.
    ///
    /// # Errors
    /// `ConnectionError` on exhaustion or a closed pool; dial and
    /// borrow-test failures pass through.
    pub async fn conn(&self) -> Result<PooledConnection, KvMiddlewareError> {
        self.provider.acquire().await
    }

    /// Pool statistics plus a copied snapshot of the per-command counters.
    #[must_use]
    pub fn stats(&self) -> Stats {
        Stats {
            pool: self.provider.status(),
            commands: self.counters.snapshot(),
        }
    }

    /// Derive a client pinned to database `index`.
    ///
    /// The selected database is a property of a physical connection, not
    /// of a client handle, so this never mutates `self`: it derives a
    /// configuration pinning the new index onto a single-connection pool
    /// with idle and lifetime bounds disabled, and builds a fresh client
    /// from it. The derived client is not re-selectable and, matching the
    /// factory it is built through, always restricted.
    ///
    /// # Errors
    /// `PolicyError` when this client disallows selection (cluster mode,
    /// or itself a select product); configuration errors pass through.
    pub fn select(&self, index: u32) -> Result<KvClient, KvMiddlewareError> {
        if !self.config.is_selectable() {
            return Err(KvMiddlewareError::PolicyError(
                "select is not allowed on this client".to_string(),
            ));
        }
        debug!(db = index, "deriving select client");
        let config = self.config.copy_with([
            options::db(index),
            options::idle_timeout(std::time::Duration::ZERO),
            options::max_conn_lifetime(std::time::Duration::ZERO),
            options::max_active(1),
            options::max_idle(0),
            options::wait(false),
            options::unselectable(),
        ])?;
        KvClient::from_config(config, false)
    }

    /// Single dispatch seam shared by the typed helpers: acquire, hand the
    /// owned guard to the operation, record the command once the operation
    /// succeeds. The guard drops inside the operation's future, so release
    /// happens on every exit path, including store-call failure.
    async fn dispatch<T, F, Fut>(&self, command: &str, op: F) -> Result<T, KvMiddlewareError>
    where
        F: FnOnce(PooledConnection) -> Fut,
        Fut: Future<Output = Result<T, KvMiddlewareError>>,
    {
        let conn = self.conn().await?;
        let result = op(conn).await;
        if result.is_ok() {
            self.counters.record(command);
        }
        result
    }

    /// Execute an operation yielding a boolean.
    ///
    /// # Errors
    /// Acquisition failures fail fast; the operation's error passes
    /// through unchanged.
    pub async fn exec_bool<F, Fut>(&self, command: &str, op: F) -> Result<bool, KvMiddlewareError>
    where
        F: FnOnce(PooledConnection) -> Fut,
        Fut: Future<Output = Result<bool, KvMiddlewareError>>,
    {
        self.dispatch(command, op).await
    }

    /// Execute an operation yielding an integer.
    ///
    /// # Errors
    /// Acquisition failures fail fast; the operation's error passes
    /// through unchanged.
    pub async fn exec_i64<F, Fut>(&self, command: &str, op: F) -> Result<i64, KvMiddlewareError>
    where
        F: FnOnce(PooledConnection) -> Fut,
        Fut: Future<Output = Result<i64, KvMiddlewareError>>,
    {
        self.dispatch(command, op).await
    }

    /// Execute an operation yielding a string.
    ///
    /// # Errors
    /// Acquisition failures fail fast; the operation's error passes
    /// through unchanged.
    pub async fn exec_string<F, Fut>(
        &self,
        command: &str,
        op: F,
    ) -> Result<String, KvMiddlewareError>
    where
        F: FnOnce(PooledConnection) -> Fut,
        Fut: Future<Output = Result<String, KvMiddlewareError>>,
    {
        self.dispatch(command, op).await
    }

    /// Execute an operation yielding a list of strings.
    ///
    /// # Errors
    /// Acquisition failures fail fast; the operation's error passes
    /// through unchanged.
    pub async fn exec_strings<F, Fut>(
        &self,
        command: &str,
        op: F,
    ) -> Result<Vec<String>, KvMiddlewareError>
    where
        F: FnOnce(PooledConnection) -> Fut,
        Fut: Future<Output = Result<Vec<String>, KvMiddlewareError>>,
    {
        self.dispatch(command, op).await
    }

    /// Execute a string operation and require the reply to equal
    /// `expected`.
    ///
    /// # Errors
    /// A differing reply yields `ResponseMismatch` carrying the command
    /// name and both values.
    pub async fn exec_match<F, Fut>(
        &self,
        command: &str,
        expected: &str,
        op: F,
    ) -> Result<String, KvMiddlewareError>
    where
        F: FnOnce(PooledConnection) -> Fut,
        Fut: Future<Output = Result<String, KvMiddlewareError>>,
    {
        let actual = self.exec_string(command, op).await?;
        if actual != expected {
            return Err(KvMiddlewareError::ResponseMismatch {
                command: command.to_string(),
                expected: expected.to_string(),
                actual,
            });
        }
        Ok(actual)
    }

    /// `exec_match` against the `OK` sentinel.
    pub(crate) async fn exec_ok<F, Fut>(
        &self,
        command: &str,
        op: F,
    ) -> Result<(), KvMiddlewareError>
    where
        F: FnOnce(PooledConnection) -> Fut,
        Fut: Future<Output = Result<String, KvMiddlewareError>>,
    {
        self.exec_match(command, "OK", op).await.map(|_| ())
    }

    /// Safe-mode gate: reject `command` on a restricted client before any
    /// network contact.
    pub(crate) fn require_unrestricted(&self, command: &str) -> Result<(), KvMiddlewareError> {
        if self.unrestricted {
            Ok(())
        } else {
            Err(KvMiddlewareError::PolicyError(format!(
                "{command} requires an unrestricted client"
            )))
        }
    }
}
