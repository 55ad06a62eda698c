use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::error::KvMiddlewareError;
use crate::options::Opt;
use crate::strategy::{BorrowStrategy, DefaultDialer, DialStrategy, NoopBorrowTest};

/// Immutable description of how to reach and use the store.
///
/// A `Config` is produced by applying [`Opt`] transforms to the defaults
/// ([`Config::new`]) or to an existing value ([`Config::copy_with`]). Both
/// paths validate the result; a `Config` in hand is always a valid one.
/// Derivation copies, never mutates.
#[derive(Clone)]
pub struct Config {
    pub(crate) cluster: bool,
    pub(crate) db: u32,
    pub(crate) host: String,
    pub(crate) port: u16,
    pub(crate) password: Option<String>,
    pub(crate) idle_timeout: Duration,
    pub(crate) max_conn_lifetime: Duration,
    pub(crate) max_active: usize,
    pub(crate) max_idle: usize,
    pub(crate) wait: bool,
    pub(crate) dialer: Arc<dyn DialStrategy>,
    pub(crate) test_on_borrow: Arc<dyn BorrowStrategy>,
    pub(crate) selectable: bool,
    pub(crate) transacting: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            cluster: false,
            db: 0,
            host: "localhost".to_string(),
            port: 6379,
            password: None,
            idle_timeout: Duration::from_secs(60),
            max_conn_lifetime: Duration::from_secs(60 * 60),
            max_active: 10,
            max_idle: 3,
            wait: false,
            dialer: Arc::new(DefaultDialer),
            test_on_borrow: Arc::new(NoopBorrowTest),
            selectable: true,
            transacting: false,
        }
    }
}

impl Config {
    /// Build a configuration from the defaults, applying each option in
    /// order and validating the result.
    ///
    /// # Errors
    /// Returns the first option's error, or the validation error.
    pub fn new(opts: impl IntoIterator<Item = Opt>) -> Result<Self, KvMiddlewareError> {
        Config::default().copy_with(opts)
    }

    /// Derive a new configuration from this one. Options apply in order and
    /// short-circuit on the first failure; the source is never mutated and
    /// the result is re-validated.
    ///
    /// # Errors
    /// Returns the first option's error, or the validation error.
    pub fn copy_with(
        &self,
        opts: impl IntoIterator<Item = Opt>,
    ) -> Result<Self, KvMiddlewareError> {
        let mut config = self.clone();
        for opt in opts {
            config = opt.apply(config)?;
        }
        config.validate()?;
        Ok(config)
    }

    /// Check cross-field invariants. Cluster-mode stores support only
    /// database zero.
    ///
    /// # Errors
    /// Returns `ConfigError` when `cluster` is set with a nonzero database
    /// index.
    pub fn validate(&self) -> Result<(), KvMiddlewareError> {
        if self.cluster && self.db != 0 {
            return Err(KvMiddlewareError::ConfigError(
                "cluster mode supports only database 0".to_string(),
            ));
        }
        Ok(())
    }

    /// The `host:port` dial address.
    #[must_use]
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    #[must_use]
    pub fn cluster(&self) -> bool {
        self.cluster
    }

    #[must_use]
    pub fn db(&self) -> u32 {
        self.db
    }

    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    #[must_use]
    pub fn port(&self) -> u16 {
        self.port
    }

    #[must_use]
    pub fn password(&self) -> Option<&str> {
        self.password.as_deref()
    }

    #[must_use]
    pub fn idle_timeout(&self) -> Duration {
        self.idle_timeout
    }

    #[must_use]
    pub fn max_conn_lifetime(&self) -> Duration {
        self.max_conn_lifetime
    }

    #[must_use]
    pub fn max_active(&self) -> usize {
        self.max_active
    }

    #[must_use]
    pub fn max_idle(&self) -> usize {
        self.max_idle
    }

    #[must_use]
    pub fn wait(&self) -> bool {
        self.wait
    }

    /// Whether [`select`](crate::client::KvClient::select) is allowed on a
    /// client built from this configuration. Cluster mode and
    /// select-derived configurations are unselectable.
    #[must_use]
    pub fn is_selectable(&self) -> bool {
        self.selectable
    }

    /// Whether this configuration was derived for a transaction session.
    #[must_use]
    pub fn is_transacting(&self) -> bool {
        self.transacting
    }

    pub(crate) fn dialer(&self) -> &Arc<dyn DialStrategy> {
        &self.dialer
    }

    pub(crate) fn test_on_borrow(&self) -> &Arc<dyn BorrowStrategy> {
        &self.test_on_borrow
    }
}

// Manual Debug because the strategy trait objects don't implement it.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("cluster", &self.cluster)
            .field("db", &self.db)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("password", &self.password.as_ref().map(|_| "<set>"))
            .field("idle_timeout", &self.idle_timeout)
            .field("max_conn_lifetime", &self.max_conn_lifetime)
            .field("max_active", &self.max_active)
            .field("max_idle", &self.max_idle)
            .field("wait", &self.wait)
            .field("selectable", &self.selectable)
            .field("transacting", &self.transacting)
            .finish_non_exhaustive()
    }
}
