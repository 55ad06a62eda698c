//! Functional options for [`Config`].
//!
//! An [`Opt`] is a pure transform-or-fail step over an immutable
//! configuration. [`Config::new`] and [`Config::copy_with`] apply a
//! sequence of them in order, stopping at the first failure:
//!
//! ```rust
//! use kv_middleware::{Config, options};
//!
//! let config = Config::new([
//!     options::host("cache.internal"),
//!     options::port(6380),
//!     options::max_active(32),
//! ])?;
//! assert_eq!(config.addr(), "cache.internal:6380");
//! # Ok::<(), kv_middleware::KvMiddlewareError>(())
//! ```

use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::error::KvMiddlewareError;
use crate::strategy::{BorrowStrategy, DialStrategy};

/// One configuration transform. Applying it either yields a new
/// configuration or an error; the input is consumed, never shared.
pub struct Opt {
    apply: Box<dyn FnOnce(Config) -> Result<Config, KvMiddlewareError> + Send>,
}

impl Opt {
    fn new<F>(f: F) -> Self
    where
        F: FnOnce(Config) -> Result<Config, KvMiddlewareError> + Send + 'static,
    {
        Opt { apply: Box::new(f) }
    }

    pub(crate) fn apply(self, config: Config) -> Result<Config, KvMiddlewareError> {
        (self.apply)(config)
    }
}

fn blank(s: &str) -> bool {
    s.trim().is_empty()
}

/// Enable or disable cluster mode. Cluster stores support only database
/// zero, so enabling also makes the configuration unselectable.
#[must_use]
pub fn cluster(enabled: bool) -> Opt {
    Opt::new(move |mut config| {
        config.cluster = enabled;
        if enabled {
            return unselectable().apply(config);
        }
        Ok(config)
    })
}

/// Target database index. Range conflicts with cluster mode surface via
/// validation, not here.
#[must_use]
pub fn db(index: u32) -> Opt {
    Opt::new(move |mut config| {
        config.db = index;
        Ok(config)
    })
}

/// Store host name. Blank or whitespace-only values are rejected.
#[must_use]
pub fn host(host: impl Into<String>) -> Opt {
    let host = host.into();
    Opt::new(move |mut config| {
        if blank(&host) {
            return Err(KvMiddlewareError::ConfigError(
                "host must not be blank".to_string(),
            ));
        }
        config.host = host;
        Ok(config)
    })
}

/// AUTH password. Blank or whitespace-only values are rejected.
#[must_use]
pub fn password(password: impl Into<String>) -> Opt {
    let password = password.into();
    Opt::new(move |mut config| {
        if blank(&password) {
            return Err(KvMiddlewareError::ConfigError(
                "password must not be blank".to_string(),
            ));
        }
        config.password = Some(password);
        Ok(config)
    })
}

/// Store port. Ports at or below 1023 are reserved and rejected.
#[must_use]
pub fn port(port: u16) -> Opt {
    Opt::new(move |mut config| {
        if port <= 1023 {
            return Err(KvMiddlewareError::ConfigError(format!(
                "port must be greater than 1023, got {port}"
            )));
        }
        config.port = port;
        Ok(config)
    })
}

/// How long a pooled connection may sit idle before it is discarded on
/// the next borrow. Zero disables the bound.
#[must_use]
pub fn idle_timeout(timeout: Duration) -> Opt {
    Opt::new(move |mut config| {
        config.idle_timeout = timeout;
        Ok(config)
    })
}

/// Maximum lifetime of a pooled connection. Zero disables the bound.
#[must_use]
pub fn max_conn_lifetime(lifetime: Duration) -> Opt {
    Opt::new(move |mut config| {
        config.max_conn_lifetime = lifetime;
        Ok(config)
    })
}

/// Maximum connections (idle and in use). Zero removes the cap.
#[must_use]
pub fn max_active(count: usize) -> Opt {
    Opt::new(move |mut config| {
        config.max_active = count;
        Ok(config)
    })
}

/// Upper bound on idle connections kept around. Advisory under the
/// current provider; see DESIGN.md.
#[must_use]
pub fn max_idle(count: usize) -> Opt {
    Opt::new(move |mut config| {
        config.max_idle = count;
        Ok(config)
    })
}

/// When the pool is saturated, wait for capacity instead of failing
/// immediately.
#[must_use]
pub fn wait(wait: bool) -> Opt {
    Opt::new(move |mut config| {
        config.wait = wait;
        Ok(config)
    })
}

/// Replace the connection-establishment strategy.
#[must_use]
pub fn dialer(strategy: Arc<dyn DialStrategy>) -> Opt {
    Opt::new(move |mut config| {
        config.dialer = strategy;
        Ok(config)
    })
}

/// Replace the health check run when a connection is borrowed from the
/// pool.
#[must_use]
pub fn test_on_borrow(strategy: Arc<dyn BorrowStrategy>) -> Opt {
    Opt::new(move |mut config| {
        config.test_on_borrow = strategy;
        Ok(config)
    })
}

/// Forbid `select` on clients built from this configuration. Guards
/// against re-selecting a client that is itself a select product.
pub(crate) fn unselectable() -> Opt {
    Opt::new(|mut config| {
        config.selectable = false;
        Ok(config)
    })
}

/// Mark the configuration as derived for a transaction session. The
/// transaction surface is a stub and derives nothing from it.
#[allow(dead_code)]
pub(crate) fn transacting() -> Opt {
    Opt::new(|mut config| {
        config.transacting = true;
        Ok(config)
    })
}
