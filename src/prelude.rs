//! Convenient imports for common functionality.
//!
//! This module re-exports the most commonly used types so callers can
//! get started with a single `use`.

pub use crate::client::KvClient;
pub use crate::config::Config;
pub use crate::connection::StoreConnection;
pub use crate::error::KvMiddlewareError;
pub use crate::options::{self, Opt};
pub use crate::pool::{PoolStatus, PooledConnection};
pub use crate::resp::Reply;
pub use crate::stats::{CommandCounts, Stats};
pub use crate::strategy::{BorrowStrategy, DialStrategy};
pub use crate::transaction::Transaction;
