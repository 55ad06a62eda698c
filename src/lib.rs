//! Pooled middleware for Redis-compatible key-value stores.
//!
//! This crate wraps a connection pool in a typed command surface with
//! client-side safeguards:
//!
//! - **Functional options** build immutable, validated configurations
//!   ([`Config`], [`options`]).
//! - **Restricted / unrestricted clients** gate whole-store destructive
//!   commands (`FLUSHALL`, `FLUSHDB`, pattern deletes) behind an explicit
//!   factory choice.
//! - **Typed execution helpers** are the single seam every command runs
//!   through: acquire from the pool, one round-trip, release on every
//!   exit path, count the command.
//! - **`select`** derives a new single-connection client pinned to a
//!   database index, because the selected database is a property of a
//!   physical connection, not of a client handle.
//!
//! Pooling is delegated to [deadpool]; dialing and borrow-time health
//! checks are replaceable strategies on the configuration.
//!
//! ```no_run
//! use kv_middleware::{KvClient, KvMiddlewareError, options};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), KvMiddlewareError> {
//!     let client = KvClient::restricted([
//!         options::host("127.0.0.1"),
//!         options::port(6379),
//!     ])?;
//!
//!     client.set("greeting", "hello").await?;
//!     println!("{}", client.get("greeting").await?);
//!
//!     let stats = client.stats();
//!     println!("SET dispatched {:?} times", stats.commands.count("SET"));
//!
//!     client.close();
//!     Ok(())
//! }
//! ```
//!
//! [deadpool]: https://docs.rs/deadpool

pub mod client;
pub mod commands;
pub mod config;
pub mod connection;
pub mod error;
pub mod options;
pub mod pool;
pub mod resp;
pub mod stats;
pub mod strategy;
pub mod transaction;

pub mod prelude;

pub use client::KvClient;
pub use config::Config;
pub use error::KvMiddlewareError;
pub use options::Opt;
pub use pool::{PoolStatus, PooledConnection};
pub use resp::Reply;
pub use stats::{CommandCounts, Stats};
pub use transaction::Transaction;
