use deadpool::managed::{PoolError, TimeoutType};
use thiserror::Error;

/// Error type shared by every fallible operation in the crate.
///
/// Errors are ordinary return values; nothing here panics or retries.
/// Store error replies pass through as [`KvMiddlewareError::StoreError`]
/// without modification, except where a sentinel-expecting command wraps
/// them with mismatch context.
#[derive(Debug, Error)]
pub enum KvMiddlewareError {
    /// Invalid configuration value or option conflict, surfaced at build
    /// time and never partially applied.
    #[error("configuration error: {0}")]
    ConfigError(String),

    /// Dial, acquire, or pool failure.
    #[error("connection error: {0}")]
    ConnectionError(String),

    #[error(transparent)]
    IoError(#[from] std::io::Error),

    /// Malformed wire framing or a reply shape no command expects.
    #[error("protocol error: {0}")]
    ProtocolError(String),

    /// Error reply from the store, passed through unmodified.
    #[error("store error: {0}")]
    StoreError(String),

    /// A sentinel-expecting command received a different reply.
    #[error("{command} expected \"{expected}\" response, got: \"{actual}\"")]
    ResponseMismatch {
        command: String,
        expected: String,
        actual: String,
    },

    /// Rejected by a client-side policy (safe-mode gate, select policy)
    /// before any network contact.
    #[error("policy violation: {0}")]
    PolicyError(String),

    /// Rejected argument (blank key, empty member list, bad expiry).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Nil reply where a value was required.
    #[error("nil reply")]
    NilReply,
}

impl From<PoolError<KvMiddlewareError>> for KvMiddlewareError {
    fn from(err: PoolError<KvMiddlewareError>) -> Self {
        match err {
            PoolError::Backend(err) => err,
            PoolError::Timeout(TimeoutType::Wait) => {
                KvMiddlewareError::ConnectionError("connection pool exhausted".to_string())
            }
            PoolError::Timeout(kind) => {
                KvMiddlewareError::ConnectionError(format!("pool timeout: {kind:?}"))
            }
            PoolError::Closed => {
                KvMiddlewareError::ConnectionError("connection pool is closed".to_string())
            }
            PoolError::NoRuntimeSpecified => {
                KvMiddlewareError::ConnectionError("pool runtime not configured".to_string())
            }
            PoolError::PostCreateHook(_) => {
                KvMiddlewareError::ConnectionError("pool post-create hook failed".to_string())
            }
        }
    }
}
