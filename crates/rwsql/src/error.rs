//! Error types for rwsql

use crate::router::PoolKind;
use thiserror::Error;

/// Result type alias for rwsql operations
pub type DbResult<T> = Result<T, DbError>;

/// Error types for database operations
#[derive(Debug, Error)]
pub enum DbError {
    /// Operation attempted before `init()` or after `close()`
    #[error("database handle is not initialized (or already closed)")]
    NotInitialized,

    /// The resolved pool kind was never configured and no fallback applies
    #[error("no {0} pool is configured")]
    PoolUnavailable(PoolKind),

    /// A configured pool could not be reached at `init()` time
    #[error("initialization error: {0}")]
    Initialization(String),

    /// Malformed builder argument (empty IN list, update with nothing to set, ...)
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Statement execution failed in the driver
    #[error("query error: {0}")]
    Query(#[from] mysql_async::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Row decode/mapping error
    #[error("decode error: {0}")]
    Decode(String),
}

impl DbError {
    /// Create an invalid-argument error
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// Create an initialization error
    pub fn initialization(message: impl Into<String>) -> Self {
        Self::Initialization(message.into())
    }

    /// Create a row decode error
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode(message.into())
    }

    /// Check if this is a not-initialized error
    pub fn is_not_initialized(&self) -> bool {
        matches!(self, Self::NotInitialized)
    }

    /// Check if this is a pool-unavailable error
    pub fn is_pool_unavailable(&self) -> bool {
        matches!(self, Self::PoolUnavailable(_))
    }

    /// Check if this is an invalid-argument error
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }
}

impl From<serde_json::Error> for DbError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
