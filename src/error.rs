//! Error types for the progression engine.
//!
//! Not-found conditions are reported through `Option`/`bool` returns. The
//! variants here cover the cases callers are forced to handle: unknown
//! challenges, wallet operations without a connection, and storage failures.

use thiserror::Error;

/// Failures raised by a durable key-value store.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Sled error: {0}")]
    Sled(#[from] sled::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Malformed data under key '{key}': {reason}")]
    Malformed { key: String, reason: String },
}

/// Caller-facing error for engine operations.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Challenge with ID {0} not found")]
    ChallengeNotFound(String),

    #[error("Wallet not connected")]
    WalletNotConnected,

    #[error("Wallet error: {0}")]
    Wallet(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}
