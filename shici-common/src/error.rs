//! Common error types for shici

use thiserror::Error;

/// Common result type for shici operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across shici crates
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid user input or request parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Every shard of a load failed and nothing is available to browse
    #[error("No poems could be loaded ({failed} shard(s) failed)")]
    NothingLoaded { failed: usize },
}
