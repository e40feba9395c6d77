//! Server error types.

use thiserror::Error;
use tw_core::error::GameError;

/// Errors of the server and its client.
#[derive(Error, Debug)]
pub enum ServerError {
    /// Socket or file error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The config file is not valid RON.
    #[error("failed to parse config: {0}")]
    Config(#[from] ron::error::SpannedError),

    /// A config value is out of range.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// Error from the simulation core.
    #[error(transparent)]
    Game(#[from] GameError),

    /// A snapshot could not be decoded.
    #[error("invalid snapshot: {0}")]
    Json(#[from] serde_json::Error),

    /// The server rejected a request.
    #[error("rejected: {0}")]
    Rejected(String),

    /// The peer closed the connection.
    #[error("connection closed")]
    Closed,
}

/// Result type for server operations.
pub type Result<T> = std::result::Result<T, ServerError>;
