//! Error types for execql

use thiserror::Error;

/// Core error type for execql operations
#[derive(Error, Debug)]
pub enum ExecqlError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Query error: {0}")]
    Query(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Timeout: {0}")]
    Timeout(String),
}

impl ExecqlError {
    /// Whether the error came from the transport rather than from the statement itself
    pub fn is_connection_error(&self) -> bool {
        matches!(self, ExecqlError::Connection(_) | ExecqlError::Io(_))
    }
}

/// Result type alias for execql operations
pub type Result<T> = std::result::Result<T, ExecqlError>;
