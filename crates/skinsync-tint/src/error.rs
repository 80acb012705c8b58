//! Error types for patching.

use thiserror::Error;

/// Errors that abort a patch run.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Record store error, including failed override writes.
    #[error("{0}")]
    Records(#[from] skinsync_records::Error),

    /// Settings file could not be parsed.
    #[error("invalid settings: {0}")]
    Settings(#[from] serde_json::Error),
}

/// Result type for patch operations.
pub type Result<T> = std::result::Result<T, Error>;
