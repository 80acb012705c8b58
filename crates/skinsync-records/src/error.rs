//! Error types for record storage.

use thiserror::Error;

/// Errors that can occur when loading or patching records.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Common library error.
    #[error("{0}")]
    Common(#[from] skinsync_common::Error),

    /// Snapshot could not be decoded or encoded.
    #[cfg(feature = "json")]
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The same plugin appears twice in a load order.
    #[error("plugin listed twice in load order: {0}")]
    DuplicatePlugin(String),

    /// A builder handle that does not belong to this builder.
    #[error("unknown plugin handle: {0}")]
    UnknownPlugin(usize),

    /// A record that must exist could not be found.
    #[error("record not found: {0}")]
    RecordNotFound(String),
}

/// Result type for record operations.
pub type Result<T> = std::result::Result<T, Error>;
