//! Error types for skinsync-common.

use thiserror::Error;

/// Common error type for skinsync operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid plugin file name.
    #[error("invalid mod key: {0}")]
    InvalidModKey(String),

    /// Invalid form key text.
    #[error("invalid form key format: {0}")]
    InvalidFormKey(String),

    /// Form id does not fit in the 24 bits a plugin can address.
    #[error("form id {0:#x} exceeds 0xFFFFFF")]
    FormIdOutOfRange(u32),
}

/// Result type alias using the common Error type.
pub type Result<T> = std::result::Result<T, Error>;
