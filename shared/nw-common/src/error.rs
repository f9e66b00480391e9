//! Common Error Types

use thiserror::Error;

/// Errors raised while interpreting shared wire values.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// Content type discriminator was not `news` or `video`.
    #[error("Unknown content type: {0}")]
    UnknownContentType(String),

    /// Sort order was not `ASC` or `DESC`.
    #[error("Unknown sort order: {0}")]
    UnknownSortOrder(String),

    /// Status string did not match any known publication status.
    #[error("Unknown status: {0}")]
    UnknownStatus(String),

    /// A value failed validation before being sent to the API.
    #[error("Validation failed: {0}")]
    Validation(String),
}

/// Result alias for common operations.
pub type Result<T> = std::result::Result<T, Error>;
