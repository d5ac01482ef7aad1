//! Error types for cascade-client-core

use thiserror::Error;

/// Result type alias using our Error
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type
#[derive(Error, Debug)]
pub enum Error {
    /// Wire record matched none of the known value shapes.
    /// Classification is total over well-formed backend output, so this
    /// surfaces as a hard failure instead of defaulting the value.
    #[error("Unrecognized value shape: {0}")]
    UnrecognizedValueShape(String),

    /// Malformed resource or field path string
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// Variant-specific comparison attempted across different type ranks.
    /// The comparator checks rank first, so hitting this means a defect
    /// in the comparator itself, not bad input.
    #[error("Comparison type mismatch: {0} vs {1}")]
    ComparisonTypeMismatch(&'static str, &'static str),

    /// JSON parsing error (serde_json)
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create an unrecognized value shape error
    pub fn shape(msg: impl Into<String>) -> Self {
        Error::UnrecognizedValueShape(msg.into())
    }

    /// Create an invalid path error
    pub fn invalid_path(msg: impl Into<String>) -> Self {
        Error::InvalidPath(msg.into())
    }

    /// Create a comparison type mismatch error
    pub fn type_mismatch(left: &'static str, right: &'static str) -> Self {
        Error::ComparisonTypeMismatch(left, right)
    }
}
