//! Error types for cascade-client-query

use thiserror::Error;

/// Result type alias using our QueryError
pub type Result<T> = std::result::Result<T, QueryError>;

/// Query-layer error type
#[derive(Error, Debug)]
pub enum QueryError {
    /// Core error: classification, paths, comparison
    #[error("Core error: {0}")]
    Core(#[from] cascade_client_core::Error),

    /// Cursor carries more values than the ordering has fields
    #[error("Cursor carries {given} values but the ordering has {ordered} fields")]
    TooManyCursorValues { given: usize, ordered: usize },

    /// Document lacks a field the ordering requires
    #[error("Document {document} lacks ordered field {field:?}")]
    MissingOrderedField { field: String, document: String },

    /// Key boundary outside the query scope or not a document
    #[error("Invalid key boundary: {0}")]
    InvalidKeyBoundary(String),

    /// Ordered field absent from a result document's projection
    #[error("Ordering references field {0:?} absent from a document")]
    IncomparableOrdering(String),
}

impl QueryError {
    /// Create a too-many-cursor-values error
    pub fn too_many_cursor_values(given: usize, ordered: usize) -> Self {
        QueryError::TooManyCursorValues { given, ordered }
    }

    /// Create a missing ordered field error
    pub fn missing_ordered_field(field: impl Into<String>, document: impl Into<String>) -> Self {
        QueryError::MissingOrderedField {
            field: field.into(),
            document: document.into(),
        }
    }

    /// Create an invalid key boundary error
    pub fn invalid_key_boundary(msg: impl Into<String>) -> Self {
        QueryError::InvalidKeyBoundary(msg.into())
    }

    /// Create an incomparable ordering error
    pub fn incomparable_ordering(field: impl Into<String>) -> Self {
        QueryError::IncomparableOrdering(field.into())
    }
}
