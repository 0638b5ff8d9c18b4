//! Error types for the chunked cache layer
//!
//! Provides unified error handling using thiserror. None of these errors
//! escape the public facade; they travel between the internal components
//! and are turned into log lines and cache misses at the boundary.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Store Error Enum ==
/// Failure reported by the underlying key-value store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The store could not be reached or its state is unusable
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// The store refused an entry (size or key limits)
    #[error("Store rejected entry: {0}")]
    Rejected(String),
}

// == Cache Error Enum ==
/// Internal error taxonomy of the chunked cache layer.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Key fails the syntax or length check
    #[error("Invalid key: {0:?}")]
    InvalidKey(String),

    /// Value serialized to `null`
    #[error("Refusing to cache an empty value")]
    EmptyValue,

    /// Serialized value is beyond the absolute ceiling
    #[error("Value of {length} characters exceeds maximum of {max}")]
    OversizedValue { length: usize, max: usize },

    /// Value would need more chunks than allowed
    #[error("Value needs {needed} chunks, maximum is {max}")]
    TooManyChunks { needed: usize, max: usize },

    /// Count marker is not a usable chunk count
    #[error("Corrupt chunk marker for {key}: {raw:?}")]
    CorruptMarker { key: String, raw: String },

    /// Chunk entries present do not match the count marker
    #[error("Incomplete chunk set for {key}: expected {expected}, found {found}")]
    IncompleteChunkSet {
        key: String,
        expected: usize,
        found: usize,
    },

    /// Stored text is not valid serialized data for the requested type
    #[error("Failed to parse cached value: {0}")]
    ParseFailure(#[source] serde_json::Error),

    /// Value could not be serialized
    #[error("Failed to serialize value: {0}")]
    Serialize(#[source] serde_json::Error),

    /// Underlying store raised
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Key has no cached value (HTTP layer only)
    #[error("Key not found: {0}")]
    NotFound(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = match &self {
            CacheError::NotFound(_) | CacheError::InvalidKey(_) => StatusCode::NOT_FOUND,
            CacheError::EmptyValue
            | CacheError::OversizedValue { .. }
            | CacheError::TooManyChunks { .. }
            | CacheError::Serialize(_) => StatusCode::BAD_REQUEST,
            CacheError::Store(StoreError::Unavailable(_)) => StatusCode::SERVICE_UNAVAILABLE,
            CacheError::Store(StoreError::Rejected(_)) => StatusCode::BAD_REQUEST,
            CacheError::CorruptMarker { .. }
            | CacheError::IncompleteChunkSet { .. }
            | CacheError::ParseFailure(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Aliases ==
/// Convenience Result type for the cache layer.
pub type Result<T> = std::result::Result<T, CacheError>;

/// Result type returned by [`crate::store::KvStore`] implementations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;
