//! Error types for the cache server
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Cache Error Enum ==
/// Unified error type for the cache server.
///
/// The cache core itself signals presence with options and booleans; typed
/// errors come from persistence and from the HTTP boundary (projection and
/// parameter validation).
#[derive(Error, Debug)]
pub enum CacheError {
    /// Key, list item, or dictionary item not found
    #[error("{0}")]
    NotFound(String),

    /// Projection requested against a value of an incompatible shape
    #[error("{0}")]
    ShapeMismatch(String),

    /// Malformed parameter or request payload
    #[error("{0}")]
    InvalidArgument(String),

    /// Snapshot file I/O failed
    #[error("snapshot io failed: {0}")]
    Io(#[from] std::io::Error),

    /// Snapshot encoding or decoding failed
    #[error("snapshot encoding failed: {0}")]
    Encoding(#[from] serde_json::Error),
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = match &self {
            CacheError::NotFound(_) => StatusCode::NOT_FOUND,
            CacheError::ShapeMismatch(_) | CacheError::InvalidArgument(_) => {
                StatusCode::BAD_REQUEST
            }
            CacheError::Io(_) | CacheError::Encoding(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, Json(ErrorResponse::new(self.to_string()))).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the cache server.
pub type Result<T> = std::result::Result<T, CacheError>;
