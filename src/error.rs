//! Error types for the product cache service
//!
//! Three layers of failure are kept apart: cache backend errors (always
//! recovered inside the service), store errors (propagated untouched) and
//! the caller-facing `ProductError`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::{ErrorResponse, ProductId};

// == Cache Error Enum ==
/// Failure reported by a cache backend.
///
/// The service logs these and falls through to the store; they never reach
/// an API caller.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// Backend unreachable, connection dropped or call timed out
    #[error("Cache backend unavailable: {0}")]
    Unavailable(String),

    /// Value could not be encoded or decoded
    #[error("Cache serialization failed: {0}")]
    Serialization(String),

    /// Backend refused the entry (oversized key or value)
    #[error("Cache entry rejected: {0}")]
    Rejected(String),
}

impl From<serde_json::Error> for CacheError {
    fn from(err: serde_json::Error) -> Self {
        CacheError::Serialization(err.to_string())
    }
}

impl From<redis::RedisError> for CacheError {
    fn from(err: redis::RedisError) -> Self {
        CacheError::Unavailable(err.to_string())
    }
}

// == Store Error Enum ==
/// Failure reported by the persistent store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Store failure: {0}")]
    Backend(String),
}

// == Product Error Enum ==
/// Error surfaced by `ProductCacheService` operations.
#[derive(Error, Debug)]
pub enum ProductError {
    /// Entity absent from the store
    #[error("Product not found: {0}")]
    NotFound(ProductId),

    /// The store holds no products at all
    #[error("No products found")]
    NoData,

    /// Malformed request fields
    #[error("Invalid request: {0}")]
    Validation(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

// == IntoResponse Implementation ==
impl IntoResponse for ProductError {
    fn into_response(self) -> Response {
        let status = match &self {
            ProductError::NotFound(_) | ProductError::NoData => StatusCode::NOT_FOUND,
            ProductError::Validation(_) => StatusCode::BAD_REQUEST,
            ProductError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(ErrorResponse::new(self.to_string()));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for service operations.
pub type Result<T> = std::result::Result<T, ProductError>;
