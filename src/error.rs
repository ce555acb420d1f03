//! Error types for the cache server
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the cache server.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Key is empty
    #[error("invalid key: key cannot be empty")]
    InvalidKey,

    /// TTL is zero or negative where a positive duration is required
    #[error("invalid TTL: must be greater than zero")]
    InvalidTtl,

    /// Key not found in cache
    #[error("key not found: {0}")]
    NotFound(String),

    /// Key was present but past its expiration
    #[error("key expired: {0}")]
    Expired(String),

    /// Reserved for a future bounded-no-evict mode; SET currently handles a
    /// full cache by evicting, so nothing produces this.
    #[error("cache full: {0}")]
    CapacityExhausted(String),

    /// Snapshot file could not be read
    #[error("snapshot read failed: {0}")]
    ReadFailed(#[source] std::io::Error),

    /// Snapshot file could not be written
    #[error("snapshot write failed: {0}")]
    WriteFailed(#[source] std::io::Error),

    /// Snapshot could not be serialized to JSON
    #[error("snapshot serialize failed: {0}")]
    SerializeFailed(#[source] serde_json::Error),

    /// Snapshot file held invalid JSON
    #[error("snapshot parse failed: {0}")]
    ParseFailed(#[source] serde_json::Error),
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = match &self {
            CacheError::NotFound(_) | CacheError::Expired(_) => StatusCode::NOT_FOUND,
            CacheError::InvalidKey | CacheError::InvalidTtl => StatusCode::BAD_REQUEST,
            CacheError::CapacityExhausted(_) => StatusCode::SERVICE_UNAVAILABLE,
            CacheError::ReadFailed(_)
            | CacheError::WriteFailed(_)
            | CacheError::SerializeFailed(_)
            | CacheError::ParseFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the cache server.
pub type Result<T> = std::result::Result<T, CacheError>;
