//! Request DTOs for the cache server API
//!
//! Defines the structure of incoming HTTP request bodies.

use serde::Deserialize;

/// Request body for storing a value (POST /keys/{key})
///
/// # Fields
/// - `value`: The value to store
/// - `ttl`: Optional TTL in seconds; absent or non-positive means the
///   entry keeps no new expiration (plain SET semantics)
#[derive(Debug, Clone, Deserialize)]
pub struct SetKeyRequest {
    /// The value to store
    pub value: String,
    /// Optional TTL in seconds
    #[serde(default)]
    pub ttl: Option<i64>,
}
