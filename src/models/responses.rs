//! Response DTOs for the cache server API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

/// Response body for a value lookup (GET /keys/{key})
#[derive(Debug, Clone, Serialize)]
pub struct KeyValueResponse {
    /// The requested key
    pub key: String,
    /// The stored value
    pub value: String,
}

impl KeyValueResponse {
    /// Creates a new KeyValueResponse
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Acknowledgement for writes against a single key (POST/DELETE /keys/{key})
#[derive(Debug, Clone, Serialize)]
pub struct AckResponse {
    /// Always "OK"
    pub status: String,
    /// The key that was written or removed
    pub key: String,
}

impl AckResponse {
    /// Creates a new AckResponse
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            status: "OK".to_string(),
            key: key.into(),
        }
    }
}

/// Response body for the key listing (GET /keys)
#[derive(Debug, Clone, Serialize)]
pub struct KeysResponse {
    /// Live keys in MRU→LRU order
    pub keys: Vec<String>,
    /// Number of keys returned
    pub count: usize,
}

impl KeysResponse {
    /// Creates a new KeysResponse
    pub fn new(keys: Vec<String>) -> Self {
        let count = keys.len();
        Self { keys, count }
    }
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Current number of entries in cache
    pub keys: usize,
    /// Maximum number of entries
    pub capacity: usize,
    /// Number of cache hits
    pub hits: u64,
    /// Number of cache misses
    pub misses: u64,
    /// Number of evictions
    pub evictions: u64,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

impl StatsResponse {
    /// Creates a new StatsResponse from counter values
    pub fn new(keys: usize, capacity: usize, hits: u64, misses: u64, evictions: u64) -> Self {
        let total = hits + misses;
        let hit_rate = if total > 0 {
            hits as f64 / total as f64
        } else {
            0.0
        };
        Self {
            keys,
            capacity,
            hits,
            misses,
            evictions,
            hit_rate,
        }
    }
}

/// Bare acknowledgement for persistence operations (POST /save, POST /load)
#[derive(Debug, Clone, Serialize)]
pub struct StatusResponse {
    /// Always "OK"
    pub status: String,
}

impl StatusResponse {
    /// Creates an OK StatusResponse
    pub fn ok() -> Self {
        Self {
            status: "OK".to_string(),
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    /// Creates a new ErrorResponse
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
