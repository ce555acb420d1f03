//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.

use chrono::{DateTime, Duration, Utc};

// == Cache Entry ==
/// A single cache entry: key, opaque value, and optional expiration instant.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The key this entry is stored under
    pub key: String,
    /// The stored value
    pub value: String,
    /// Absolute expiration instant, None = no expiration
    pub expire_at: Option<DateTime<Utc>>,
}

impl CacheEntry {
    /// Creates a new entry without expiration.
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            expire_at: None,
        }
    }

    /// Creates a new entry expiring `ttl_secs` seconds from now.
    ///
    /// The caller validates that `ttl_secs` is positive.
    pub fn with_ttl(key: impl Into<String>, value: impl Into<String>, ttl_secs: i64) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            expire_at: Some(Utc::now() + Duration::seconds(ttl_secs)),
        }
    }

    /// Returns true if the entry carries an expiration that is now in the past.
    ///
    /// Entries without an expiration never expire.
    pub fn is_expired(&self) -> bool {
        match self.expire_at {
            Some(expire_at) => Utc::now() > expire_at,
            None => false,
        }
    }

    /// Remaining time to live in seconds, rounded up so any unexpired
    /// entry reports at least 1.
    ///
    /// - `None` if the entry has no expiration
    /// - `Some(0)` if the entry has already expired
    /// - `Some(n)` otherwise
    pub fn remaining_secs(&self) -> Option<i64> {
        self.expire_at.map(|expire_at| {
            let ms = (expire_at - Utc::now()).num_milliseconds();
            if ms <= 0 {
                0
            } else {
                (ms + 999) / 1000
            }
        })
    }
}
