//! memstash - a bounded in-memory key/value cache server
//!
//! Provides LRU eviction, per-entry TTL expiration, JSON snapshot
//! persistence, and two concurrent frontends: a line-oriented text
//! protocol over TCP and a JSON REST API over HTTP.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod snapshot;
pub mod tasks;
pub mod tcp;

pub use api::AppState;
pub use cache::{CacheStore, SharedStore};
pub use config::Config;
pub use error::{CacheError, Result};
