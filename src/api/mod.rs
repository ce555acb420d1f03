//! API Module
//!
//! HTTP handlers and routing for the cache server REST API.
//!
//! # Endpoints
//! - `POST /keys/:key` - Store a value under a key
//! - `GET /keys/:key` - Retrieve a value by key
//! - `DELETE /keys/:key` - Delete a key
//! - `GET /keys` - List live keys
//! - `GET /stats` - Get cache statistics
//! - `POST /save` / `POST /load` - Snapshot persistence
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
