//! API Routes
//!
//! Configures the Axum router with all cache server endpoints.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    delete_key_handler, get_key_handler, health_handler, list_keys_handler, load_handler,
    save_handler, set_key_handler, stats_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `POST /keys/:key` - Store a value under a key
/// - `GET /keys/:key` - Retrieve a value by key
/// - `DELETE /keys/:key` - Delete a key
/// - `GET /keys` - List live keys, MRU first
/// - `GET /stats` - Get cache statistics
/// - `POST /save` - Save a snapshot to disk
/// - `POST /load` - Load the snapshot from disk
/// - `GET /health` - Health check endpoint
///
/// # Middleware
/// - CORS: Allows any origin (configurable for production)
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    // Configure CORS middleware
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build router with all endpoints
    Router::new()
        .route(
            "/keys/:key",
            post(set_key_handler)
                .get(get_key_handler)
                .delete(delete_key_handler),
        )
        .route("/keys", get(list_keys_handler))
        .route("/stats", get(stats_handler))
        .route("/save", post(save_handler))
        .route("/load", post(load_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
