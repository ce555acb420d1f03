//! API Handlers
//!
//! HTTP request handlers for each cache server endpoint.

use std::path::PathBuf;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::cache::SharedStore;
use crate::error::{CacheError, Result};
use crate::models::{
    AckResponse, ErrorResponse, HealthResponse, KeyValueResponse, KeysResponse, SetKeyRequest,
    StatsResponse, StatusResponse,
};
use crate::snapshot;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// The engine behind its lock
    pub store: SharedStore,
    /// Snapshot target for /save and /load
    pub snapshot_path: PathBuf,
}

impl AppState {
    /// Creates a new AppState around a shared store.
    pub fn new(store: SharedStore, snapshot_path: PathBuf) -> Self {
        Self {
            store,
            snapshot_path,
        }
    }
}

/// Handler for POST /keys/{key}
///
/// Stores a key-value pair. A positive `ttl` in the body sets an
/// expiration; otherwise the entry is written with plain SET semantics.
/// A body that fails to parse answers 400.
pub async fn set_key_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
    body: std::result::Result<Json<SetKeyRequest>, JsonRejection>,
) -> Response {
    let Ok(Json(req)) = body else {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new("invalid JSON body")),
        )
            .into_response();
    };
    if key.is_empty() {
        return CacheError::InvalidKey.into_response();
    }

    let mut store = state.store.lock().await;
    let result = match req.ttl {
        Some(ttl) if ttl > 0 => store.set_with_ttl(&key, &req.value, ttl),
        _ => store.set(&key, &req.value),
    };

    match result {
        Ok(()) => (StatusCode::CREATED, Json(AckResponse::new(key))).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Handler for GET /keys/{key}
///
/// Absent and expired keys both answer 404.
pub async fn get_key_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<KeyValueResponse>> {
    let mut store = state.store.lock().await;
    let value = store.get(&key)?;

    Ok(Json(KeyValueResponse::new(key, value)))
}

/// Handler for DELETE /keys/{key}
pub async fn delete_key_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<AckResponse>> {
    let mut store = state.store.lock().await;
    store.delete(&key)?;

    Ok(Json(AckResponse::new(key)))
}

/// Handler for GET /keys
///
/// Lists live keys in MRU→LRU order.
pub async fn list_keys_handler(State(state): State<AppState>) -> Json<KeysResponse> {
    let store = state.store.lock().await;
    Json(KeysResponse::new(store.keys()))
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let store = state.store.lock().await;
    let stats = store.stats();

    Json(StatsResponse::new(
        store.len(),
        store.capacity(),
        stats.hits,
        stats.misses,
        stats.evictions,
    ))
}

/// Handler for POST /save
pub async fn save_handler(State(state): State<AppState>) -> Result<Json<StatusResponse>> {
    snapshot::save(&state.store, &state.snapshot_path).await?;
    Ok(Json(StatusResponse::ok()))
}

/// Handler for POST /load
pub async fn load_handler(State(state): State<AppState>) -> Result<Json<StatusResponse>> {
    snapshot::load(&state.store, &state.snapshot_path).await?;
    Ok(Json(StatusResponse::ok()))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
