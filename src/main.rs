//! memstash - a bounded in-memory key/value cache server
//!
//! Serves a line-oriented text protocol over TCP and a JSON REST API over
//! HTTP, backed by one LRU+TTL engine with snapshot persistence.

mod api;
mod cache;
mod config;
mod error;
mod models;
mod snapshot;
mod tasks;
mod tcp;

use std::net::SocketAddr;

use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api::{create_router, AppState};
use cache::CacheStore;
use config::Config;
use tasks::{spawn_autosave_task, spawn_shutdown_save, spawn_sweeper_task};

/// Main entry point for the memstash cache server.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables / .env
/// 3. Create the cache engine and load any existing snapshot
/// 4. Start background tasks: sweeper, auto-save, shutdown-save watcher
/// 5. Start the TCP text-protocol server
/// 6. Start the HTTP server and run until shutdown
#[tokio::main]
async fn main() {
    // Initialize tracing subscriber with env filter
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "memstash=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting memstash cache server");

    // Missing or invalid required configuration is fatal
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("configuration error: {e}");
            std::process::exit(1);
        }
    };
    info!(
        "Configuration loaded: capacity={}, tcp_port={}, http_port={}, sweep_interval={}s, autosave_interval={}s",
        config.capacity, config.tcp_port, config.http_port, config.sweep_interval,
        config.autosave_interval
    );

    let store = cache::shared(CacheStore::new(config.capacity));

    // Warm-start from the snapshot if one is on disk. A corrupt file is
    // logged and skipped; the server still comes up empty.
    match snapshot::load(&store, &config.snapshot_path).await {
        Ok(()) => {
            let loaded = store.lock().await.len();
            if loaded > 0 {
                info!("Loaded {loaded} entries from {}", config.snapshot_path.display());
            }
        }
        Err(e) => warn!("Could not load snapshot: {e}"),
    }

    // One broadcast channel fans the stop signal out to every task
    let (shutdown_tx, _) = tokio::sync::broadcast::channel::<()>(1);

    let sweeper_handle =
        spawn_sweeper_task(store.clone(), config.sweep_interval, shutdown_tx.subscribe());
    let autosave_handle = spawn_autosave_task(
        store.clone(),
        config.snapshot_path.clone(),
        config.autosave_interval,
        shutdown_tx.subscribe(),
    );
    let _watcher_handle = spawn_shutdown_save(
        store.clone(),
        config.snapshot_path.clone(),
        shutdown_tx.clone(),
    );
    info!("Background tasks started");

    // TCP text-protocol server
    let tcp_addr = SocketAddr::from(([0, 0, 0, 0], config.tcp_port));
    let tcp_listener = match tokio::net::TcpListener::bind(tcp_addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("TCP server failed to bind {tcp_addr}: {e}");
            std::process::exit(1);
        }
    };
    info!("TCP server listening on {tcp_addr}");
    let tcp_handle = tokio::spawn(tcp::serve(
        tcp_listener,
        store.clone(),
        config.snapshot_path.clone(),
        shutdown_tx.subscribe(),
    ));

    // HTTP REST server
    let state = AppState::new(store, config.snapshot_path.clone());
    let app = create_router(state);

    let http_addr = SocketAddr::from(([0, 0, 0, 0], config.http_port));
    let http_listener = match tokio::net::TcpListener::bind(http_addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("HTTP server failed to bind {http_addr}: {e}");
            std::process::exit(1);
        }
    };
    info!("HTTP server listening on http://{http_addr}");

    let mut http_shutdown = shutdown_tx.subscribe();
    if let Err(e) = axum::serve(http_listener, app)
        .with_graceful_shutdown(async move {
            let _ = http_shutdown.recv().await;
        })
        .await
    {
        error!("HTTP server error: {e}");
    }

    // The shutdown-save watcher already wrote the final snapshot before
    // broadcasting; wait for the remaining tasks to drain.
    let _ = tcp_handle.await;
    let _ = sweeper_handle.await;
    let _ = autosave_handle.await;

    info!("Server shutdown complete");
}
