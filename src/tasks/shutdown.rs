//! Shutdown Save
//!
//! One-shot task armed at startup: waits for Ctrl+C or SIGTERM, saves a
//! final snapshot, then fires the shutdown broadcast so every other task
//! and both listeners wind down.

use std::path::PathBuf;

use tokio::signal;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::cache::SharedStore;
use crate::snapshot;

/// Spawns the shutdown watcher.
///
/// On signal receipt the task performs one save (a failure is logged but
/// does not block shutdown) and then sends on `shutdown_tx`. The send is
/// the observable completion event: receivers only wake after the final
/// snapshot attempt finished.
pub fn spawn_shutdown_save(
    store: SharedStore,
    path: PathBuf,
    shutdown_tx: broadcast::Sender<()>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        wait_for_signal().await;
        info!("shutdown signal received, saving snapshot...");

        match snapshot::save(&store, &path).await {
            Ok(()) => info!("shutdown snapshot saved to {}", path.display()),
            Err(e) => error!("shutdown save failed: {e}"),
        }

        let _ = shutdown_tx.send(());
    })
}

/// Waits for Ctrl+C or SIGTERM.
async fn wait_for_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("received SIGTERM, initiating shutdown...");
        }
    }
}
