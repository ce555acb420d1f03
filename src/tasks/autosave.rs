//! Snapshot Auto-Save
//!
//! Background task that persists the cache to disk at a fixed interval.
//! A failed save is logged and swallowed; the next tick retries.

use std::path::PathBuf;
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::cache::SharedStore;
use crate::snapshot;

/// Spawns the auto-save ticker.
///
/// The task exits when the shutdown channel fires; any save already in
/// progress completes first.
pub fn spawn_autosave_task(
    store: SharedStore,
    path: PathBuf,
    interval_secs: u64,
    mut shutdown: broadcast::Receiver<()>,
) -> JoinHandle<()> {
    let interval = Duration::from_secs(interval_secs);

    tokio::spawn(async move {
        info!(
            "auto-save started (interval: {interval_secs}s, path: {})",
            path.display()
        );

        loop {
            tokio::select! {
                _ = tokio::time::sleep(interval) => {
                    match snapshot::save(&store, &path).await {
                        Ok(()) => debug!("auto-save complete"),
                        Err(e) => warn!("auto-save failed: {e}"),
                    }
                }
                _ = shutdown.recv() => {
                    info!("auto-save stopped");
                    break;
                }
            }
        }
    })
}
