//! Expiration Sweeper
//!
//! Background task that periodically removes expired cache entries, so
//! keys that are never touched again still get reclaimed.

use std::time::Duration;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::SharedStore;

/// Spawns the expiration sweeper.
///
/// Every `interval_secs` the task takes the engine lock and removes every
/// entry whose expiration is in the past. The lock is held only for the
/// duration of one sweep, never across ticks. The task exits when the
/// shutdown channel fires.
pub fn spawn_sweeper_task(
    store: SharedStore,
    interval_secs: u64,
    mut shutdown: broadcast::Receiver<()>,
) -> JoinHandle<()> {
    let interval = Duration::from_secs(interval_secs);

    tokio::spawn(async move {
        info!("expiration sweeper started (interval: {interval_secs}s)");

        loop {
            tokio::select! {
                _ = tokio::time::sleep(interval) => {
                    let removed = store.lock().await.sweep_expired();
                    if removed > 0 {
                        info!("sweeper removed {removed} expired entries");
                    } else {
                        debug!("sweeper found no expired entries");
                    }
                }
                _ = shutdown.recv() => {
                    info!("expiration sweeper stopped");
                    break;
                }
            }
        }
    })
}
