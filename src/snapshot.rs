//! Snapshot Module
//!
//! Serializes the cache to a single JSON document and back. The on-disk
//! layout is a version string, the capacity at save time, and the live
//! entries in MRU→LRU order; entries without expiration omit the
//! `expire_at` field.
//!
//! Saving writes a sibling temp file, fsyncs it, and renames it over the
//! target so a crash mid-save leaves the previous snapshot intact.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::cache::{CacheEntry, CacheStore, SharedStore};
use crate::error::{CacheError, Result};

/// Format version written into every snapshot.
pub const SNAPSHOT_VERSION: &str = "1.0";

// == On-Disk Types ==
/// A single persisted entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotEntry {
    pub key: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expire_at: Option<DateTime<Utc>>,
}

/// The whole persisted store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub version: String,
    pub capacity: usize,
    pub entries: Vec<SnapshotEntry>,
}

impl Snapshot {
    /// Captures the live (non-expired) entries of a store in MRU→LRU order.
    pub fn capture(store: &CacheStore) -> Self {
        let entries = store
            .entries()
            .filter(|entry| !entry.is_expired())
            .map(|entry| SnapshotEntry {
                key: entry.key.clone(),
                value: entry.value.clone(),
                expire_at: entry.expire_at,
            })
            .collect();

        Self {
            version: SNAPSHOT_VERSION.to_string(),
            capacity: store.capacity(),
            entries,
        }
    }

    /// Replaces a store's contents with this snapshot's entries.
    ///
    /// Entries already expired are skipped and loading stops once the
    /// store's own capacity is reached; counters are untouched.
    pub fn restore_into(&self, store: &mut CacheStore) {
        store.replace_entries(self.entries.iter().map(|entry| CacheEntry {
            key: entry.key.clone(),
            value: entry.value.clone(),
            expire_at: entry.expire_at,
        }));
    }
}

// == Save ==
/// Saves the store to `path` under the engine lock.
///
/// The snapshot is serialized to `<path>.tmp`, flushed to disk, and then
/// atomically renamed over the target.
pub async fn save(store: &SharedStore, path: &Path) -> Result<()> {
    let guard = store.lock().await;
    let snapshot = Snapshot::capture(&guard);

    let data = serde_json::to_vec_pretty(&snapshot).map_err(CacheError::SerializeFailed)?;

    let tmp = path.with_extension("tmp");
    let result = write_and_rename(&tmp, path, &data).await;
    if result.is_err() {
        // Leave the previous snapshot in place; just drop the partial file.
        let _ = fs::remove_file(&tmp).await;
    }
    result?;

    debug!(
        entries = snapshot.entries.len(),
        path = %path.display(),
        "snapshot saved"
    );
    Ok(())
}

async fn write_and_rename(tmp: &Path, path: &Path, data: &[u8]) -> Result<()> {
    let mut file = fs::File::create(tmp).await.map_err(CacheError::WriteFailed)?;
    file.write_all(data).await.map_err(CacheError::WriteFailed)?;
    file.sync_all().await.map_err(CacheError::WriteFailed)?;
    drop(file);
    fs::rename(tmp, path).await.map_err(CacheError::WriteFailed)
}

// == Load ==
/// Loads a snapshot from `path`, replacing all in-memory state.
///
/// A missing file is a fresh start and succeeds as a no-op. The file is
/// read and parsed before the engine lock is taken, so a parse failure
/// leaves the store exactly as it was.
pub async fn load(store: &SharedStore, path: &Path) -> Result<()> {
    let data = match fs::read(path).await {
        Ok(data) => data,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "no snapshot file, starting fresh");
            return Ok(());
        }
        Err(e) => return Err(CacheError::ReadFailed(e)),
    };

    let snapshot: Snapshot = serde_json::from_slice(&data).map_err(CacheError::ParseFailed)?;

    let mut guard = store.lock().await;
    snapshot.restore_into(&mut guard);

    debug!(
        entries = guard.len(),
        path = %path.display(),
        "snapshot loaded"
    );
    Ok(())
}
