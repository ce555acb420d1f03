//! Cache Module
//!
//! The in-memory engine: hash index plus LRU ordering list, with TTL
//! expiration and bounded capacity.

mod entry;
mod list;
mod stats;
mod store;


// Re-export public types
pub use entry::CacheEntry;
pub use list::{LruList, NodeId};
pub use stats::CacheStats;
pub use store::CacheStore;

use std::sync::Arc;
use tokio::sync::Mutex;

/// The engine behind its single exclusive lock, cloneable across tasks.
///
/// Every operation, the sweeper's pass, and the snapshot codec all
/// acquire this one mutex, so the index and list can never be observed
/// out of step.
pub type SharedStore = Arc<Mutex<CacheStore>>;

/// Wraps a store for sharing between connection tasks.
pub fn shared(store: CacheStore) -> SharedStore {
    Arc::new(Mutex::new(store))
}
