//! Cache Store Module
//!
//! The cache engine: a hash index and an LRU ordering list updated in
//! lock-step, plus capacity enforcement, TTL bookkeeping, and counters.
//! Callers serialize access through a single mutex; every method leaves
//! index and list describing exactly the same set of entries.

use std::collections::HashMap;

use chrono::{Duration, Utc};

use crate::cache::{CacheEntry, CacheStats, LruList, NodeId};
use crate::error::{CacheError, Result};

// == Cache Store ==
/// Bounded key/value store with LRU eviction and per-entry TTL.
#[derive(Debug)]
pub struct CacheStore {
    /// Key → node handle into the ordering list
    index: HashMap<String, NodeId>,
    /// Entries in MRU→LRU order
    list: LruList,
    /// Performance counters
    stats: CacheStats,
    /// Maximum number of entries, fixed at construction
    capacity: usize,
}

impl CacheStore {
    /// Creates a new store holding at most `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        Self {
            index: HashMap::with_capacity(capacity),
            list: LruList::with_capacity(capacity),
            stats: CacheStats::new(),
            capacity,
        }
    }

    // == Set ==
    /// Stores a key-value pair without touching its expiration.
    ///
    /// Overwriting an existing key keeps whatever expiration the entry
    /// already carries; TTL changes go through [`set_with_ttl`] or
    /// [`set_expiry`]. Inserting a new key into a full store evicts the
    /// least-recently-used entry.
    ///
    /// [`set_with_ttl`]: CacheStore::set_with_ttl
    /// [`set_expiry`]: CacheStore::set_expiry
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        if key.is_empty() {
            return Err(CacheError::InvalidKey);
        }

        if let Some(&id) = self.index.get(key) {
            let entry = self.list.get_mut(id).expect("indexed node must be live");
            entry.value = value.to_string();
            self.list.move_to_front(id);
            return Ok(());
        }

        self.insert_new(CacheEntry::new(key, value));
        Ok(())
    }

    // == Set With TTL ==
    /// Stores a key-value pair expiring `ttl_secs` seconds from now.
    ///
    /// Overwriting an existing key replaces both value and expiration.
    pub fn set_with_ttl(&mut self, key: &str, value: &str, ttl_secs: i64) -> Result<()> {
        if key.is_empty() {
            return Err(CacheError::InvalidKey);
        }
        if ttl_secs <= 0 {
            return Err(CacheError::InvalidTtl);
        }

        if let Some(&id) = self.index.get(key) {
            let entry = self.list.get_mut(id).expect("indexed node must be live");
            entry.value = value.to_string();
            entry.expire_at = Some(Utc::now() + Duration::seconds(ttl_secs));
            self.list.move_to_front(id);
            return Ok(());
        }

        self.insert_new(CacheEntry::with_ttl(key, value, ttl_secs));
        Ok(())
    }

    /// Inserts a brand-new entry at the head, evicting the tail first if
    /// the store is full.
    fn insert_new(&mut self, entry: CacheEntry) {
        if self.index.len() == self.capacity {
            // The tail goes even if it happens to be expired; that still
            // counts as one eviction, never as an expiration.
            if let Some(evicted) = self.list.pop_back() {
                self.index.remove(&evicted.key);
                self.stats.record_eviction();
            }
        }
        let key = entry.key.clone();
        let id = self.list.push_front(entry);
        self.index.insert(key, id);
    }

    // == Get ==
    /// Retrieves a value by key, promoting the entry to most recently used.
    ///
    /// An entry found past its expiration is purged and reported as
    /// [`CacheError::Expired`]; both that case and an absent key count as
    /// a miss.
    pub fn get(&mut self, key: &str) -> Result<String> {
        if key.is_empty() {
            return Err(CacheError::InvalidKey);
        }

        let Some(&id) = self.index.get(key) else {
            self.stats.record_miss();
            return Err(CacheError::NotFound(key.to_string()));
        };

        let entry = self.list.get(id).expect("indexed node must be live");
        if entry.is_expired() {
            self.list.remove(id);
            self.index.remove(key);
            self.stats.record_miss();
            return Err(CacheError::Expired(key.to_string()));
        }

        self.list.move_to_front(id);
        self.stats.record_hit();
        let entry = self.list.get(id).expect("just moved to front");
        Ok(entry.value.clone())
    }

    // == Delete ==
    /// Removes an entry by key. Counters are unchanged.
    pub fn delete(&mut self, key: &str) -> Result<()> {
        if key.is_empty() {
            return Err(CacheError::InvalidKey);
        }
        match self.index.remove(key) {
            Some(id) => {
                self.list.remove(id);
                Ok(())
            }
            None => Err(CacheError::NotFound(key.to_string())),
        }
    }

    // == Exists ==
    /// Returns true iff the key is present and not expired.
    ///
    /// Does not reorder and does not count a hit or miss. An expired entry
    /// discovered here is purged.
    pub fn exists(&mut self, key: &str) -> bool {
        let Some(&id) = self.index.get(key) else {
            return false;
        };
        let entry = self.list.get(id).expect("indexed node must be live");
        if entry.is_expired() {
            self.list.remove(id);
            self.index.remove(key);
            return false;
        }
        true
    }

    // == Keys ==
    /// Returns all live (non-expired) keys in MRU→LRU order.
    ///
    /// Does not reorder; expired entries are skipped and left for the
    /// sweeper.
    pub fn keys(&self) -> Vec<String> {
        self.list
            .iter()
            .filter(|entry| !entry.is_expired())
            .map(|entry| entry.key.clone())
            .collect()
    }

    // == Set Expiry ==
    /// Updates the expiration of an existing key.
    ///
    /// A non-positive `ttl_secs` clears the expiration, making the entry
    /// permanent. Does not reorder.
    pub fn set_expiry(&mut self, key: &str, ttl_secs: i64) -> Result<()> {
        let Some(&id) = self.index.get(key) else {
            return Err(CacheError::NotFound(key.to_string()));
        };
        let entry = self.list.get_mut(id).expect("indexed node must be live");
        entry.expire_at = if ttl_secs <= 0 {
            None
        } else {
            Some(Utc::now() + Duration::seconds(ttl_secs))
        };
        Ok(())
    }

    // == TTL ==
    /// Remaining time to live of a key in whole seconds.
    ///
    /// - `Ok(None)` - the entry never expires
    /// - `Ok(Some(n))` - seconds remaining, 0 when already expired
    /// - `Err(NotFound)` - no such key
    pub fn ttl(&self, key: &str) -> Result<Option<i64>> {
        match self.index.get(key) {
            Some(&id) => {
                let entry = self.list.get(id).expect("indexed node must be live");
                Ok(entry.remaining_secs())
            }
            None => Err(CacheError::NotFound(key.to_string())),
        }
    }

    // == Clear ==
    /// Removes every entry. Counters and capacity are untouched.
    pub fn clear(&mut self) {
        self.index.clear();
        self.list.clear();
    }

    // == Stats ==
    /// Returns a copy of the performance counters.
    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    /// Returns the current number of entries (expired-but-unswept included).
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Returns true if the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Returns the fixed capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    // == Sweep Expired ==
    /// Removes every entry whose expiration is in the past.
    ///
    /// Walks the whole list head to tail, saving each node's successor
    /// before removal. Returns the number of entries removed; the eviction
    /// counter is not touched.
    pub fn sweep_expired(&mut self) -> usize {
        let mut removed = 0;
        let mut current = self.list.head_id();
        while let Some(id) = current {
            let next = self.list.next_id(id);
            let expired = self
                .list
                .get(id)
                .map(|entry| entry.is_expired())
                .unwrap_or(false);
            if expired {
                if let Some(entry) = self.list.remove(id) {
                    self.index.remove(&entry.key);
                    removed += 1;
                }
            }
            current = next;
        }
        removed
    }

    /// Test hook: push an entry's expiration into the past.
    #[cfg(test)]
    pub(crate) fn force_expire(&mut self, key: &str) -> bool {
        match self.index.get(key) {
            Some(&id) => {
                let entry = self.list.get_mut(id).expect("indexed node must be live");
                entry.expire_at = Some(Utc::now() - Duration::seconds(1));
                true
            }
            None => false,
        }
    }

    /// Iterates entries MRU→LRU; used by the snapshot codec.
    pub(crate) fn entries(&self) -> impl Iterator<Item = &CacheEntry> {
        self.list.iter()
    }

    /// Replaces the full entry set with `entries`, given in MRU→LRU order.
    ///
    /// Expired entries are skipped and loading stops at capacity. Counters
    /// are untouched; used by the snapshot codec.
    pub(crate) fn replace_entries(&mut self, entries: impl IntoIterator<Item = CacheEntry>) {
        self.clear();
        for entry in entries {
            if self.index.len() >= self.capacity {
                break;
            }
            if entry.is_expired() {
                continue;
            }
            let key = entry.key.clone();
            let id = self.list.push_back(entry);
            self.index.insert(key, id);
        }
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_new() {
        let store = CacheStore::new(100);
        assert_eq!(store.len(), 0);
        assert!(store.is_empty());
        assert_eq!(store.capacity(), 100);
    }

    #[test]
    fn test_set_and_get() {
        let mut store = CacheStore::new(100);
        store.set("key1", "value1").unwrap();

        assert_eq!(store.get("key1").unwrap(), "value1");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_empty_key_rejected() {
        let mut store = CacheStore::new(100);
        assert!(matches!(store.set("", "v"), Err(CacheError::InvalidKey)));
        assert!(matches!(
            store.set_with_ttl("", "v", 10),
            Err(CacheError::InvalidKey)
        ));
        assert!(matches!(store.get(""), Err(CacheError::InvalidKey)));
        assert!(matches!(store.delete(""), Err(CacheError::InvalidKey)));
    }

    #[test]
    fn test_zero_ttl_rejected() {
        let mut store = CacheStore::new(100);
        assert!(matches!(
            store.set_with_ttl("k", "v", 0),
            Err(CacheError::InvalidTtl)
        ));
        assert!(matches!(
            store.set_with_ttl("k", "v", -5),
            Err(CacheError::InvalidTtl)
        ));
    }

    #[test]
    fn test_get_nonexistent_counts_miss() {
        let mut store = CacheStore::new(100);
        assert!(matches!(
            store.get("nonexistent"),
            Err(CacheError::NotFound(_))
        ));
        assert_eq!(store.stats().misses, 1);
    }

    #[test]
    fn test_overwrite_keeps_expiry() {
        let mut store = CacheStore::new(100);
        store.set_with_ttl("key1", "value1", 100).unwrap();
        store.set("key1", "value2").unwrap();

        assert_eq!(store.get("key1").unwrap(), "value2");
        assert_eq!(store.len(), 1);
        // A plain SET never resets the TTL
        let remaining = store.ttl("key1").unwrap().unwrap();
        assert!(remaining > 0 && remaining <= 100);
    }

    #[test]
    fn test_setex_overwrite_replaces_expiry() {
        let mut store = CacheStore::new(100);
        store.set("key1", "value1").unwrap();
        assert_eq!(store.ttl("key1").unwrap(), None);

        store.set_with_ttl("key1", "value2", 30).unwrap();
        let remaining = store.ttl("key1").unwrap().unwrap();
        assert!(remaining > 0 && remaining <= 30);
    }

    #[test]
    fn test_delete() {
        let mut store = CacheStore::new(100);
        store.set("key1", "value1").unwrap();
        store.delete("key1").unwrap();

        assert!(store.is_empty());
        assert!(matches!(store.get("key1"), Err(CacheError::NotFound(_))));
    }

    #[test]
    fn test_delete_twice_yields_not_found() {
        let mut store = CacheStore::new(100);
        store.set("key1", "value1").unwrap();
        store.delete("key1").unwrap();
        assert!(matches!(store.delete("key1"), Err(CacheError::NotFound(_))));
    }

    #[test]
    fn test_lru_eviction() {
        let mut store = CacheStore::new(2);
        store.set("a", "1").unwrap();
        store.set("b", "2").unwrap();
        store.set("c", "3").unwrap();

        assert!(matches!(store.get("a"), Err(CacheError::NotFound(_))));
        assert_eq!(store.get("b").unwrap(), "2");
        assert_eq!(store.get("c").unwrap(), "3");
        assert_eq!(store.stats().evictions, 1);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_get_protects_from_eviction() {
        let mut store = CacheStore::new(2);
        store.set("a", "1").unwrap();
        store.set("b", "2").unwrap();
        store.get("a").unwrap();
        store.set("c", "3").unwrap();

        assert_eq!(store.get("a").unwrap(), "1");
        assert!(matches!(store.get("b"), Err(CacheError::NotFound(_))));
        assert_eq!(store.get("c").unwrap(), "3");
    }

    #[test]
    fn test_capacity_one() {
        let mut store = CacheStore::new(1);
        store.set("a", "1").unwrap();
        store.set("b", "2").unwrap();
        store.set("c", "3").unwrap();

        assert_eq!(store.len(), 1);
        assert_eq!(store.get("c").unwrap(), "3");
        assert_eq!(store.stats().evictions, 2);
    }

    #[test]
    fn test_expired_tail_still_counts_as_eviction() {
        let mut store = CacheStore::new(2);
        store.set("a", "1").unwrap();
        store.set("b", "2").unwrap();
        assert!(store.force_expire("a"));

        store.set("c", "3").unwrap();
        assert_eq!(store.stats().evictions, 1);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_get_expired_purges_and_counts_miss() {
        let mut store = CacheStore::new(100);
        store.set_with_ttl("key1", "value1", 100).unwrap();
        store.force_expire("key1");

        assert!(matches!(store.get("key1"), Err(CacheError::Expired(_))));
        assert_eq!(store.stats().misses, 1);
        assert!(store.is_empty());
    }

    #[test]
    fn test_exists() {
        let mut store = CacheStore::new(100);
        store.set("key1", "value1").unwrap();

        assert!(store.exists("key1"));
        assert!(!store.exists("other"));
        // EXISTS never counts hits or misses
        assert_eq!(store.stats().hits, 0);
        assert_eq!(store.stats().misses, 0);
    }

    #[test]
    fn test_exists_purges_expired() {
        let mut store = CacheStore::new(100);
        store.set_with_ttl("key1", "value1", 100).unwrap();
        store.force_expire("key1");

        assert!(!store.exists("key1"));
        assert!(store.is_empty());
        assert_eq!(store.stats().misses, 0);
    }

    #[test]
    fn test_exists_does_not_reorder() {
        let mut store = CacheStore::new(2);
        store.set("a", "1").unwrap();
        store.set("b", "2").unwrap();

        assert!(store.exists("a"));
        // 'a' stayed the LRU candidate despite the EXISTS probe
        store.set("c", "3").unwrap();
        assert!(matches!(store.get("a"), Err(CacheError::NotFound(_))));
    }

    #[test]
    fn test_keys_mru_to_lru_order() {
        let mut store = CacheStore::new(100);
        store.set("a", "1").unwrap();
        store.set("b", "2").unwrap();
        store.set("c", "3").unwrap();
        store.get("a").unwrap();

        assert_eq!(store.keys(), vec!["a", "c", "b"]);
    }

    #[test]
    fn test_keys_skips_expired() {
        let mut store = CacheStore::new(100);
        store.set("a", "1").unwrap();
        store.set_with_ttl("b", "2", 100).unwrap();
        store.force_expire("b");

        assert_eq!(store.keys(), vec!["a"]);
        // keys() only skips; the entry stays linked for the sweeper
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_ttl_reporting() {
        let mut store = CacheStore::new(100);
        store.set("forever", "v").unwrap();
        store.set_with_ttl("bounded", "v", 50).unwrap();

        assert_eq!(store.ttl("forever").unwrap(), None);
        let remaining = store.ttl("bounded").unwrap().unwrap();
        assert!(remaining > 0 && remaining <= 50);
        assert!(matches!(store.ttl("missing"), Err(CacheError::NotFound(_))));
    }

    #[test]
    fn test_ttl_of_expired_entry_is_zero() {
        let mut store = CacheStore::new(100);
        store.set_with_ttl("key1", "v", 100).unwrap();
        store.force_expire("key1");

        assert_eq!(store.ttl("key1").unwrap(), Some(0));
    }

    #[test]
    fn test_set_expiry() {
        let mut store = CacheStore::new(100);
        store.set("key1", "v").unwrap();

        store.set_expiry("key1", 40).unwrap();
        let remaining = store.ttl("key1").unwrap().unwrap();
        assert!(remaining > 0 && remaining <= 40);

        // Non-positive TTL makes the entry permanent again
        store.set_expiry("key1", 0).unwrap();
        assert_eq!(store.ttl("key1").unwrap(), None);

        assert!(matches!(
            store.set_expiry("missing", 10),
            Err(CacheError::NotFound(_))
        ));
    }

    #[test]
    fn test_set_expiry_does_not_reorder() {
        let mut store = CacheStore::new(2);
        store.set("a", "1").unwrap();
        store.set("b", "2").unwrap();

        store.set_expiry("a", 100).unwrap();
        store.set("c", "3").unwrap();
        assert!(matches!(store.get("a"), Err(CacheError::NotFound(_))));
    }

    #[test]
    fn test_clear_keeps_counters() {
        let mut store = CacheStore::new(2);
        store.set("a", "1").unwrap();
        store.set("b", "2").unwrap();
        store.set("c", "3").unwrap(); // one eviction
        let _ = store.get("missing"); // one miss

        store.clear();
        assert!(store.is_empty());
        assert_eq!(store.stats().evictions, 1);
        assert_eq!(store.stats().misses, 1);

        // Clearing twice is the same as clearing once
        store.clear();
        assert!(store.is_empty());
    }

    #[test]
    fn test_sweep_expired() {
        let mut store = CacheStore::new(100);
        store.set("keep", "v").unwrap();
        store.set_with_ttl("drop1", "v", 100).unwrap();
        store.set_with_ttl("drop2", "v", 100).unwrap();
        store.force_expire("drop1");
        store.force_expire("drop2");

        let removed = store.sweep_expired();
        assert_eq!(removed, 2);
        assert_eq!(store.len(), 1);
        assert!(store.exists("keep"));
        // Sweeping counts as expiration, never eviction
        assert_eq!(store.stats().evictions, 0);
    }

    #[test]
    fn test_sweep_empty_store() {
        let mut store = CacheStore::new(100);
        assert_eq!(store.sweep_expired(), 0);
    }

    #[test]
    fn test_replace_entries() {
        let mut store = CacheStore::new(2);
        store.set("old", "v").unwrap();

        store.replace_entries(vec![
            CacheEntry::new("a", "1"),
            CacheEntry::new("b", "2"),
            CacheEntry::new("c", "3"), // past capacity, dropped
        ]);

        assert_eq!(store.len(), 2);
        assert!(matches!(store.get("old"), Err(CacheError::NotFound(_))));
        // Input order was MRU→LRU, so 'a' is the head
        assert_eq!(store.keys(), vec!["a", "b"]);
    }

    #[test]
    fn test_replace_entries_skips_expired() {
        let mut store = CacheStore::new(10);
        let mut stale = CacheEntry::with_ttl("stale", "v", 100);
        stale.expire_at = Some(Utc::now() - Duration::seconds(1));

        store.replace_entries(vec![stale, CacheEntry::new("fresh", "v")]);
        assert_eq!(store.keys(), vec!["fresh"]);
    }
}
