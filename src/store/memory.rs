//! Memory Store Module
//!
//! In-process key-value store with per-key TTL, per-entry size ceiling and
//! LRU eviction. Every physical key expires and is evicted on its own, so a
//! multi-key write can later be observed partially, like on a hosted cache.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::store::entry::StoredEntry;
use crate::store::lru::LruTracker;
use crate::store::{KvStore, StoreStats, DEFAULT_MAX_ENTRY_SIZE, DEFAULT_MAX_KEY_LENGTH};

// == Memory Store ==
/// Thread-safe in-memory [`KvStore`].
#[derive(Debug)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

#[derive(Debug)]
struct Inner {
    entries: HashMap<String, StoredEntry>,
    lru: LruTracker,
    stats: StoreStats,
    max_entries: usize,
    max_entry_size: usize,
    max_key_length: usize,
}

impl MemoryStore {
    // == Constructors ==
    /// Creates a store holding at most `max_entries` physical keys, with the
    /// default entry size and key length ceilings.
    pub fn new(max_entries: usize) -> Self {
        Self::with_limits(max_entries, DEFAULT_MAX_ENTRY_SIZE, DEFAULT_MAX_KEY_LENGTH)
    }

    /// Creates a store with explicit ceilings.
    ///
    /// # Arguments
    /// * `max_entries` - Capacity in physical keys (at least 1)
    /// * `max_entry_size` - Largest accepted value, in bytes
    /// * `max_key_length` - Longest accepted key, in bytes
    pub fn with_limits(max_entries: usize, max_entry_size: usize, max_key_length: usize) -> Self {
        Self {
            inner: Mutex::new(Inner {
                entries: HashMap::new(),
                lru: LruTracker::new(),
                stats: StoreStats::new(),
                max_entries: max_entries.max(1),
                max_entry_size,
                max_key_length,
            }),
        }
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, Inner>> {
        self.inner
            .lock()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".to_string()))
    }

    // == Stats ==
    /// Returns current store statistics.
    pub fn stats(&self) -> StoreResult<StoreStats> {
        let inner = self.lock()?;
        let mut stats = inner.stats.clone();
        stats.total_entries = inner.entries.len();
        Ok(stats)
    }

    // == Cleanup Expired ==
    /// Removes every expired entry and returns how many were dropped.
    pub fn cleanup_expired(&self) -> StoreResult<usize> {
        let mut inner = self.lock()?;
        let expired: Vec<String> = inner
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired())
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired {
            inner.drop_key(key);
        }
        inner.stats.record_expirations(expired.len());
        Ok(expired.len())
    }

    // == Inspection ==
    /// Number of physical entries, expired ones included until swept.
    pub fn len(&self) -> usize {
        self.lock().map(|inner| inner.entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sorted list of live keys. Does not touch LRU order or stats.
    pub fn keys(&self) -> Vec<String> {
        let Ok(inner) = self.lock() else {
            return Vec::new();
        };
        let mut keys: Vec<String> = inner
            .entries
            .iter()
            .filter(|(_, entry)| !entry.is_expired())
            .map(|(key, _)| key.clone())
            .collect();
        keys.sort();
        keys
    }

    /// Whether `key` holds a live entry. Does not touch LRU order or stats.
    pub fn contains_key(&self, key: &str) -> bool {
        self.lock()
            .map(|inner| inner.entries.get(key).is_some_and(|e| !e.is_expired()))
            .unwrap_or(false)
    }

    /// Remaining TTL of a live entry in seconds.
    pub fn ttl_remaining(&self, key: &str) -> Option<u64> {
        let inner = self.lock().ok()?;
        inner
            .entries
            .get(key)
            .filter(|entry| !entry.is_expired())
            .map(StoredEntry::ttl_remaining)
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new(10_000)
    }
}

impl Inner {
    fn check_limits(&self, key: &str, value: &str) -> StoreResult<()> {
        if key.is_empty() || key.len() > self.max_key_length {
            return Err(StoreError::Rejected(format!(
                "key length {} outside 1..={}",
                key.len(),
                self.max_key_length
            )));
        }
        if value.len() > self.max_entry_size {
            return Err(StoreError::Rejected(format!(
                "value of {} bytes for {key} exceeds {} bytes",
                value.len(),
                self.max_entry_size
            )));
        }
        Ok(())
    }

    fn insert(&mut self, key: &str, value: &str, ttl_secs: u64) {
        if !self.entries.contains_key(key) && self.entries.len() >= self.max_entries {
            if let Some(evicted) = self.lru.evict_oldest() {
                debug!("Evicting {evicted} to make room for {key}");
                self.entries.remove(&evicted);
                self.stats.record_eviction();
            }
        }

        self.entries
            .insert(key.to_string(), StoredEntry::new(value.to_string(), ttl_secs));
        self.lru.touch(key);
    }

    fn read(&mut self, key: &str) -> Option<String> {
        let expired = match self.entries.get(key) {
            None => {
                self.stats.record_miss();
                return None;
            }
            Some(entry) => entry.is_expired(),
        };

        if expired {
            self.drop_key(key);
            self.stats.record_expirations(1);
            self.stats.record_miss();
            return None;
        }

        self.stats.record_hit();
        self.lru.touch(key);
        self.entries.get(key).map(|entry| entry.value.clone())
    }

    fn drop_key(&mut self, key: &str) {
        self.entries.remove(key);
        self.lru.remove(key);
    }
}

// == KvStore Implementation ==
impl KvStore for MemoryStore {
    fn put(&self, key: &str, value: &str, ttl_secs: u64) -> StoreResult<()> {
        let mut inner = self.lock()?;
        inner.check_limits(key, value)?;
        inner.insert(key, value, ttl_secs);
        Ok(())
    }

    /// Nothing is written when any entry breaks a limit.
    fn put_all(&self, entries: &HashMap<String, String>, ttl_secs: u64) -> StoreResult<()> {
        let mut inner = self.lock()?;
        for (key, value) in entries {
            inner.check_limits(key, value)?;
        }
        for (key, value) in entries {
            inner.insert(key, value, ttl_secs);
        }
        Ok(())
    }

    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.lock()?.read(key))
    }

    fn get_all(&self, keys: &[String]) -> StoreResult<HashMap<String, String>> {
        let mut inner = self.lock()?;
        Ok(keys
            .iter()
            .filter_map(|key| inner.read(key).map(|value| (key.clone(), value)))
            .collect())
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        self.lock()?.drop_key(key);
        Ok(())
    }

    fn remove_all(&self, keys: &[String]) -> StoreResult<()> {
        let mut inner = self.lock()?;
        for key in keys {
            inner.drop_key(key);
        }
        Ok(())
    }
}
