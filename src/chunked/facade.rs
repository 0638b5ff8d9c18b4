//! Chunked Cache Facade
//!
//! Public entry point of the cache layer. Decides between inline and chunked
//! storage, clamps TTLs and turns every failure into a logged no-op or miss.

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::chunked::key::is_valid_key;
use crate::chunked::size::serialize_storable;
use crate::chunked::{assembler, chunker, cleaner, CacheLimits};
use crate::error::{CacheError, Result};
use crate::store::KvStore;

/// Logical keys the application caches, purged by `clear_all`.
pub const KNOWN_KEYS: [&str; 4] = [
    "limitOfSchools",
    "departmentOptions",
    "examData",
    "choicesData",
];

/// Shape a successful write took in the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StoredShape {
    Inline,
    Chunked(usize),
}

// == Chunked Cache ==
/// Best-effort JSON cache over a size-limited [`KvStore`].
///
/// None of the operations fail or panic: invalid input, oversized values,
/// torn chunk sets and store errors all end as "nothing stored" or
/// "not found", with a log line.
///
/// # Example
/// ```
/// use chunk_cache::{ChunkedCache, MemoryStore};
/// use serde_json::json;
///
/// let cache = ChunkedCache::new(MemoryStore::default());
/// cache.set("examData", &json!({"blob": "x".repeat(200_000)}), None);
/// let value: Option<serde_json::Value> = cache.get("examData");
/// assert!(value.is_some());
/// ```
#[derive(Debug, Clone)]
pub struct ChunkedCache<S> {
    store: S,
    limits: CacheLimits,
}

impl<S: KvStore> ChunkedCache<S> {
    // == Constructors ==
    /// Creates a cache over `store` with the default limits.
    pub fn new(store: S) -> Self {
        Self::with_limits(store, CacheLimits::default())
    }

    /// Creates a cache over `store` with custom limits.
    pub fn with_limits(store: S, limits: CacheLimits) -> Self {
        Self {
            store,
            limits: limits.normalized(),
        }
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn limits(&self) -> &CacheLimits {
        &self.limits
    }

    // == Set ==
    /// Caches `value` under `key` for `ttl` seconds (default when `None`,
    /// clamped to the configured bounds).
    pub fn set<T>(&self, key: &str, value: &T, ttl: Option<u64>)
    where
        T: Serialize + ?Sized,
    {
        match self.try_set(key, value, ttl) {
            Ok(StoredShape::Inline) => debug!("Cached {key} inline"),
            Ok(StoredShape::Chunked(count)) => debug!("Cached {key} in {count} chunks"),
            Err(err @ (CacheError::InvalidKey(_) | CacheError::EmptyValue)) => {
                debug!("Skipped caching: {err}")
            }
            Err(err) => warn!("Failed to cache {key}: {err}"),
        }
    }

    pub(crate) fn try_set<T>(&self, key: &str, value: &T, ttl: Option<u64>) -> Result<StoredShape>
    where
        T: Serialize + ?Sized,
    {
        if !is_valid_key(key) {
            return Err(CacheError::InvalidKey(key.to_string()));
        }

        let (text, length) = match serialize_storable(value, self.limits.max_value_length) {
            Ok(serialized) => serialized,
            Err(err @ CacheError::OversizedValue { .. }) => {
                // the previous value must not outlive a newer one that was refused
                self.purge(key);
                return Err(err);
            }
            Err(err) => return Err(err),
        };
        if text == "null" {
            return Err(CacheError::EmptyValue);
        }
        let ttl = self.limits.clamp_ttl(ttl);

        if length > self.limits.chunk_size {
            return chunker::write(&self.store, key, &text, length, ttl, &self.limits)
                .map(StoredShape::Chunked);
        }

        self.purge(key);
        if let Err(err) = self.store.put(key, &text, ttl) {
            self.purge(key);
            return Err(err.into());
        }
        Ok(StoredShape::Inline)
    }

    // == Get ==
    /// Returns the value cached under `key`, or `None` on a miss.
    ///
    /// Inconsistent or unparseable entries are purged and read as a miss.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        match self.try_get(key) {
            Ok(Some(value)) => {
                debug!("Cache hit for {key}");
                Some(value)
            }
            Ok(None) => {
                debug!("Cache miss for {key}");
                None
            }
            Err(err @ CacheError::InvalidKey(_)) => {
                debug!("Cache miss: {err}");
                None
            }
            Err(err) => {
                warn!("Cache read of {key} failed: {err}");
                None
            }
        }
    }

    fn try_get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        if !is_valid_key(key) {
            return Err(CacheError::InvalidKey(key.to_string()));
        }

        if let Some(value) = assembler::read(&self.store, key, &self.limits)? {
            return Ok(Some(value));
        }

        let Some(text) = self.store.get(key)? else {
            return Ok(None);
        };
        match serde_json::from_str(&text) {
            Ok(value) => Ok(Some(value)),
            Err(err) => {
                self.purge(key);
                Err(CacheError::ParseFailure(err))
            }
        }
    }

    // == Remove ==
    /// Drops whatever is cached under `key`. Idempotent.
    pub fn remove(&self, key: &str) {
        if !is_valid_key(key) {
            debug!("Ignoring remove of invalid key {key:?}");
            return;
        }
        self.purge(key);
    }

    // == Clear All ==
    /// Purges every key of the `known_keys` registry, skipping invalid ones.
    pub fn clear_all<K: AsRef<str>>(&self, known_keys: &[K]) {
        let mut cleared = 0;
        for key in known_keys {
            let key: &str = key.as_ref();
            if is_valid_key(key) {
                self.purge(key);
                cleared += 1;
            } else {
                warn!("Skipping invalid registry key {key:?}");
            }
        }
        info!("Cleared {cleared} cache entries");
    }

    fn purge(&self, key: &str) {
        cleaner::purge(&self.store, key, self.limits.max_chunks);
    }
}
