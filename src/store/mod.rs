//! Store Module
//!
//! The key-value store contract the chunked cache layer is written against,
//! plus an in-process implementation with TTL expiration and LRU eviction.

mod entry;
mod lru;
mod memory;
mod stats;

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::StoreResult;

// Re-export public types
pub use memory::MemoryStore;
pub use stats::StoreStats;

// == Public Constants ==
/// Default per-entry value ceiling in bytes
pub const DEFAULT_MAX_ENTRY_SIZE: usize = 100 * 1024;

/// Default maximum key length in bytes
pub const DEFAULT_MAX_KEY_LENGTH: usize = 250;

// == KvStore Trait ==
/// Synchronous key-value store with per-key TTL.
///
/// No atomicity is promised across the keys of a `put_all` or `get_all`
/// call. Removing an absent key is not an error.
pub trait KvStore: Send + Sync {
    /// Stores a single value.
    fn put(&self, key: &str, value: &str, ttl_secs: u64) -> StoreResult<()>;

    /// Stores every entry of `entries` with the same TTL.
    fn put_all(&self, entries: &HashMap<String, String>, ttl_secs: u64) -> StoreResult<()>;

    /// Reads a single value, `None` when absent or expired.
    fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Reads several values. Only keys that are present appear in the result.
    fn get_all(&self, keys: &[String]) -> StoreResult<HashMap<String, String>>;

    /// Removes a single key.
    fn remove(&self, key: &str) -> StoreResult<()>;

    /// Removes several keys.
    fn remove_all(&self, keys: &[String]) -> StoreResult<()> {
        for key in keys {
            self.remove(key)?;
        }
        Ok(())
    }
}

impl<T: KvStore + ?Sized> KvStore for Arc<T> {
    fn put(&self, key: &str, value: &str, ttl_secs: u64) -> StoreResult<()> {
        (**self).put(key, value, ttl_secs)
    }

    fn put_all(&self, entries: &HashMap<String, String>, ttl_secs: u64) -> StoreResult<()> {
        (**self).put_all(entries, ttl_secs)
    }

    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        (**self).get(key)
    }

    fn get_all(&self, keys: &[String]) -> StoreResult<HashMap<String, String>> {
        (**self).get_all(keys)
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        (**self).remove(key)
    }

    fn remove_all(&self, keys: &[String]) -> StoreResult<()> {
        (**self).remove_all(keys)
    }
}
