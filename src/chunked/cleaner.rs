//! Cleaner Module
//!
//! Best-effort removal of every physical key a logical key may occupy.

use tracing::{debug, warn};

use crate::chunked::key::{chunk_keys, marker_key};
use crate::store::KvStore;

/// Every physical key `key` can occupy: marker, inline entry and chunk
/// slots `0..max_chunks`.
pub(crate) fn physical_keys(key: &str, max_chunks: usize) -> Vec<String> {
    let mut keys = Vec::with_capacity(max_chunks + 2);
    keys.push(marker_key(key));
    keys.push(key.to_string());
    keys.extend(chunk_keys(key, max_chunks));
    keys
}

// == Purge ==
/// Deletes the marker, inline entry and all chunk slots of `key`.
///
/// Idempotent. Store failures are logged and swallowed.
pub(crate) fn purge<S: KvStore + ?Sized>(store: &S, key: &str, max_chunks: usize) {
    match store.remove_all(&physical_keys(key, max_chunks)) {
        Ok(()) => debug!("Purged cache entry {key}"),
        Err(err) => warn!("Failed to purge cache entry {key}: {err}"),
    }
}
