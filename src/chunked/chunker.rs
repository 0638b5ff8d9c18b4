//! Chunker Module
//!
//! Splits serialized text into bounded chunks and writes them, together with
//! the count marker, in one multi-key call.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::chunked::cleaner::purge;
use crate::chunked::key::{chunk_key, marker_key};
use crate::chunked::CacheLimits;
use crate::error::{CacheError, Result};
use crate::store::KvStore;

// == Split ==
/// Cuts `text` into consecutive pieces of at most `chunk_size` characters.
///
/// Boundaries fall on char boundaries; concatenating the pieces in order
/// gives back `text`.
pub(crate) fn split_chunks(text: &str, chunk_size: usize) -> Vec<&str> {
    let chunk_size = chunk_size.max(1);
    let mut chunks = Vec::new();
    let mut rest = text;

    while !rest.is_empty() {
        let end = rest
            .char_indices()
            .nth(chunk_size)
            .map_or(rest.len(), |(index, _)| index);
        let (chunk, tail) = rest.split_at(end);
        chunks.push(chunk);
        rest = tail;
    }
    chunks
}

// == Write ==
/// Stores `text` (of `length` characters) as a chunked entry under `key`.
///
/// Any previous entry of either shape is purged first. On a store failure
/// the key is purged again so no half-written set is left behind.
///
/// Returns the number of chunks written.
pub(crate) fn write<S: KvStore + ?Sized>(
    store: &S,
    key: &str,
    text: &str,
    length: usize,
    ttl_secs: u64,
    limits: &CacheLimits,
) -> Result<usize> {
    let needed = length.div_ceil(limits.chunk_size);
    if needed > limits.max_chunks {
        purge(store, key, limits.max_chunks);
        return Err(CacheError::TooManyChunks {
            needed,
            max: limits.max_chunks,
        });
    }

    purge(store, key, limits.max_chunks);

    let chunks = split_chunks(text, limits.chunk_size);
    let mut batch = HashMap::with_capacity(chunks.len() + 1);
    batch.insert(marker_key(key), chunks.len().to_string());
    for (index, chunk) in chunks.iter().enumerate() {
        batch.insert(chunk_key(key, index), (*chunk).to_string());
    }

    if let Err(err) = store.put_all(&batch, ttl_secs) {
        warn!("Chunked write of {key} failed, purging: {err}");
        purge(store, key, limits.max_chunks);
        return Err(err.into());
    }

    debug!("Stored {key} as {} chunks ({length} characters)", chunks.len());
    Ok(chunks.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use crate::store::MemoryStore;

    fn small_limits() -> CacheLimits {
        CacheLimits {
            chunk_size: 4,
            max_chunks: 3,
            max_value_length: 100,
            ..CacheLimits::default()
        }
    }

    #[test]
    fn test_split_exact_and_remainder() {
        assert_eq!(split_chunks("abcdefghij", 4), vec!["abcd", "efgh", "ij"]);
        assert_eq!(split_chunks("abcdefgh", 4), vec!["abcd", "efgh"]);
        assert!(split_chunks("", 4).is_empty());
    }

    #[test]
    fn test_split_respects_char_boundaries() {
        assert_eq!(split_chunks("志願選填", 3), vec!["志願選", "填"]);
    }

    #[test]
    fn test_write_stores_marker_and_chunks() {
        let store = MemoryStore::new(100);

        let count = write(&store, "k", "abcdefghij", 10, 60, &small_limits()).unwrap();

        assert_eq!(count, 3);
        assert_eq!(store.get("k_chunks").unwrap().as_deref(), Some("3"));
        assert_eq!(store.get("k_0").unwrap().as_deref(), Some("abcd"));
        assert_eq!(store.get("k_1").unwrap().as_deref(), Some("efgh"));
        assert_eq!(store.get("k_2").unwrap().as_deref(), Some("ij"));
    }

    #[test]
    fn test_write_clears_stale_chunks_of_larger_value() {
        let store = MemoryStore::new(100);
        write(&store, "k", "abcdefghij", 10, 60, &small_limits()).unwrap();

        write(&store, "k", "abcde", 5, 60, &small_limits()).unwrap();

        assert_eq!(store.keys(), vec!["k_0", "k_1", "k_chunks"]);
        assert_eq!(store.get("k_chunks").unwrap().as_deref(), Some("2"));
    }

    #[test]
    fn test_too_many_chunks_writes_nothing_and_purges() {
        let store = MemoryStore::new(100);
        store.put("k", "old inline", 60).unwrap();

        let err = write(&store, "k", "abcdefghijklm", 13, 60, &small_limits()).unwrap_err();

        assert!(matches!(
            err,
            CacheError::TooManyChunks { needed: 4, max: 3 }
        ));
        assert!(store.is_empty());
    }

    #[test]
    fn test_store_failure_leaves_nothing_behind() {
        // chunks of 4 characters break a 3-byte entry ceiling
        let store = MemoryStore::with_limits(100, 3, 250);

        let err = write(&store, "k", "abcdefghij", 10, 60, &small_limits()).unwrap_err();

        assert!(matches!(err, CacheError::Store(StoreError::Rejected(_))));
        assert!(store.is_empty());
    }

    #[test]
    fn test_chunks_share_ttl() {
        let store = MemoryStore::new(100);
        write(&store, "k", "abcdefghij", 10, 600, &small_limits()).unwrap();

        for physical in ["k_chunks", "k_0", "k_1", "k_2"] {
            let remaining = store.ttl_remaining(physical).unwrap();
            assert!((599..=600).contains(&remaining));
        }
    }
}
