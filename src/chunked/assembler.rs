//! Assembler Module
//!
//! Reads a chunked entry back, verifying the chunk set is complete before
//! concatenating and deserializing it. Any inconsistency purges the key.

use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::chunked::cleaner::purge;
use crate::chunked::key::{chunk_keys, marker_key};
use crate::chunked::CacheLimits;
use crate::error::{CacheError, Result};
use crate::store::KvStore;

/// Parses a count marker; only `1..=max_chunks` is a usable count.
fn parse_marker(raw: &str, max_chunks: usize) -> Option<usize> {
    raw.trim()
        .parse::<usize>()
        .ok()
        .filter(|count| (1..=max_chunks).contains(count))
}

// == Read ==
/// Reads the chunked entry stored under `key`.
///
/// Returns `Ok(None)` when `key` has no count marker, meaning the caller
/// should look for an inline entry instead. Corrupt markers, torn chunk sets
/// and unparseable text purge `key` and come back as errors. Store failures
/// are returned without purging.
pub(crate) fn read<S, T>(store: &S, key: &str, limits: &CacheLimits) -> Result<Option<T>>
where
    S: KvStore + ?Sized,
    T: DeserializeOwned,
{
    let Some(raw) = store.get(&marker_key(key))? else {
        return Ok(None);
    };

    let Some(count) = parse_marker(&raw, limits.max_chunks) else {
        warn!("Corrupt chunk marker {raw:?} for {key}, purging");
        purge(store, key, limits.max_chunks);
        return Err(CacheError::CorruptMarker {
            key: key.to_string(),
            raw,
        });
    };

    let keys = chunk_keys(key, count);
    let found = store.get_all(&keys)?;

    let present = keys.iter().filter(|k| found.contains_key(*k)).count();
    if present != count || found.len() != count {
        warn!("Incomplete chunk set for {key}: expected {count}, found {present}, purging");
        purge(store, key, limits.max_chunks);
        return Err(CacheError::IncompleteChunkSet {
            key: key.to_string(),
            expected: count,
            found: present,
        });
    }

    let text: String = keys
        .iter()
        .filter_map(|k| found.get(k))
        .map(String::as_str)
        .collect();

    match serde_json::from_str(&text) {
        Ok(value) => {
            debug!("Reassembled {key} from {count} chunks");
            Ok(Some(value))
        }
        Err(err) => {
            warn!("Reassembled value for {key} does not parse, purging: {err}");
            purge(store, key, limits.max_chunks);
            Err(CacheError::ParseFailure(err))
        }
    }
}
