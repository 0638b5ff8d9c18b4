//! Key Validation Module
//!
//! Syntax check for logical cache keys and naming of the physical keys
//! derived from them.

use std::sync::OnceLock;

use regex::Regex;

/// Suffix of the count marker key.
const MARKER_SUFFIX: &str = "_chunks";

fn key_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z0-9_-]{1,100}$").expect("valid key regex"))
}

// == Is Valid Key ==
/// True iff `key` is 1 to 100 characters of `[A-Za-z0-9_-]`.
pub fn is_valid_key(key: &str) -> bool {
    key_pattern().is_match(key)
}

/// Physical key holding the chunk count of `key`.
pub fn marker_key(key: &str) -> String {
    format!("{key}{MARKER_SUFFIX}")
}

/// Physical key holding chunk `index` of `key`.
pub fn chunk_key(key: &str, index: usize) -> String {
    format!("{key}_{index}")
}

/// Chunk keys `0..count` of `key`, in index order.
pub(crate) fn chunk_keys(key: &str, count: usize) -> Vec<String> {
    (0..count).map(|i| chunk_key(key, i)).collect()
}
