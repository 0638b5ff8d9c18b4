//! Chunked Cache Module
//!
//! Stores JSON values of any size up to a ceiling on top of a [`KvStore`]
//! whose entries are far smaller. Large values are split into chunks plus a
//! count marker and reassembled on read; torn or corrupt chunk sets turn into
//! cache misses and are purged.
//!
//! [`KvStore`]: crate::store::KvStore

mod assembler;
mod chunker;
mod cleaner;
mod facade;
mod key;
mod size;

#[cfg(test)]
mod property_tests;

pub use facade::{ChunkedCache, KNOWN_KEYS};
pub use key::{chunk_key, is_valid_key, marker_key};
pub use size::is_storable;

// == Public Constants ==
/// Characters per chunk, also the largest inline value
pub const CHUNK_SIZE: usize = 90_000;

/// Most chunks a single value may be split into
pub const MAX_CHUNKS: usize = 50;

/// Absolute ceiling on a serialized value, in characters
pub const MAX_VALUE_LENGTH: usize = 1_000_000;

/// TTL applied when the caller gives none, in seconds
pub const DEFAULT_TTL: u64 = 21_600;

/// Lower TTL bound in seconds
pub const MIN_TTL: u64 = 60;

/// Upper TTL bound in seconds
pub const MAX_TTL: u64 = 86_400;

// == Cache Limits ==
/// Size and TTL policy of a [`ChunkedCache`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheLimits {
    /// Characters per chunk; values up to this length are stored inline
    pub chunk_size: usize,
    /// Most chunks per value
    pub max_chunks: usize,
    /// Absolute serialized ceiling in characters
    pub max_value_length: usize,
    /// TTL used when none is given
    pub default_ttl: u64,
    pub min_ttl: u64,
    pub max_ttl: u64,
}

impl CacheLimits {
    /// Fixes settings that would make the layer unusable: chunk size and
    /// chunk count are at least 1, TTL bounds are ordered and the default
    /// lies within them.
    pub fn normalized(self) -> Self {
        let min_ttl = self.min_ttl.min(self.max_ttl);
        let max_ttl = self.min_ttl.max(self.max_ttl);
        Self {
            chunk_size: self.chunk_size.max(1),
            max_chunks: self.max_chunks.max(1),
            max_value_length: self.max_value_length,
            default_ttl: self.default_ttl.clamp(min_ttl, max_ttl),
            min_ttl,
            max_ttl,
        }
    }

    // == Clamp TTL ==
    /// Effective TTL for a write: the default when `None`, otherwise the
    /// requested value clamped to `[min_ttl, max_ttl]`.
    pub fn clamp_ttl(&self, ttl: Option<u64>) -> u64 {
        ttl.unwrap_or(self.default_ttl)
            .max(self.min_ttl)
            .min(self.max_ttl)
    }
}

impl Default for CacheLimits {
    fn default() -> Self {
        Self {
            chunk_size: CHUNK_SIZE,
            max_chunks: MAX_CHUNKS,
            max_value_length: MAX_VALUE_LENGTH,
            default_ttl: DEFAULT_TTL,
            min_ttl: MIN_TTL,
            max_ttl: MAX_TTL,
        }
    }
}
