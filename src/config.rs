//! Configuration Module
//!
//! Handles loading and managing server and cache configuration from
//! environment variables.

use std::env;
use std::str::FromStr;

use crate::chunked::{CacheLimits, KNOWN_KEYS};
use crate::store::DEFAULT_MAX_ENTRY_SIZE;

/// Server and cache configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// Expiry sweep interval in seconds
    pub cleanup_interval: u64,
    /// Maximum number of physical entries the memory store holds
    pub max_entries: usize,
    /// Per-entry value ceiling of the memory store, in bytes
    pub max_entry_size: usize,
    /// Chunking and TTL policy
    pub limits: CacheLimits,
    /// Logical keys purged by ClearAll
    pub known_keys: Vec<String>,
}

/// Reads `name` and parses it, falling back to `default` when the variable
/// is missing or malformed.
fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

fn parse_key_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|key| !key.is_empty())
        .map(str::to_string)
        .collect()
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `CLEANUP_INTERVAL` - Expiry sweep frequency in seconds (default: 60)
    /// - `MAX_ENTRIES` - Memory store capacity (default: 10000)
    /// - `MAX_ENTRY_SIZE` - Memory store entry ceiling in bytes (default: 102400)
    /// - `CHUNK_SIZE` - Characters per chunk (default: 90000)
    /// - `MAX_CHUNKS` - Chunks per value (default: 50)
    /// - `MAX_VALUE_LENGTH` - Serialized value ceiling (default: 1000000)
    /// - `DEFAULT_TTL`, `MIN_TTL`, `MAX_TTL` - TTL policy in seconds
    ///   (default: 21600, 60, 86400)
    /// - `KNOWN_KEYS` - Comma separated ClearAll registry
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let limits = CacheLimits {
            chunk_size: env_or("CHUNK_SIZE", defaults.limits.chunk_size),
            max_chunks: env_or("MAX_CHUNKS", defaults.limits.max_chunks),
            max_value_length: env_or("MAX_VALUE_LENGTH", defaults.limits.max_value_length),
            default_ttl: env_or("DEFAULT_TTL", defaults.limits.default_ttl),
            min_ttl: env_or("MIN_TTL", defaults.limits.min_ttl),
            max_ttl: env_or("MAX_TTL", defaults.limits.max_ttl),
        }
        .normalized();

        let known_keys = env::var("KNOWN_KEYS")
            .ok()
            .map(|raw| parse_key_list(&raw))
            .filter(|keys| !keys.is_empty())
            .unwrap_or(defaults.known_keys);

        Self {
            server_port: env_or("SERVER_PORT", defaults.server_port),
            cleanup_interval: env_or("CLEANUP_INTERVAL", defaults.cleanup_interval).max(1),
            max_entries: env_or("MAX_ENTRIES", defaults.max_entries),
            max_entry_size: env_or("MAX_ENTRY_SIZE", defaults.max_entry_size),
            limits,
            known_keys,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 3000,
            cleanup_interval: 60,
            max_entries: 10_000,
            max_entry_size: DEFAULT_MAX_ENTRY_SIZE,
            limits: CacheLimits::default(),
            known_keys: KNOWN_KEYS.iter().map(|key| key.to_string()).collect(),
        }
    }
}
