//! Request DTOs for the cache server API
//!
//! Defines the structure of incoming HTTP request bodies.

use serde::Deserialize;
use serde_json::Value;

/// Request body for the SET operation (PUT /cache/:key)
///
/// # Fields
/// - `value`: Any JSON document to cache
/// - `ttl`: Optional TTL in seconds, clamped by the cache
#[derive(Debug, Clone, Deserialize)]
pub struct SetRequest {
    /// The value to cache
    pub value: Value,
    /// Optional TTL in seconds
    #[serde(default)]
    pub ttl: Option<u64>,
}
