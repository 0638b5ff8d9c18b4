//! Stored Entry Module
//!
//! A single physical entry held by the memory store, with its expiry time.

use std::time::{SystemTime, UNIX_EPOCH};

// == Stored Entry ==
/// One physical key's value and expiry deadline.
#[derive(Debug, Clone)]
pub(crate) struct StoredEntry {
    /// The stored text
    pub(crate) value: String,
    /// Expiration timestamp (Unix milliseconds)
    pub(crate) expires_at: u64,
}

impl StoredEntry {
    // == Constructor ==
    /// Creates an entry that expires `ttl_secs` seconds from now.
    pub(crate) fn new(value: String, ttl_secs: u64) -> Self {
        let expires_at = current_timestamp_ms().saturating_add(ttl_secs.saturating_mul(1000));
        Self { value, expires_at }
    }

    // == Is Expired ==
    /// An entry is expired once the current time reaches its deadline.
    pub(crate) fn is_expired(&self) -> bool {
        self.is_expired_at(current_timestamp_ms())
    }

    pub(crate) fn is_expired_at(&self, now_ms: u64) -> bool {
        now_ms >= self.expires_at
    }

    // == Time To Live ==
    /// Remaining lifetime in whole seconds, rounded up, `0` once expired.
    pub(crate) fn ttl_remaining(&self) -> u64 {
        self.expires_at
            .saturating_sub(current_timestamp_ms())
            .div_ceil(1000)
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
///
/// A clock set before the epoch reads as `0`.
pub(crate) fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;
    use std::time::Duration;

    #[test]
    fn test_entry_creation() {
        let entry = StoredEntry::new("payload".to_string(), 60);

        assert_eq!(entry.value, "payload");
        assert!(!entry.is_expired());
    }

    #[test]
    fn test_entry_expiration() {
        let entry = StoredEntry::new("payload".to_string(), 1);
        assert!(!entry.is_expired());

        sleep(Duration::from_millis(1100));

        assert!(entry.is_expired());
    }

    #[test]
    fn test_ttl_remaining_rounds_up() {
        let entry = StoredEntry::new("payload".to_string(), 60);

        let remaining = entry.ttl_remaining();
        assert!(remaining <= 60);
        assert!(remaining >= 59);
    }

    #[test]
    fn test_zero_ttl_is_immediately_expired() {
        let entry = StoredEntry::new("payload".to_string(), 0);
        assert!(entry.is_expired());
        assert_eq!(entry.ttl_remaining(), 0);
    }

    #[test]
    fn test_expiration_boundary_condition() {
        let entry = StoredEntry {
            value: "payload".to_string(),
            expires_at: 5_000,
        };

        assert!(!entry.is_expired_at(4_999));
        assert!(entry.is_expired_at(5_000));
    }
}
