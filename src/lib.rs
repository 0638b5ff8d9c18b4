//! Chunk Cache - a chunking client for size-limited key-value caches
//!
//! Stores JSON values far larger than the store's per-entry ceiling by
//! splitting them into chunks, and reads them back only when the full chunk
//! set is intact. Ships an in-memory store and an HTTP front end.

pub mod api;
pub mod chunked;
pub mod config;
pub mod error;
pub mod models;
pub mod store;
pub mod tasks;

pub use api::AppState;
pub use chunked::{CacheLimits, ChunkedCache};
pub use config::Config;
pub use error::{CacheError, StoreError};
pub use store::{KvStore, MemoryStore};
pub use tasks::spawn_cleanup_task;
