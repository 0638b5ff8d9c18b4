//! API Handlers
//!
//! HTTP request handlers for each cache server endpoint.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::Value;

use crate::chunked::{is_valid_key, ChunkedCache};
use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::models::{
    ClearResponse, DeleteResponse, GetResponse, HealthResponse, SetRequest, SetResponse,
    StatsResponse,
};
use crate::store::{MemoryStore, DEFAULT_MAX_KEY_LENGTH};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Chunked cache over the shared memory store
    pub cache: ChunkedCache<Arc<MemoryStore>>,
    /// Registry purged by `POST /clear`
    pub known_keys: Arc<[String]>,
}

impl AppState {
    /// Creates a new AppState around an existing cache.
    pub fn new(cache: ChunkedCache<Arc<MemoryStore>>, known_keys: Vec<String>) -> Self {
        Self {
            cache,
            known_keys: known_keys.into(),
        }
    }

    /// Creates a new AppState from configuration.
    pub fn from_config(config: &Config) -> Self {
        let store = MemoryStore::with_limits(
            config.max_entries,
            config.max_entry_size,
            DEFAULT_MAX_KEY_LENGTH,
        );
        let cache = ChunkedCache::with_limits(Arc::new(store), config.limits);
        Self::new(cache, config.known_keys.clone())
    }

    /// The memory store behind the cache.
    pub fn store(&self) -> &Arc<MemoryStore> {
        self.cache.store()
    }
}

/// Handler for PUT /cache/:key
///
/// Always answers 200: caching is best-effort.
pub async fn set_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Json(req): Json<SetRequest>,
) -> Json<SetResponse> {
    state.cache.set(&key, &req.value, req.ttl);
    Json(SetResponse::new(key))
}

/// Handler for GET /cache/:key
pub async fn get_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<GetResponse>> {
    let value: Value = state
        .cache
        .get(&key)
        .ok_or_else(|| CacheError::NotFound(key.clone()))?;

    Ok(Json(GetResponse::new(key, value)))
}

/// Handler for DELETE /cache/:key
///
/// Idempotent: removing an absent key succeeds.
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Json<DeleteResponse> {
    state.cache.remove(&key);
    Json(DeleteResponse::new(key))
}

/// Handler for POST /clear
pub async fn clear_handler(State(state): State<AppState>) -> Json<ClearResponse> {
    state.cache.clear_all(&state.known_keys[..]);

    let cleared = state
        .known_keys
        .iter()
        .filter(|key| is_valid_key(key))
        .cloned()
        .collect();
    Json(ClearResponse { cleared })
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Result<Json<StatsResponse>> {
    let stats = state.store().stats()?;
    Ok(Json(StatsResponse::from(stats)))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn test_state() -> AppState {
        AppState::from_config(&Config::default())
    }

    fn set_request(value: Value) -> Json<SetRequest> {
        Json(SetRequest { value, ttl: None })
    }

    #[tokio::test]
    async fn test_set_and_get_handler() {
        let state = test_state();

        set_handler(
            State(state.clone()),
            Path("examData".to_string()),
            set_request(json!({"rows": 3})),
        )
        .await;

        let response = get_handler(State(state), Path("examData".to_string()))
            .await
            .unwrap();
        assert_eq!(response.value, json!({"rows": 3}));
    }

    #[tokio::test]
    async fn test_get_missing_key_is_not_found() {
        let result = get_handler(State(test_state()), Path("examData".to_string())).await;
        assert!(matches!(result, Err(CacheError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_set_invalid_key_is_accepted_but_not_stored() {
        let state = test_state();

        set_handler(
            State(state.clone()),
            Path("bad key!".to_string()),
            set_request(json!({"a": 1})),
        )
        .await;

        assert!(state.store().is_empty());
    }

    #[tokio::test]
    async fn test_delete_handler() {
        let state = test_state();
        set_handler(
            State(state.clone()),
            Path("examData".to_string()),
            set_request(json!({ "blob": "x".repeat(200_000) })),
        )
        .await;

        delete_handler(State(state.clone()), Path("examData".to_string())).await;

        assert!(state.store().is_empty());
    }

    #[tokio::test]
    async fn test_clear_handler_lists_registry() {
        let state = test_state();
        set_handler(
            State(state.clone()),
            Path("choicesData".to_string()),
            set_request(json!([1, 2, 3])),
        )
        .await;

        let response = clear_handler(State(state.clone())).await;

        assert_eq!(response.cleared.len(), 4);
        assert!(state.store().is_empty());
    }

    #[tokio::test]
    async fn test_stats_handler() {
        let response = stats_handler(State(test_state())).await.unwrap();
        assert_eq!(response.hits, 0);
        assert_eq!(response.total_entries, 0);
    }

    #[tokio::test]
    async fn test_health_handler() {
        let response = health_handler().await;
        assert_eq!(response.status, "healthy");
    }
}
