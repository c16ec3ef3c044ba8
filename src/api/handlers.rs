//! API Handlers
//!
//! HTTP request handlers for each cache server endpoint.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{Query, State},
    http::header,
    response::IntoResponse,
    Json,
};
use tracing::warn;

use crate::api::RequestMetrics;
use crate::cache::CacheStore;
use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::eviction::create_eviction_policy;
use crate::models::{
    GetQuery, GetResponse, HealthResponse, SetRequest, SetResponse, StatsResponse,
};
use crate::wal::WriteAheadLog;

/// Application state shared across all handlers.
///
/// The store synchronizes itself and the metrics are atomic, so no lock here.
#[derive(Clone)]
pub struct AppState {
    /// Durable cache store
    pub cache: Arc<CacheStore>,
    /// Hit/miss/latency metrics
    pub metrics: Arc<RequestMetrics>,
}

impl AppState {
    /// Creates a new AppState with the given cache store and fresh metrics.
    pub fn new(cache: CacheStore) -> Result<Self> {
        Ok(Self {
            cache: Arc::new(cache),
            metrics: Arc::new(RequestMetrics::new()?),
        })
    }

    /// Creates a new AppState from configuration.
    ///
    /// Opens the write-ahead log, builds the configured eviction policy and
    /// replays the log into a fresh store.
    pub fn from_config(config: &Config) -> Result<Self> {
        let log = WriteAheadLog::open(&config.wal_path)?;
        let policy = create_eviction_policy(&config.eviction_policy, config.max_entries)?;
        let cache = CacheStore::with_policy(policy, log)?;
        Self::new(cache)
    }
}

/// Handler for GET /v1/get?key=...
///
/// Retrieves a value from the cache by key and records the hit or miss.
pub async fn get_handler(
    State(state): State<AppState>,
    Query(query): Query<GetQuery>,
) -> Result<Json<GetResponse>> {
    if let Some(error_msg) = query.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    let start = Instant::now();
    match state.cache.get(&query.key) {
        Some(value) => {
            state.metrics.record_hit(start.elapsed());
            Ok(Json(GetResponse::new(query.key, value)))
        }
        None => {
            state.metrics.record_miss(start.elapsed());
            Err(CacheError::NotFound(query.key))
        }
    }
}

/// Handler for POST /v1/set
///
/// Stores a key-value pair; responds once the write is durable.
pub async fn set_handler(
    State(state): State<AppState>,
    Json(req): Json<SetRequest>,
) -> Result<Json<SetResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    // The append syncs to disk, keep it off the async workers
    let cache = Arc::clone(&state.cache);
    let key = req.key.clone();
    tokio::task::spawn_blocking(move || cache.set(req.key, req.value))
        .await
        .map_err(|e| CacheError::Internal(e.to_string()))?
        .map_err(|e| {
            warn!("Failed to persist key '{}': {}", key, e);
            e
        })?;

    state.metrics.record_set();

    Ok(Json(SetResponse::new(key)))
}

/// Handler for GET /stats
///
/// Returns request counters and current store occupancy.
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse::new(
        &state.metrics,
        state.cache.len(),
        state.cache.capacity(),
        state.cache.policy_name(),
    ))
}

/// Handler for GET /metrics
///
/// Prometheus text exposition of the request metrics.
pub async fn metrics_handler(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let body = state.metrics.encode()?;
    Ok(([(header::CONTENT_TYPE, prometheus::TEXT_FORMAT)], body))
}

/// Handler for GET /health
///
/// Returns health status of the server.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_state(dir: &TempDir, capacity: usize) -> AppState {
        let log = WriteAheadLog::open(dir.path().join("wal.log")).unwrap();
        AppState::new(CacheStore::new(capacity, log).unwrap()).unwrap()
    }

    fn query(key: &str) -> Query<GetQuery> {
        Query(GetQuery {
            key: key.to_string(),
        })
    }

    #[tokio::test]
    async fn test_set_and_get_handler() {
        let dir = TempDir::new().unwrap();
        let state = test_state(&dir, 100);

        let req = SetRequest {
            key: "test_key".to_string(),
            value: "test_value".to_string(),
        };
        let result = set_handler(State(state.clone()), Json(req)).await;
        assert!(result.is_ok());

        let response = get_handler(State(state.clone()), query("test_key"))
            .await
            .unwrap();
        assert_eq!(response.value, "test_value");

        assert_eq!(state.metrics.hits(), 1);
        assert_eq!(state.metrics.sets(), 1);
    }

    #[tokio::test]
    async fn test_get_nonexistent_key() {
        let dir = TempDir::new().unwrap();
        let state = test_state(&dir, 100);

        let result = get_handler(State(state.clone()), query("nonexistent")).await;
        assert!(matches!(result, Err(CacheError::NotFound(_))));
        assert_eq!(state.metrics.misses(), 1);
    }

    #[tokio::test]
    async fn test_get_empty_key_rejected() {
        let dir = TempDir::new().unwrap();
        let state = test_state(&dir, 100);

        let result = get_handler(State(state.clone()), query("")).await;
        assert!(matches!(result, Err(CacheError::InvalidRequest(_))));
        // Rejected before reaching the store, so not counted
        assert_eq!(state.metrics.misses(), 0);
    }

    #[tokio::test]
    async fn test_set_invalid_request() {
        let dir = TempDir::new().unwrap();
        let state = test_state(&dir, 100);

        let req = SetRequest {
            key: "".to_string(),
            value: "value".to_string(),
        };
        let result = set_handler(State(state.clone()), Json(req)).await;
        assert!(matches!(result, Err(CacheError::InvalidRequest(_))));
        assert!(state.cache.is_empty());
    }

    #[tokio::test]
    async fn test_set_after_close_reports_failure() {
        let dir = TempDir::new().unwrap();
        let state = test_state(&dir, 100);
        state.cache.close().unwrap();

        let req = SetRequest {
            key: "k".to_string(),
            value: "v".to_string(),
        };
        let result = set_handler(State(state.clone()), Json(req)).await;
        assert!(matches!(result, Err(CacheError::LogClosed(_))));
        assert!(state.cache.is_empty());
        assert_eq!(state.metrics.sets(), 0);
    }

    #[tokio::test]
    async fn test_stats_handler() {
        let dir = TempDir::new().unwrap();
        let state = test_state(&dir, 7);

        let response = stats_handler(State(state)).await;
        assert_eq!(response.hits, 0);
        assert_eq!(response.misses, 0);
        assert_eq!(response.capacity, 7);
        assert_eq!(response.eviction_policy, "lru");
    }

    #[tokio::test]
    async fn test_health_handler() {
        let response = health_handler().await;
        assert_eq!(response.status, "healthy");
    }

    #[test]
    fn test_from_config_recovers_log() {
        let dir = TempDir::new().unwrap();
        let config = Config {
            max_entries: 2,
            wal_path: dir.path().join("data").join("wal.log"),
            server_port: 0,
            eviction_policy: "lfu".to_string(),
        };

        {
            let state = AppState::from_config(&config).unwrap();
            state.cache.set("a", "1").unwrap();
            state.cache.close().unwrap();
        }

        let state = AppState::from_config(&config).unwrap();
        assert_eq!(state.cache.get("a"), Some("1".to_string()));
        assert_eq!(state.cache.policy_name(), "lfu");
    }

    #[test]
    fn test_from_config_rejects_unknown_policy() {
        let dir = TempDir::new().unwrap();
        let config = Config {
            eviction_policy: "fifo".to_string(),
            wal_path: dir.path().join("wal.log"),
            ..Config::default()
        };

        assert!(matches!(
            AppState::from_config(&config),
            Err(CacheError::Config(_))
        ));
    }
}
