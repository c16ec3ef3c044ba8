//! Response bodies for the cache server API

use serde::Serialize;

use crate::api::RequestMetrics;

/// Body of a successful `GET /v1/get`.
#[derive(Debug, Clone, Serialize)]
pub struct GetResponse {
    pub key: String,
    pub value: String,
}

impl GetResponse {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Body of a successful `POST /v1/set`, sent once the record is synced.
#[derive(Debug, Clone, Serialize)]
pub struct SetResponse {
    pub message: String,
    pub key: String,
}

impl SetResponse {
    pub fn new(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            message: format!("Key '{key}' logged and stored"),
            key,
        }
    }
}

/// Body of `GET /stats`: request metrics plus store occupancy.
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    pub hits: u64,
    pub misses: u64,
    pub sets: u64,
    /// Keys currently held
    pub total_entries: usize,
    pub capacity: usize,
    pub eviction_policy: String,
    pub hit_rate: f64,
    pub avg_get_latency_us: u64,
}

impl StatsResponse {
    pub fn new(
        metrics: &RequestMetrics,
        total_entries: usize,
        capacity: usize,
        eviction_policy: impl Into<String>,
    ) -> Self {
        Self {
            hits: metrics.hits(),
            misses: metrics.misses(),
            sets: metrics.sets(),
            total_entries,
            capacity,
            eviction_policy: eviction_policy.into(),
            hit_rate: metrics.hit_rate(),
            avg_get_latency_us: metrics.avg_get_latency_us(),
        }
    }
}

/// Body of `GET /health`.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    /// RFC 3339
    pub timestamp: String,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Body of every error response.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_stats_response_reads_metrics() {
        let metrics = RequestMetrics::new().unwrap();
        for _ in 0..4 {
            metrics.record_hit(Duration::from_micros(5));
        }
        metrics.record_miss(Duration::from_micros(5));
        metrics.record_set();

        let resp = StatsResponse::new(&metrics, 3, 10, "lru");
        assert_eq!((resp.hits, resp.misses, resp.sets), (4, 1, 1));
        assert!((resp.hit_rate - 0.8).abs() < 0.001);
        assert_eq!(resp.total_entries, 3);
        assert_eq!(resp.capacity, 10);
    }

    #[test]
    fn test_value_with_control_characters_serializes_escaped() {
        let json = serde_json::to_string(&GetResponse::new("k", "a\tb\nc")).unwrap();
        assert_eq!(json, r#"{"key":"k","value":"a\tb\nc"}"#);
    }
}
