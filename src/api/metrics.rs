//! Request Metrics Module
//!
//! Prometheus counters kept by the HTTP layer. The store itself only answers
//! found / not found; hit, miss and latency attribution happens here.

use std::time::Duration;

use prometheus::{Encoder, Histogram, HistogramOpts, IntCounter, Registry, TextEncoder};

use crate::error::{CacheError, Result};

// == Request Metrics ==
/// Read and write outcomes observed at the API boundary.
pub struct RequestMetrics {
    registry: Registry,
    hits: IntCounter,
    misses: IntCounter,
    sets: IntCounter,
    /// GET latency in seconds, default buckets
    get_latency: Histogram,
}

impl RequestMetrics {
    // == Constructor ==
    /// Registers all metrics on a private registry.
    pub fn new() -> Result<Self> {
        let registry = Registry::new();

        let hits = IntCounter::new("cache_hits_total", "Total number of cache hits")?;
        registry.register(Box::new(hits.clone()))?;

        let misses = IntCounter::new("cache_misses_total", "Total number of cache misses")?;
        registry.register(Box::new(misses.clone()))?;

        let sets = IntCounter::new("cache_sets_total", "Total number of durable cache writes")?;
        registry.register(Box::new(sets.clone()))?;

        let get_latency = Histogram::with_opts(HistogramOpts::new(
            "cache_request_latency_seconds",
            "Latency of cache GET requests",
        ))?;
        registry.register(Box::new(get_latency.clone()))?;

        Ok(Self {
            registry,
            hits,
            misses,
            sets,
            get_latency,
        })
    }

    // == Recording ==
    pub fn record_hit(&self, latency: Duration) {
        self.hits.inc();
        self.get_latency.observe(latency.as_secs_f64());
    }

    pub fn record_miss(&self, latency: Duration) {
        self.misses.inc();
        self.get_latency.observe(latency.as_secs_f64());
    }

    pub fn record_set(&self) {
        self.sets.inc();
    }

    // == Readers ==
    pub fn hits(&self) -> u64 {
        self.hits.get()
    }

    pub fn misses(&self) -> u64 {
        self.misses.get()
    }

    pub fn sets(&self) -> u64 {
        self.sets.get()
    }

    /// Returns hits / (hits + misses), or 0.0 before the first read.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits() + self.misses();
        if total == 0 {
            0.0
        } else {
            self.hits() as f64 / total as f64
        }
    }

    /// Mean read latency in microseconds, 0 before the first read.
    pub fn avg_get_latency_us(&self) -> u64 {
        let count = self.get_latency.get_sample_count();
        if count == 0 {
            0
        } else {
            (self.get_latency.get_sample_sum() / count as f64 * 1_000_000.0) as u64
        }
    }

    // == Exposition ==
    /// Renders every metric in the Prometheus text format.
    pub fn encode(&self) -> Result<String> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| CacheError::Internal(e.to_string()))
    }
}
