//! API Module
//!
//! Thin HTTP layer over the cache store. Request validation and
//! hit/miss/latency attribution live here, not in the store.
//!
//! # Endpoints
//! - `GET /v1/get?key=K` - Retrieve a value by key
//! - `POST /v1/set` - Store a key-value pair
//! - `GET /stats` - Get request statistics
//! - `GET /metrics` - Prometheus exposition
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;
mod metrics;

pub use handlers::*;
pub use routes::create_router;
pub use metrics::RequestMetrics;
