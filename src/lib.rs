//! walcache - A capacity-bounded in-memory cache with a write-ahead log
//!
//! The store keeps a key-value mapping, an eviction policy and a durability
//! log in lock-step; the log is replayed on startup to rebuild state.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod eviction;
pub mod models;
pub mod wal;

pub use api::AppState;
pub use cache::CacheStore;
pub use config::Config;
pub use error::{CacheError, Result};
pub use wal::{WalRecord, WriteAheadLog};
