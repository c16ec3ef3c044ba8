//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::path::PathBuf;

use crate::cache::DEFAULT_CAPACITY;

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum number of keys the cache retains
    pub max_entries: usize,
    /// Location of the write-ahead log
    pub wal_path: PathBuf,
    /// HTTP server port
    pub server_port: u16,
    /// Eviction policy name (`lru` or `lfu`)
    pub eviction_policy: String,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `MAX_ENTRIES` - Maximum cache keys (default: 1024)
    /// - `WAL_PATH` - Write-ahead log file (default: ./data/wal.log)
    /// - `SERVER_PORT` - HTTP server port (default: 8080)
    /// - `EVICTION_POLICY` - `lru` or `lfu` (default: lru)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_entries: env::var("MAX_ENTRIES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_entries),
            wal_path: env::var("WAL_PATH")
                .ok()
                .filter(|v| !v.is_empty())
                .map(PathBuf::from)
                .unwrap_or(defaults.wal_path),
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.server_port),
            eviction_policy: env::var("EVICTION_POLICY")
                .ok()
                .filter(|v| !v.is_empty())
                .unwrap_or(defaults.eviction_policy),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_entries: DEFAULT_CAPACITY,
            wal_path: PathBuf::from("./data/wal.log"),
            server_port: 8080,
            eviction_policy: "lru".to_string(),
        }
    }
}
