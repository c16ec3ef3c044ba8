//! Eviction Policy Trait
//!
//! The capability set every eviction strategy implements, and a factory that
//! picks one by name.

use std::fmt;

use crate::error::{CacheError, Result};
use crate::eviction::{LfuPolicy, LruPolicy};

// == Eviction Policy ==
/// Decides which key leaves the cache once it holds more than `capacity` keys.
///
/// The store calls these methods while holding its lock, so implementations
/// need no internal synchronization.
pub trait EvictionPolicy: Send + fmt::Debug {
    /// Records a read of `key`. Untracked keys are ignored.
    fn on_access(&mut self, key: &str);

    /// Starts tracking `key`, or refreshes it if already tracked.
    fn on_insert(&mut self, key: &str);

    /// True iff more keys are tracked than `capacity` allows.
    fn needs_eviction(&self) -> bool;

    /// Removes and returns the next victim, `None` when nothing is tracked.
    fn evict(&mut self) -> Option<String>;

    /// Number of tracked keys.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn contains(&self, key: &str) -> bool;

    fn capacity(&self) -> usize;

    /// Short identifier, e.g. `"lru"`.
    fn name(&self) -> &'static str;
}

// == Factory ==
/// Creates an eviction policy from its name (`"lru"` or `"lfu"`).
pub fn create_eviction_policy(name: &str, capacity: usize) -> Result<Box<dyn EvictionPolicy>> {
    match name.trim().to_lowercase().as_str() {
        "lru" => Ok(Box::new(LruPolicy::new(capacity))),
        "lfu" => Ok(Box::new(LfuPolicy::new(capacity))),
        other => Err(CacheError::Config(format!(
            "Unknown eviction policy: {other}"
        ))),
    }
}
