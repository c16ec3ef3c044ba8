//! Cache Store Module
//!
//! Main cache engine combining HashMap storage, a pluggable eviction policy
//! and the write-ahead log behind a single lock.

use std::collections::HashMap;

use parking_lot::Mutex;
use tracing::{debug, info};

use crate::error::{CacheError, Result};
use crate::eviction::{EvictionPolicy, LruPolicy};
use crate::wal::{WalRecord, WriteAheadLog};

// == Store State ==
/// Everything the lock guards. The three parts change together or not at all.
#[derive(Debug)]
struct StoreState {
    /// Key-value storage
    entries: HashMap<String, String>,
    /// Tracks exactly the keys in `entries`
    policy: Box<dyn EvictionPolicy>,
    /// Durability log
    log: WriteAheadLog,
}

impl StoreState {
    /// Inserts or overwrites `key`, evicting at most one other key.
    ///
    /// Shared by live writes and replay so both obey the capacity bound.
    fn apply(&mut self, key: String, value: String) -> Option<String> {
        let is_new = !self.entries.contains_key(&key);
        self.policy.on_insert(&key);

        let mut evicted = None;
        if is_new && self.policy.needs_eviction() {
            if let Some(victim) = self.policy.evict() {
                self.entries.remove(&victim);
                evicted = Some(victim);
            }
        }

        self.entries.insert(key, value);
        evicted
    }
}

// == Cache Store ==
/// Capacity-bounded, durable key-value cache.
///
/// `get` and `set` both take the lock exclusively: a read also reorders the
/// eviction policy, which is a mutation.
#[derive(Debug)]
pub struct CacheStore {
    state: Mutex<StoreState>,
    /// Maximum number of keys retained
    capacity: usize,
}

impl CacheStore {
    // == Constructor ==
    /// Creates an LRU store holding at most `capacity` keys and replays `log`.
    pub fn new(capacity: usize, log: WriteAheadLog) -> Result<Self> {
        Self::with_policy(Box::new(LruPolicy::new(capacity)), log)
    }

    /// Creates a store around an empty eviction policy and replays `log`.
    ///
    /// The store's capacity is the policy's. Every record in the log is
    /// applied in order exactly like a live `set`, so a log holding more keys
    /// than fit leaves only the most recently written ones.
    pub fn with_policy(policy: Box<dyn EvictionPolicy>, log: WriteAheadLog) -> Result<Self> {
        let capacity = policy.capacity();
        if capacity == 0 {
            return Err(CacheError::Config(
                "Capacity must be greater than 0".to_string(),
            ));
        }
        if !policy.is_empty() {
            return Err(CacheError::Config(
                "Eviction policy must start empty".to_string(),
            ));
        }

        let records = log.read_all()?;
        let replayed = records.len();

        let mut state = StoreState {
            entries: HashMap::with_capacity(capacity),
            policy,
            log,
        };

        let mut evictions = 0usize;
        for record in records {
            if state.apply(record.key, record.value).is_some() {
                evictions += 1;
            }
        }

        info!(
            "Recovered {} keys from {} log records ({} evicted, policy={}, capacity={})",
            state.entries.len(),
            replayed,
            evictions,
            state.policy.name(),
            capacity
        );

        Ok(Self {
            state: Mutex::new(state),
            capacity,
        })
    }

    // == Get ==
    /// Returns the value for `key`, marking it as recently used.
    ///
    /// A miss leaves the eviction policy untouched. Reads are never logged.
    pub fn get(&self, key: &str) -> Option<String> {
        let mut state = self.state.lock();
        let value = state.entries.get(key).cloned()?;
        state.policy.on_access(key);
        Some(value)
    }

    // == Set ==
    /// Stores `value` under `key`, evicting one key if the store is full.
    ///
    /// The record is appended and synced before the in-memory state changes,
    /// so a failed append leaves mapping, policy and log exactly as they were
    /// and the error is returned to the caller.
    pub fn set(&self, key: impl Into<String>, value: impl Into<String>) -> Result<()> {
        let record = WalRecord::new(key, value);
        let mut state = self.state.lock();

        state.log.append(&record)?;

        if let Some(evicted) = state.apply(record.key, record.value) {
            debug!("Evicted key '{}' ({})", evicted, state.policy.name());
        }

        Ok(())
    }

    // == Close ==
    /// Syncs and releases the log. Later `set` calls fail, `get` still works.
    pub fn close(&self) -> Result<()> {
        self.state.lock().log.close()
    }

    // == Length ==
    /// Returns the current number of keys in the cache.
    pub fn len(&self) -> usize {
        self.state.lock().entries.len()
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the maximum number of keys retained.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the eviction policy's name.
    pub fn policy_name(&self) -> &'static str {
        self.state.lock().policy.name()
    }

    /// Mapping and policy track the same key set.
    #[cfg(test)]
    pub(crate) fn is_consistent(&self) -> bool {
        let state = self.state.lock();
        state.entries.len() == state.policy.len()
            && state.entries.keys().all(|k| state.policy.contains(k))
            && state.entries.len() <= self.capacity
    }
}
