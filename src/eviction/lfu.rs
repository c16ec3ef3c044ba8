//! LFU Policy Module
//!
//! Least Frequently Used eviction. Among keys with the same frequency the
//! least recently touched one goes first. A key inserted since the last
//! eviction is never its own victim while another candidate exists, since
//! the store inserts before it evicts.

use std::collections::{BTreeSet, HashMap};

use crate::eviction::EvictionPolicy;

// == LFU Policy ==
#[derive(Debug)]
pub struct LfuPolicy {
    /// key -> (frequency, last touch)
    counters: HashMap<String, (u64, u64)>,
    /// Ordered by (frequency, last touch, key); the first entry is the victim
    queue: BTreeSet<(u64, u64, String)>,
    /// Monotonic touch clock
    clock: u64,
    /// Newest key, shielded from the next eviction
    newest: Option<String>,
    capacity: usize,
}

impl LfuPolicy {
    // == Constructor ==
    pub fn new(capacity: usize) -> Self {
        Self {
            counters: HashMap::with_capacity(capacity.saturating_add(1)),
            queue: BTreeSet::new(),
            clock: 0,
            newest: None,
            capacity,
        }
    }

    // == Frequency ==
    /// Number of inserts and reads recorded for `key`.
    pub fn frequency(&self, key: &str) -> Option<u64> {
        self.counters.get(key).map(|&(freq, _)| freq)
    }

    fn tick(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }

    fn bump(&mut self, key: &str) -> bool {
        let Some(&(freq, touched)) = self.counters.get(key) else {
            return false;
        };
        let now = self.tick();
        self.queue.remove(&(freq, touched, key.to_string()));
        self.queue.insert((freq + 1, now, key.to_string()));
        self.counters.insert(key.to_string(), (freq + 1, now));
        true
    }
}

impl EvictionPolicy for LfuPolicy {
    fn on_access(&mut self, key: &str) {
        self.bump(key);
    }

    fn on_insert(&mut self, key: &str) {
        if self.bump(key) {
            return;
        }
        let now = self.tick();
        self.queue.insert((1, now, key.to_string()));
        self.counters.insert(key.to_string(), (1, now));
        self.newest = Some(key.to_string());
    }

    fn needs_eviction(&self) -> bool {
        self.counters.len() > self.capacity
    }

    fn evict(&mut self) -> Option<String> {
        let newest = self.newest.take();
        let shielded = self.queue.len() > 1;
        let victim = self
            .queue
            .iter()
            .find(|(_, _, key)| !(shielded && newest.as_deref() == Some(key.as_str())))
            .cloned()?;

        self.queue.remove(&victim);
        self.counters.remove(&victim.2);
        Some(victim.2)
    }

    fn len(&self) -> usize {
        self.counters.len()
    }

    fn contains(&self, key: &str) -> bool {
        self.counters.contains_key(key)
    }

    fn capacity(&self) -> usize {
        self.capacity
    }

    fn name(&self) -> &'static str {
        "lfu"
    }
}
