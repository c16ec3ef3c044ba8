//! LRU Policy Module
//!
//! Implements Least Recently Used tracking for cache eviction.

use std::collections::HashMap;

use crate::eviction::EvictionPolicy;

/// Node in the recency list
#[derive(Debug)]
struct Node {
    key: String,
    prev: Option<usize>,
    next: Option<usize>,
}

// == LRU Policy ==
/// Tracks access order for LRU eviction.
///
/// Keys live in a slab-backed doubly linked list where:
/// - Head = Most recently used
/// - Tail = Least recently used
///
/// `index` maps each key to its slot, so every operation is O(1).
#[derive(Debug)]
pub struct LruPolicy {
    index: HashMap<String, usize>,
    nodes: Vec<Option<Node>>,
    free_list: Vec<usize>,
    head: Option<usize>,
    tail: Option<usize>,
    capacity: usize,
}

impl LruPolicy {
    // == Constructor ==
    /// Creates an empty tracker that reports eviction above `capacity` keys.
    pub fn new(capacity: usize) -> Self {
        Self {
            index: HashMap::with_capacity(capacity.saturating_add(1)),
            nodes: Vec::with_capacity(capacity.saturating_add(1)),
            free_list: Vec::new(),
            head: None,
            tail: None,
            capacity,
        }
    }

    // == Peek Oldest ==
    /// Returns the least recently used key without removing it.
    pub fn peek_oldest(&self) -> Option<&str> {
        self.tail
            .and_then(|idx| self.nodes[idx].as_ref())
            .map(|node| node.key.as_str())
    }

    // == Recency Order ==
    /// Tracked keys from most to least recently used.
    pub fn keys_by_recency(&self) -> Vec<&str> {
        let mut keys = Vec::with_capacity(self.index.len());
        let mut cursor = self.head;
        while let Some(idx) = cursor {
            let Some(node) = self.nodes[idx].as_ref() else {
                break;
            };
            keys.push(node.key.as_str());
            cursor = node.next;
        }
        keys
    }

    fn alloc_node(&mut self, key: &str) -> usize {
        let node = Node {
            key: key.to_string(),
            prev: None,
            next: None,
        };
        match self.free_list.pop() {
            Some(idx) => {
                self.nodes[idx] = Some(node);
                idx
            }
            None => {
                self.nodes.push(Some(node));
                self.nodes.len() - 1
            }
        }
    }

    fn push_front(&mut self, idx: usize) {
        let old_head = self.head;
        if let Some(node) = self.nodes[idx].as_mut() {
            node.prev = None;
            node.next = old_head;
        }
        if let Some(head_idx) = old_head {
            if let Some(head) = self.nodes[head_idx].as_mut() {
                head.prev = Some(idx);
            }
        }
        self.head = Some(idx);
        if self.tail.is_none() {
            self.tail = Some(idx);
        }
    }

    fn unlink(&mut self, idx: usize) {
        let (prev, next) = match self.nodes[idx].as_ref() {
            Some(node) => (node.prev, node.next),
            None => return,
        };

        match prev {
            Some(p) => {
                if let Some(node) = self.nodes[p].as_mut() {
                    node.next = next;
                }
            }
            None => self.head = next,
        }
        match next {
            Some(n) => {
                if let Some(node) = self.nodes[n].as_mut() {
                    node.prev = prev;
                }
            }
            None => self.tail = prev,
        }
    }

    fn move_to_front(&mut self, idx: usize) {
        if self.head == Some(idx) {
            return;
        }
        self.unlink(idx);
        self.push_front(idx);
    }
}

impl EvictionPolicy for LruPolicy {
    fn on_access(&mut self, key: &str) {
        if let Some(&idx) = self.index.get(key) {
            self.move_to_front(idx);
        }
    }

    fn on_insert(&mut self, key: &str) {
        if let Some(&idx) = self.index.get(key) {
            self.move_to_front(idx);
            return;
        }
        let idx = self.alloc_node(key);
        self.push_front(idx);
        self.index.insert(key.to_string(), idx);
    }

    fn needs_eviction(&self) -> bool {
        self.index.len() > self.capacity
    }

    fn evict(&mut self) -> Option<String> {
        let idx = self.tail?;
        self.unlink(idx);
        let node = self.nodes[idx].take()?;
        self.free_list.push(idx);
        self.index.remove(&node.key);
        Some(node.key)
    }

    fn len(&self) -> usize {
        self.index.len()
    }

    fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    fn capacity(&self) -> usize {
        self.capacity
    }

    fn name(&self) -> &'static str {
        "lru"
    }
}
