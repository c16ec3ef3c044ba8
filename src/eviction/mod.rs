//! Eviction Module
//!
//! Pluggable eviction strategies behind the `EvictionPolicy` trait.

mod lfu;
mod lru;
mod policy;

pub use lfu::LfuPolicy;
pub use lru::LruPolicy;
pub use policy::{create_eviction_policy, EvictionPolicy};
