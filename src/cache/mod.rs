//! Cache Module
//!
//! Provides the capacity-bounded, write-ahead-logged cache store.

mod store;


// Re-export public types
pub use store::CacheStore;

// == Public Constants ==
/// Capacity used when none is configured
pub const DEFAULT_CAPACITY: usize = 1024;
