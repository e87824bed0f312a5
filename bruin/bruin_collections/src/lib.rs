//! # Bruin Collections
//!
//! `bruin_collections` provides the collection types used across the
//! Bruin utility library: a map that remembers insertion order and a
//! bounded LRU cache with removal listeners.
//!
//! ## Crate Structure
//!
//! - **ordered**: `OrderedMap`, an insertion-ordered map
//! - **lru**: `LruCache`, a bounded most-recently-used cache

pub mod lru;
pub mod ordered;

// Re-export key types for convenience
pub use lru::{CacheStats, ListenerId, LruCache};
pub use ordered::OrderedMap;
