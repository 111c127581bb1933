//! Memoising decorator for attribute sources.
//!
//! Wraps any [`crate::AttributeSource`] and caches its answers under keys from
//! [`crate::cache_key::CacheKeyGenerator`]:
//! - Thread-safe storage using DashMap
//! - TTL expiry with lazy eviction
//! - Hit/miss statistics

mod source;

pub use source::{CacheConfig, CacheStats, CachingSource};
