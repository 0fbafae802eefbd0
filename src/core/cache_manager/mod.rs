//! Keyed, time-boxed in-memory cache
//!
//! The store is the single source of truth for previously fetched results.
//! Stale entries are never returned, read-modify-write goes through
//! [`CacheStore::update`], and [`CacheStore::is_healthy`] lets process
//! bootstrap decide whether to start from an empty cache.

pub mod manager;
pub mod types;

pub use manager::CacheStore;
pub use types::{AtomicCacheStats, CacheConfig, CacheEntry, CacheStats, MAX_TTL};
