//! Cache type definitions
//!
//! This module contains the configuration, entry and statistics types for the
//! cache store.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::time::Instant;

/// Cache configuration
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL used when a caller does not supply one
    pub default_ttl: Duration,
    /// Sanity ceiling for the number of entries
    pub max_entries: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            default_ttl: Duration::from_secs(300),
            max_entries: 10_000,
        }
    }
}

/// Longest TTL an entry is stored with
///
/// Longer TTLs, up to `Duration::MAX`, are clamped so `stored_at + ttl` stays
/// representable.
pub const MAX_TTL: Duration = Duration::from_secs(100 * 365 * 24 * 60 * 60);

/// Cache entry with metadata
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// Key the entry is stored under
    pub key: String,
    /// The cached value
    pub value: V,
    /// When the entry was last written
    pub stored_at: Instant,
    /// How long the entry stays fresh after `stored_at`
    pub ttl: Duration,
}

impl<V> CacheEntry<V> {
    /// Create a new cache entry stored now
    pub fn new(key: impl Into<String>, value: V, ttl: Duration) -> Self {
        Self {
            key: key.into(),
            value,
            stored_at: Instant::now(),
            ttl: ttl.min(MAX_TTL),
        }
    }

    /// Expiry instant, `None` if `stored_at + ttl` is not representable
    pub fn expires_at(&self) -> Option<Instant> {
        self.stored_at.checked_add(self.ttl)
    }

    /// Whether the entry may still be served at `now`
    pub fn is_fresh_at(&self, now: Instant) -> bool {
        match self.expires_at() {
            Some(expires_at) => now < expires_at,
            None => false,
        }
    }

    /// Timestamps a well-formed entry can never have
    pub fn has_corrupted_timestamps(&self, now: Instant) -> bool {
        self.stored_at > now || self.expires_at().is_none()
    }
}

/// Atomic cache statistics for lock-free hot path updates
#[derive(Debug, Default)]
pub struct AtomicCacheStats {
    /// Fresh reads
    pub hits: AtomicU64,
    /// Reads that found nothing or a stale entry
    pub misses: AtomicU64,
    /// Stale entries removed on read or by a sweep
    pub evictions: AtomicU64,
    /// Completed read-modify-write updates
    pub updates: AtomicU64,
}

/// Cache statistics snapshot (returned to callers)
#[derive(Debug, Default, Clone, PartialEq)]
pub struct CacheStats {
    /// Fresh reads
    pub hits: u64,
    /// Reads that found nothing or a stale entry
    pub misses: u64,
    /// Stale entries removed on read or by a sweep
    pub evictions: u64,
    /// Completed read-modify-write updates
    pub updates: u64,
}

impl CacheStats {
    /// Calculate hit rate
    pub fn hit_rate(&self) -> f64 {
        let total_requests = self.hits + self.misses;

        if total_requests == 0 {
            0.0
        } else {
            self.hits as f64 / total_requests as f64
        }
    }
}

impl AtomicCacheStats {
    /// Create a snapshot of current stats
    pub fn snapshot(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
            updates: self.updates.load(Ordering::Relaxed),
        }
    }
}
