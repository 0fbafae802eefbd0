//! Cache store implementation

use super::types::{AtomicCacheStats, CacheConfig, CacheEntry, CacheStats};
use dashmap::DashMap;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// Keyed in-memory store with per-entry TTL
///
/// Reads never return stale data. Concurrent [`update`](Self::update) calls on
/// the same key are serialized; different keys proceed independently.
pub struct CacheStore<V> {
    /// Stored entries
    pub(crate) entries: DashMap<String, CacheEntry<V>>,
    /// Per-key critical sections for read-modify-write
    pub(crate) update_locks: DashMap<String, Arc<Mutex<()>>>,
    /// Cache configuration
    config: CacheConfig,
    /// Cache statistics (lock-free atomics for hot path)
    stats: AtomicCacheStats,
}

impl<V: Clone> CacheStore<V> {
    /// Create a new cache store
    pub fn new(config: CacheConfig) -> Self {
        Self {
            entries: DashMap::new(),
            update_locks: DashMap::new(),
            config,
            stats: AtomicCacheStats::default(),
        }
    }

    /// Get a fresh value, evicting the entry if it has gone stale
    pub fn get(&self, key: &str) -> Option<V> {
        let now = Instant::now();

        let stale = match self.entries.get(key) {
            Some(entry) if entry.is_fresh_at(now) => {
                self.stats.hits.fetch_add(1, Ordering::Relaxed);
                return Some(entry.value.clone());
            }
            Some(_) => true,
            None => false,
        };

        if stale
            && self
                .entries
                .remove_if(key, |_, entry| !entry.is_fresh_at(now))
                .is_some()
        {
            self.stats.evictions.fetch_add(1, Ordering::Relaxed);
            debug!("Evicted stale cache entry: {}", key);
        }

        self.stats.misses.fetch_add(1, Ordering::Relaxed);
        None
    }

    /// Store a value with an explicit TTL, replacing any existing entry
    pub fn set(&self, key: &str, value: V, ttl: Duration) {
        if self.entries.len() >= self.config.max_entries && !self.entries.contains_key(key) {
            let purged = self.purge_expired();
            if self.entries.len() >= self.config.max_entries {
                warn!(
                    "Cache holds {} entries after purging {}, above the ceiling of {}",
                    self.entries.len(),
                    purged,
                    self.config.max_entries
                );
            }
        }

        self.entries
            .insert(key.to_string(), CacheEntry::new(key, value, ttl));
    }

    /// Store a value with the process-wide default TTL
    pub fn set_default(&self, key: &str, value: V) {
        self.set(key, value, self.config.default_ttl);
    }

    /// Read-modify-write a single entry
    ///
    /// The mutator receives the current fresh value, or `V::default()` when the
    /// key is absent or stale. The result keeps the original entry's expiry
    /// (the default TTL if there was no fresh entry) and is returned.
    pub async fn update<F>(&self, key: &str, mutator: F) -> V
    where
        V: Default,
        F: FnOnce(V) -> V,
    {
        self.update_async(key, |current| std::future::ready(mutator(current)))
            .await
    }

    /// Read-modify-write with an async mutator
    ///
    /// The per-key section is held across the mutator's suspension points, so
    /// other updates of `key` wait until this one has been written.
    pub async fn update_async<F, Fut>(&self, key: &str, mutator: F) -> V
    where
        V: Default,
        F: FnOnce(V) -> Fut,
        Fut: Future<Output = V>,
    {
        let lock = self.update_lock(key);
        let guard = lock.lock().await;

        let now = Instant::now();
        let (current, expires_at) = match self.entries.get(key) {
            Some(entry) if entry.is_fresh_at(now) => (entry.value.clone(), entry.expires_at()),
            _ => (V::default(), None),
        };

        let next = mutator(current).await;

        let written_at = Instant::now();
        let ttl = match expires_at {
            Some(expires_at) => expires_at.saturating_duration_since(written_at),
            None => self.config.default_ttl,
        };
        self.entries
            .insert(key.to_string(), CacheEntry::new(key, next.clone(), ttl));
        self.stats.updates.fetch_add(1, Ordering::Relaxed);

        drop(guard);
        drop(lock);
        // Nobody else holds or waits on the section once the map owns the only reference
        self.update_locks
            .remove_if(key, |_, section| Arc::strong_count(section) == 1);

        next
    }

    /// Remove one entry
    pub fn invalidate(&self, key: &str) {
        if self.entries.remove(key).is_some() {
            debug!("Invalidated cache entry: {}", key);
        }
    }

    /// Remove every entry
    pub fn clear_all(&self) {
        let count = self.entries.len();
        self.entries.clear();
        info!("Cleared {} cache entries", count);
    }

    /// Structural sanity check
    ///
    /// Unhealthy when the entry count exceeds the configured ceiling or any
    /// entry carries timestamps a live entry can never have.
    pub fn is_healthy(&self) -> bool {
        let count = self.entries.len();
        if count > self.config.max_entries {
            warn!(
                "Cache unhealthy: {} entries exceed the ceiling of {}",
                count, self.config.max_entries
            );
            return false;
        }

        let now = Instant::now();
        if let Some(entry) = self
            .entries
            .iter()
            .find(|entry| entry.has_corrupted_timestamps(now))
        {
            warn!("Cache unhealthy: entry {} has corrupted timestamps", entry.key());
            return false;
        }

        true
    }

    /// Remove every stale entry, returning how many were dropped
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.is_fresh_at(now));
        let removed = before.saturating_sub(self.entries.len());

        if removed > 0 {
            self.stats
                .evictions
                .fetch_add(removed as u64, Ordering::Relaxed);
            info!("Purged {} expired cache entries", removed);
        }
        removed
    }

    /// Number of stored entries, stale ones included until swept
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store holds no entries at all
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get cache statistics (lock-free snapshot)
    pub fn stats(&self) -> CacheStats {
        self.stats.snapshot()
    }

    /// Get current configuration
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    fn update_lock(&self, key: &str) -> Arc<Mutex<()>> {
        self.update_locks
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}

impl<V: Clone> Default for CacheStore<V> {
    fn default() -> Self {
        Self::new(CacheConfig::default())
    }
}
