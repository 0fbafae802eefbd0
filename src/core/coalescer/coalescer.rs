//! Debounced request coalescer

use super::types::{CoalescerConfig, CoalescerError, CoalescerStats, Outcome, ResourceFetcher};
use crate::core::cache_manager::CacheStore;
use futures::future::join_all;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, warn};

type Waiters<V> = Vec<oneshot::Sender<Outcome<V>>>;

/// Requests waiting for the current window to close
struct PendingQueue<V> {
    waiters: HashMap<String, Waiters<V>>,
    /// First arrival of the current window
    opened_at: Option<Instant>,
    /// Scheduled flush for the current window
    timer: Option<JoinHandle<()>>,
    /// Bumped on every reschedule; a timer only flushes if it is still current
    generation: u64,
}

impl<V> Default for PendingQueue<V> {
    fn default() -> Self {
        Self {
            waiters: HashMap::new(),
            opened_at: None,
            timer: None,
            generation: 0,
        }
    }
}

#[derive(Default)]
struct Counters {
    requests: AtomicU64,
    flushes: AtomicU64,
    fetches: AtomicU64,
    failures: AtomicU64,
}

struct Inner<V> {
    fetcher: Arc<dyn ResourceFetcher<V>>,
    cache: Option<Arc<CacheStore<V>>>,
    config: CoalescerConfig,
    queue: Mutex<PendingQueue<V>>,
    counters: Counters,
}

/// Collapses near-simultaneous requests for the same resource type into one fetch
///
/// Cloning is cheap; clones share the same queue.
pub struct RequestCoalescer<V> {
    inner: Arc<Inner<V>>,
}

impl<V> Clone for RequestCoalescer<V> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<V> RequestCoalescer<V>
where
    V: Clone + Send + Sync + 'static,
{
    /// Create a coalescer that does not write fetched values anywhere
    pub fn new(fetcher: Arc<dyn ResourceFetcher<V>>, config: CoalescerConfig) -> Self {
        Self::build(fetcher, None, config)
    }

    /// Create a coalescer that offers successful fetches to `cache`
    pub fn with_cache(
        fetcher: Arc<dyn ResourceFetcher<V>>,
        cache: Arc<CacheStore<V>>,
        config: CoalescerConfig,
    ) -> Self {
        Self::build(fetcher, Some(cache), config)
    }

    fn build(
        fetcher: Arc<dyn ResourceFetcher<V>>,
        cache: Option<Arc<CacheStore<V>>>,
        config: CoalescerConfig,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                fetcher,
                cache,
                config,
                queue: Mutex::new(PendingQueue::default()),
                counters: Counters::default(),
            }),
        }
    }

    /// Wait for the value of `resource_type`, sharing the fetch with every
    /// other request for the same type in the current window
    pub async fn enqueue(&self, resource_type: &str) -> Outcome<V> {
        let (tx, rx) = oneshot::channel();
        self.inner.counters.requests.fetch_add(1, Ordering::Relaxed);

        {
            let mut queue = self.inner.queue.lock();
            let now = Instant::now();
            let opened_at = *queue.opened_at.get_or_insert(now);

            let waiters = queue.waiters.entry(resource_type.to_string()).or_default();
            if !waiters.is_empty() {
                debug!("Joining pending fetch for resource type: {}", resource_type);
            }
            waiters.push(tx);

            self.reschedule(&mut queue, now, opened_at);
        }

        rx.await
            .unwrap_or_else(|_| Err(CoalescerError::Dropped(resource_type.to_string())))
    }

    /// Flush the queue immediately instead of waiting for the window to close
    pub async fn flush_now(&self) {
        self.inner.flush(None).await;
    }

    /// Number of distinct resource types waiting in the current window
    pub fn pending_types(&self) -> usize {
        self.inner.queue.lock().waiters.len()
    }

    /// Counters snapshot
    pub fn stats(&self) -> CoalescerStats {
        let counters = &self.inner.counters;
        CoalescerStats {
            requests: counters.requests.load(Ordering::Relaxed),
            flushes: counters.flushes.load(Ordering::Relaxed),
            fetches: counters.fetches.load(Ordering::Relaxed),
            failures: counters.failures.load(Ordering::Relaxed),
        }
    }

    /// Get current configuration
    pub fn config(&self) -> &CoalescerConfig {
        &self.inner.config
    }

    /// Cancel the scheduled flush and schedule a new one
    ///
    /// The flush fires one debounce window after `now`, but never later than
    /// `max_delay` after the window opened.
    fn reschedule(&self, queue: &mut PendingQueue<V>, now: Instant, opened_at: Instant) {
        if let Some(timer) = queue.timer.take() {
            timer.abort();
        }
        queue.generation = queue.generation.wrapping_add(1);

        let config = &self.inner.config;
        let mut deadline = now + config.debounce_window;
        if let Some(max_delay) = config.max_delay {
            deadline = deadline.min(opened_at + max_delay);
        }

        let inner = self.inner.clone();
        let generation = queue.generation;
        queue.timer = Some(tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            inner.flush(Some(generation)).await;
        }));
    }
}

impl<V> Inner<V>
where
    V: Clone + Send + Sync + 'static,
{
    /// Take the whole queue and settle it
    ///
    /// A timer passes its generation and gives up if it has been superseded.
    async fn flush(&self, generation: Option<u64>) {
        let batch = {
            let mut queue = self.queue.lock();
            match generation {
                Some(generation) if generation != queue.generation => return,
                // Called from the timer itself: just forget the handle
                Some(_) => queue.timer = None,
                None => {
                    if let Some(timer) = queue.timer.take() {
                        timer.abort();
                    }
                    queue.generation = queue.generation.wrapping_add(1);
                }
            }
            queue.opened_at = None;
            std::mem::take(&mut queue.waiters)
        };

        if batch.is_empty() {
            return;
        }

        self.counters.flushes.fetch_add(1, Ordering::Relaxed);
        debug!("Flushing {} coalesced resource types", batch.len());

        join_all(
            batch
                .into_iter()
                .map(|(resource_type, waiters)| self.settle(resource_type, waiters)),
        )
        .await;
    }

    async fn settle(&self, resource_type: String, waiters: Waiters<V>) {
        let outcome = self.fetch_one(&resource_type).await;

        debug!(
            "Settling {} waiters for resource type: {}",
            waiters.len(),
            resource_type
        );
        for waiter in waiters {
            // A waiter that gave up no longer needs the outcome
            let _ = waiter.send(outcome.clone());
        }

        if let (Ok(value), Some(cache)) = (&outcome, &self.cache) {
            if self.config.cache_results {
                match self.config.cache_ttl {
                    Some(ttl) => cache.set(&resource_type, value.clone(), ttl),
                    None => cache.set_default(&resource_type, value.clone()),
                }
            }
        }
    }

    async fn fetch_one(&self, resource_type: &str) -> Outcome<V> {
        self.counters.fetches.fetch_add(1, Ordering::Relaxed);
        let fetch = self.fetcher.fetch(resource_type);

        let result = match self.config.fetch_timeout {
            Some(timeout) => match tokio::time::timeout(timeout, fetch).await {
                Ok(result) => result,
                Err(_) => {
                    self.counters.failures.fetch_add(1, Ordering::Relaxed);
                    warn!(
                        "Fetch of resource type {} timed out after {:?}",
                        resource_type, timeout
                    );
                    return Err(CoalescerError::Timeout {
                        resource_type: resource_type.to_string(),
                        timeout,
                    });
                }
            },
            None => fetch.await,
        };

        result.map_err(|e| {
            self.counters.failures.fetch_add(1, Ordering::Relaxed);
            warn!("Fetch of resource type {} failed: {}", resource_type, e);
            CoalescerError::Fetch {
                resource_type: resource_type.to_string(),
                message: e.to_string(),
            }
        })
    }
}
