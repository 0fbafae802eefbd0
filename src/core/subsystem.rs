//! Batch/Cache subsystem facade
//!
//! Wires one cache store, a request coalescer writing into it, and a batch
//! executor from a single [`Config`].

use crate::config::Config;
use crate::core::batch::{BatchExecutor, BatchOptions, BatchSummary};
use crate::core::cache_manager::CacheStore;
use crate::core::coalescer::{RequestCoalescer, ResourceFetcher};
use crate::utils::error::Result;
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Cache store, coalescer and batch executor sharing one configuration
pub struct BatchCacheSubsystem<V> {
    cache: Arc<CacheStore<V>>,
    coalescer: RequestCoalescer<V>,
    executor: BatchExecutor,
}

impl<V> BatchCacheSubsystem<V>
where
    V: Clone + Default + Send + Sync + 'static,
{
    /// Build every component from `config`
    pub fn new(config: &Config, fetcher: Arc<dyn ResourceFetcher<V>>) -> Result<Self> {
        config.validate()?;

        let cache = Arc::new(CacheStore::new((&config.cache).into()));
        let coalescer =
            RequestCoalescer::with_cache(fetcher, cache.clone(), (&config.coalescer).into());
        let executor = BatchExecutor::new((&config.batch).into());

        info!("Batch/Cache subsystem initialized");
        Ok(Self {
            cache,
            coalescer,
            executor,
        })
    }

    /// Startup health check
    ///
    /// Clears the whole cache when it is unhealthy and returns whether it did.
    pub fn bootstrap(&self) -> bool {
        if self.cache.is_healthy() {
            debug!("Cache healthy at bootstrap");
            return false;
        }

        warn!("Cache unhealthy at bootstrap, clearing all entries");
        self.cache.clear_all();
        true
    }

    /// Fresh cached value, or a coalesced fetch on a miss
    pub async fn get_or_fetch(&self, resource_type: &str) -> Result<V> {
        if let Some(value) = self.cache.get(resource_type) {
            return Ok(value);
        }
        self.coalescer
            .enqueue(resource_type)
            .await
            .map_err(Into::into)
    }

    /// Run a batch and fold its summary into the cache entry `key`
    ///
    /// `merge` receives the current fresh value (or `V::default()`) and runs
    /// inside the entry's update section.
    pub async fn run_and_store<T, R, F, Fut, M>(
        &self,
        key: &str,
        items: Vec<T>,
        operation: F,
        options: BatchOptions<T>,
        merge: M,
    ) -> Result<BatchSummary<T, R>>
    where
        T: Clone + Send + 'static,
        R: Send + 'static,
        F: Fn(T, usize) -> Fut,
        Fut: Future<Output = Result<R>>,
        M: FnOnce(V, &BatchSummary<T, R>) -> V,
    {
        let summary = self.executor.run(items, operation, options).await?;
        self.cache
            .update(key, |current| merge(current, &summary))
            .await;
        Ok(summary)
    }

    pub fn cache(&self) -> &Arc<CacheStore<V>> {
        &self.cache
    }

    pub fn coalescer(&self) -> &RequestCoalescer<V> {
        &self.coalescer
    }

    pub fn executor(&self) -> &BatchExecutor {
        &self.executor
    }
}
