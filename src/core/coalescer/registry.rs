//! Strategy map from resource type to backing fetcher

use super::types::ResourceFetcher;
use crate::utils::error::{BackofficeError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

/// Adapts an async closure into a [`ResourceFetcher`]
pub struct FnFetcher<F> {
    f: F,
}

impl<F> FnFetcher<F> {
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

#[async_trait]
impl<V, F, Fut> ResourceFetcher<V> for FnFetcher<F>
where
    V: Send + 'static,
    F: Fn(String) -> Fut + Send + Sync,
    Fut: Future<Output = Result<V>> + Send,
{
    async fn fetch(&self, resource_type: &str) -> Result<V> {
        (self.f)(resource_type.to_string()).await
    }
}

/// Routes each resource type to the fetcher registered for it
///
/// Registered once at startup; unknown resource types fail the fetch.
pub struct FetcherRegistry<V> {
    fetchers: HashMap<String, Arc<dyn ResourceFetcher<V>>>,
}

impl<V: Send + 'static> FetcherRegistry<V> {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            fetchers: HashMap::new(),
        }
    }

    /// Register a fetcher for a resource type, replacing any previous one
    pub fn register(
        &mut self,
        resource_type: impl Into<String>,
        fetcher: Arc<dyn ResourceFetcher<V>>,
    ) -> &mut Self {
        self.fetchers.insert(resource_type.into(), fetcher);
        self
    }

    /// Register an async closure for a resource type
    pub fn register_fn<F, Fut>(&mut self, resource_type: impl Into<String>, f: F) -> &mut Self
    where
        F: Fn(String) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<V>> + Send + 'static,
    {
        self.register(resource_type, Arc::new(FnFetcher::new(f)))
    }

    /// Whether a fetcher is registered for `resource_type`
    pub fn contains(&self, resource_type: &str) -> bool {
        self.fetchers.contains_key(resource_type)
    }

    /// Registered resource types
    pub fn resource_types(&self) -> Vec<String> {
        let mut types: Vec<String> = self.fetchers.keys().cloned().collect();
        types.sort();
        types
    }
}

impl<V: Send + 'static> Default for FetcherRegistry<V> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<V: Send + 'static> ResourceFetcher<V> for FetcherRegistry<V> {
    async fn fetch(&self, resource_type: &str) -> Result<V> {
        let fetcher = self.fetchers.get(resource_type).ok_or_else(|| {
            BackofficeError::NotFound(format!(
                "No fetcher registered for resource type '{}'",
                resource_type
            ))
        })?;
        fetcher.fetch(resource_type).await
    }
}
