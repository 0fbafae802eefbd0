//! Tag-based routing of batches to registered handlers

use super::executor::BatchExecutor;
use super::types::{BatchOptions, BatchSummary};
use crate::utils::error::{BackofficeError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use tracing::debug;

/// Per-item work for one kind of batch
#[async_trait]
pub trait BatchHandler<T, R>: Send + Sync
where
    T: Send + 'static,
    R: Send + 'static,
{
    async fn handle(&self, item: T, index: usize) -> Result<R>;
}

/// Adapts an async closure into a [`BatchHandler`]
pub struct FnHandler<F> {
    f: F,
}

impl<F> FnHandler<F> {
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

#[async_trait]
impl<T, R, F, Fut> BatchHandler<T, R> for FnHandler<F>
where
    T: Send + 'static,
    R: Send + 'static,
    F: Fn(T, usize) -> Fut + Send + Sync,
    Fut: Future<Output = Result<R>> + Send,
{
    async fn handle(&self, item: T, index: usize) -> Result<R> {
        (self.f)(item, index).await
    }
}

/// Routes tagged batches to the handler registered for the tag
///
/// Handlers are registered once at startup.
pub struct OperationDispatcher<T, R>
where
    T: Send + 'static,
    R: Send + 'static,
{
    executor: BatchExecutor,
    handlers: HashMap<String, Arc<dyn BatchHandler<T, R>>>,
}

impl<T, R> OperationDispatcher<T, R>
where
    T: Clone + Send + 'static,
    R: Send + 'static,
{
    pub fn new(executor: BatchExecutor) -> Self {
        Self {
            executor,
            handlers: HashMap::new(),
        }
    }

    /// Register a handler for a tag, replacing any previous one
    pub fn register(
        &mut self,
        tag: impl Into<String>,
        handler: Arc<dyn BatchHandler<T, R>>,
    ) -> &mut Self {
        self.handlers.insert(tag.into(), handler);
        self
    }

    /// Register an async closure for a tag
    pub fn register_fn<F, Fut>(&mut self, tag: impl Into<String>, f: F) -> &mut Self
    where
        F: Fn(T, usize) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<R>> + Send + 'static,
    {
        self.register(tag, Arc::new(FnHandler::new(f)))
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.handlers.contains_key(tag)
    }

    /// Registered tags, sorted
    pub fn tags(&self) -> Vec<String> {
        let mut tags: Vec<String> = self.handlers.keys().cloned().collect();
        tags.sort();
        tags
    }

    pub fn executor(&self) -> &BatchExecutor {
        &self.executor
    }

    /// Run a batch through the handler registered for `tag`
    ///
    /// An unknown tag fails with [`BackofficeError::NotFound`] before any item runs.
    pub async fn run_tagged(
        &self,
        tag: &str,
        items: Vec<T>,
        options: BatchOptions<T>,
    ) -> Result<BatchSummary<T, R>> {
        let handler = self.handlers.get(tag).cloned().ok_or_else(|| {
            BackofficeError::not_found(format!("No batch handler registered for tag '{}'", tag))
        })?;

        debug!("Dispatching {} items to batch handler '{}'", items.len(), tag);
        self.executor
            .run(
                items,
                move |item, index| {
                    let handler = handler.clone();
                    async move { handler.handle(item, index).await }
                },
                options,
            )
            .await
    }
}
