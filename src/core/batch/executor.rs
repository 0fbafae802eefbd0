//! Grouped batch execution with per-item retry
//!
//! Items are partitioned into groups of `concurrency` in input order. Groups run
//! one after another; the items of a group run concurrently on the caller's
//! task. A failed item never aborts the batch: it is retried with linear
//! backoff and, once its retries are exhausted, recorded as an error.

use super::registry::OperationRegistry;
use super::types::{
    BatchConfig, BatchItemError, BatchItemResult, BatchOperation, BatchOptions, BatchProgress,
    BatchSummary,
};
use crate::utils::error::Result;
use crate::utils::error::recovery::RetryPolicy;
use futures::future::join_all;
use parking_lot::Mutex;
use std::future::Future;
use std::sync::Arc;
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// Runs batches and tracks the ones in progress
///
/// Cloning is cheap; clones share the live-operations registry.
#[derive(Clone, Default)]
pub struct BatchExecutor {
    registry: Arc<OperationRegistry>,
    defaults: BatchConfig,
}

impl BatchExecutor {
    /// Create an executor whose [`options`](Self::options) start from `defaults`
    pub fn new(defaults: BatchConfig) -> Self {
        Self {
            registry: Arc::new(OperationRegistry::new()),
            defaults,
        }
    }

    /// Default configuration
    pub fn defaults(&self) -> &BatchConfig {
        &self.defaults
    }

    /// Options carrying the default configuration and no observers
    pub fn options<T>(&self) -> BatchOptions<T> {
        BatchOptions::new(self.defaults.clone())
    }

    /// Run `operation` over every item
    ///
    /// Returns an error only when the configuration is invalid, before any item
    /// runs. Item failures are reported in the summary.
    ///
    /// A permanently failed item is counted first, then `on_error` sees it, then
    /// `on_progress` gets the snapshot that includes it. Dropping the returned
    /// future unregisters the operation.
    ///
    /// # Example
    /// ```rust,ignore
    /// use backoffice_rs::core::batch::{BatchConfig, BatchExecutor, BatchOptions};
    ///
    /// let executor = BatchExecutor::default();
    /// let options = BatchOptions::new(BatchConfig::new().with_concurrency(10))
    ///     .on_progress(|p| println!("{}/{}", p.settled(), p.total));
    ///
    /// let summary = executor
    ///     .run(ticket_ids, |id, _| async move { close_ticket(id).await }, options)
    ///     .await?;
    /// ```
    pub async fn run<T, R, F, Fut>(
        &self,
        items: Vec<T>,
        operation: F,
        options: BatchOptions<T>,
    ) -> Result<BatchSummary<T, R>>
    where
        T: Clone + Send + 'static,
        R: Send + 'static,
        F: Fn(T, usize) -> Fut,
        Fut: Future<Output = Result<R>>,
    {
        options.config.validate()?;

        let concurrency = options.config.concurrency;
        let state = Arc::new(Mutex::new(BatchOperation::<T, R>::new(items.len())));
        let id = state.lock().id().to_string();
        let registration = self.registry.enroll(&id, state.clone());

        info!(
            "Starting batch operation {} with {} items (concurrency {})",
            id,
            items.len(),
            concurrency
        );

        let start = Instant::now();
        let policy = RetryPolicy::new(options.config.retry_config());

        for (group_index, group) in items.chunks(concurrency).enumerate() {
            if state.lock().is_cancelled() {
                info!(
                    "Batch operation {} cancelled before group {}",
                    id, group_index
                );
                break;
            }

            let offset = group_index * concurrency;
            debug!(
                "Batch operation {}: running group {} ({} items)",
                id,
                group_index,
                group.len()
            );

            join_all(group.iter().enumerate().map(|(position, item)| {
                Self::run_item(
                    &state,
                    &policy,
                    &operation,
                    &options,
                    offset + position,
                    item,
                )
            }))
            .await;
        }

        drop(registration);
        let summary = state.lock().finish(start.elapsed());

        info!(
            "Batch operation {} finished: {} completed, {} failed of {} in {:?}{}",
            summary.id,
            summary.completed,
            summary.failed,
            summary.total,
            summary.duration,
            if summary.cancelled { " (cancelled)" } else { "" }
        );

        Ok(summary)
    }

    async fn run_item<T, R, F, Fut>(
        state: &Mutex<BatchOperation<T, R>>,
        policy: &RetryPolicy,
        operation: &F,
        options: &BatchOptions<T>,
        index: usize,
        item: &T,
    ) where
        T: Clone,
        F: Fn(T, usize) -> Fut,
        Fut: Future<Output = Result<R>>,
    {
        let started = Instant::now();
        let (result, attempts) = policy
            .call_counted(|| operation(item.clone(), index))
            .await;

        let progress: BatchProgress = match result {
            Ok(value) => {
                let mut op = state.lock();
                op.record_success(BatchItemResult {
                    index,
                    value,
                    attempts,
                    duration: started.elapsed(),
                });
                op.progress()
            }
            Err(error) => {
                warn!(
                    "Batch item {} failed after {} attempts: {}",
                    index, attempts, error
                );
                let failure = BatchItemError {
                    index,
                    item: item.clone(),
                    error,
                    attempts,
                };
                let progress = {
                    let mut op = state.lock();
                    op.record_failure();
                    op.progress()
                };
                // Observers must not run under the state lock
                if let Some(on_error) = &options.on_error {
                    on_error(&failure);
                }
                state.lock().attach_error(failure);
                progress
            }
        };

        if let Some(on_progress) = &options.on_progress {
            on_progress(&progress);
        }
    }

    /// Request cooperative cancellation
    ///
    /// In-flight items finish; no further group starts. Returns `false` for an
    /// unknown or already finished id.
    pub fn cancel(&self, id: &str) -> bool {
        self.registry.cancel(id)
    }

    /// Progress of a live operation
    pub fn get_status(&self, id: &str) -> Option<BatchProgress> {
        self.registry.get_status(id)
    }

    /// Ids of every live operation
    pub fn active_operations(&self) -> Vec<String> {
        self.registry.ids()
    }
}

/// Convenience function for a one-off batch without keeping an executor
pub async fn batch_execute<T, R, F, Fut>(
    items: Vec<T>,
    operation: F,
    config: Option<BatchConfig>,
) -> Result<BatchSummary<T, R>>
where
    T: Clone + Send + 'static,
    R: Send + 'static,
    F: Fn(T, usize) -> Fut,
    Fut: Future<Output = Result<R>>,
{
    let executor = BatchExecutor::default();
    executor
        .run(items, operation, BatchOptions::new(config.unwrap_or_default()))
        .await
}
