//! Batch executor types and data structures

use crate::utils::error::recovery::RetryConfig;
use crate::utils::error::{BackofficeError, Result};
use crate::utils::generate_operation_id;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// Configuration for batch execution
#[derive(Debug, Clone, PartialEq)]
pub struct BatchConfig {
    /// Items dispatched together in one group (default: 5)
    pub concurrency: usize,
    /// Retries per item after the first attempt (default: 2)
    pub retry_attempts: u32,
    /// Linear backoff unit; retry `k` waits `retry_delay * k` (default: 1s)
    pub retry_delay: Duration,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            concurrency: 5,
            retry_attempts: 2,
            retry_delay: Duration::from_millis(1000),
        }
    }
}

impl BatchConfig {
    /// Create a new config
    pub fn new() -> Self {
        Self::default()
    }

    /// Set group size
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// Set retries per item
    pub fn with_retry_attempts(mut self, retry_attempts: u32) -> Self {
        self.retry_attempts = retry_attempts;
        self
    }

    /// Set backoff unit
    pub fn with_retry_delay(mut self, retry_delay: Duration) -> Self {
        self.retry_delay = retry_delay;
        self
    }

    /// Reject configurations that cannot run
    pub fn validate(&self) -> Result<()> {
        if self.concurrency == 0 {
            return Err(BackofficeError::validation(
                "Batch concurrency must be greater than 0",
            ));
        }
        Ok(())
    }

    /// Per-item retry policy configuration
    pub fn retry_config(&self) -> RetryConfig {
        RetryConfig::linear(self.retry_attempts, self.retry_delay)
    }
}

/// Called with a progress snapshot after every item settles
pub type ProgressCallback = Arc<dyn Fn(&BatchProgress) + Send + Sync>;

/// Called once for every item that failed permanently
pub type ErrorCallback<T> = Arc<dyn Fn(&BatchItemError<T>) + Send + Sync>;

/// Per-run options: configuration plus observers
pub struct BatchOptions<T> {
    pub config: BatchConfig,
    pub on_progress: Option<ProgressCallback>,
    pub on_error: Option<ErrorCallback<T>>,
}

impl<T> BatchOptions<T> {
    pub fn new(config: BatchConfig) -> Self {
        Self {
            config,
            on_progress: None,
            on_error: None,
        }
    }

    /// Observe progress after every settled item
    pub fn on_progress<F>(mut self, f: F) -> Self
    where
        F: Fn(&BatchProgress) + Send + Sync + 'static,
    {
        self.on_progress = Some(Arc::new(f));
        self
    }

    /// Observe permanent item failures
    pub fn on_error<F>(mut self, f: F) -> Self
    where
        F: Fn(&BatchItemError<T>) + Send + Sync + 'static,
    {
        self.on_error = Some(Arc::new(f));
        self
    }
}

impl<T> Default for BatchOptions<T> {
    fn default() -> Self {
        Self::new(BatchConfig::default())
    }
}

impl<T> Clone for BatchOptions<T> {
    fn clone(&self) -> Self {
        Self {
            config: self.config.clone(),
            on_progress: self.on_progress.clone(),
            on_error: self.on_error.clone(),
        }
    }
}

/// Point-in-time view of a batch operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchProgress {
    pub id: String,
    pub total: usize,
    pub completed: usize,
    pub failed: usize,
    pub cancelled: bool,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
}

impl BatchProgress {
    /// Items that have either completed or failed
    pub fn settled(&self) -> usize {
        self.completed + self.failed
    }

    /// Percentage of items settled, 100 for an empty batch
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            100.0
        } else {
            self.settled() as f64 / self.total as f64 * 100.0
        }
    }
}

/// Successful item
#[derive(Debug, Clone)]
pub struct BatchItemResult<R> {
    /// Index of the item in the original batch
    pub index: usize,
    pub value: R,
    /// Attempts made, including the successful one
    pub attempts: u32,
    /// Time spent on this item, retries included
    pub duration: Duration,
}

/// Item that failed after exhausting its retries
#[derive(Debug)]
pub struct BatchItemError<T> {
    /// Index of the item in the original batch
    pub index: usize,
    pub item: T,
    /// Error of the last attempt
    pub error: BackofficeError,
    pub attempts: u32,
}

/// Outcome of a batch run
///
/// `results` and `errors` are sorted by original item index.
#[derive(Debug)]
pub struct BatchSummary<T, R> {
    pub id: String,
    pub total: usize,
    pub completed: usize,
    pub failed: usize,
    pub results: Vec<BatchItemResult<R>>,
    pub errors: Vec<BatchItemError<T>>,
    pub duration: Duration,
    pub cancelled: bool,
}

impl<T, R> BatchSummary<T, R> {
    /// Fraction of items that completed, 1.0 for an empty batch
    pub fn success_rate(&self) -> f64 {
        if self.total == 0 {
            1.0
        } else {
            self.completed as f64 / self.total as f64
        }
    }

    /// Whether every item settled
    pub fn is_complete(&self) -> bool {
        self.completed + self.failed == self.total
    }

    /// Successful values in item order
    pub fn values(&self) -> Vec<&R> {
        self.results.iter().map(|r| &r.value).collect()
    }
}

/// Live state of one batch run
#[derive(Debug)]
pub struct BatchOperation<T, R> {
    pub(crate) id: String,
    pub(crate) total: usize,
    pub(crate) completed: usize,
    pub(crate) failed: usize,
    pub(crate) results: Vec<BatchItemResult<R>>,
    pub(crate) errors: Vec<BatchItemError<T>>,
    pub(crate) started_at: DateTime<Utc>,
    pub(crate) ended_at: Option<DateTime<Utc>>,
    pub(crate) cancelled: bool,
}

impl<T, R> BatchOperation<T, R> {
    /// Start tracking a run of `total` items under a fresh id
    pub fn new(total: usize) -> Self {
        Self {
            id: generate_operation_id(),
            total,
            completed: 0,
            failed: 0,
            results: Vec::with_capacity(total),
            errors: Vec::new(),
            started_at: Utc::now(),
            ended_at: None,
            cancelled: false,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    pub(crate) fn record_success(&mut self, result: BatchItemResult<R>) {
        self.completed += 1;
        self.results.push(result);
    }

    /// Count a permanent failure; its details follow through `attach_error`
    pub(crate) fn record_failure(&mut self) {
        self.failed += 1;
    }

    pub(crate) fn attach_error(&mut self, error: BatchItemError<T>) {
        self.errors.push(error);
    }

    pub fn progress(&self) -> BatchProgress {
        BatchProgress {
            id: self.id.clone(),
            total: self.total,
            completed: self.completed,
            failed: self.failed,
            cancelled: self.cancelled,
            started_at: self.started_at,
            ended_at: self.ended_at,
        }
    }

    /// Stamp the end time and hand the collected outcomes over
    pub(crate) fn finish(&mut self, duration: Duration) -> BatchSummary<T, R> {
        self.ended_at = Some(Utc::now());

        let mut results = std::mem::take(&mut self.results);
        results.sort_by_key(|r| r.index);
        let mut errors = std::mem::take(&mut self.errors);
        errors.sort_by_key(|e| e.index);

        BatchSummary {
            id: self.id.clone(),
            total: self.total,
            completed: self.completed,
            failed: self.failed,
            results,
            errors,
            duration,
            cancelled: self.cancelled,
        }
    }
}
