//! Request coalescer types

use crate::utils::error::{BackofficeError, Result};
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Backing fetch primitive for one resource type
///
/// Any parameters the fetch needs are bound into the implementation.
#[async_trait]
pub trait ResourceFetcher<V>: Send + Sync {
    /// Fetch the current value of `resource_type` from the backing store
    async fn fetch(&self, resource_type: &str) -> Result<V>;
}

/// Failure delivered to every waiter of an affected resource type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoalescerError {
    /// The backing fetch failed
    #[error("fetch of '{resource_type}' failed: {message}")]
    Fetch {
        resource_type: String,
        message: String,
    },

    /// The backing fetch did not finish in time
    #[error("fetch of '{resource_type}' timed out after {timeout:?}")]
    Timeout {
        resource_type: String,
        timeout: Duration,
    },

    /// The flush carrying this request went away before settling it
    #[error("request for '{0}' was dropped before it was settled")]
    Dropped(String),
}

impl CoalescerError {
    /// Resource type the failure belongs to
    pub fn resource_type(&self) -> &str {
        match self {
            Self::Fetch { resource_type, .. } | Self::Timeout { resource_type, .. } => {
                resource_type
            }
            Self::Dropped(resource_type) => resource_type,
        }
    }
}

impl From<CoalescerError> for BackofficeError {
    fn from(err: CoalescerError) -> Self {
        match err {
            CoalescerError::Timeout { .. } => BackofficeError::Timeout(err.to_string()),
            other => BackofficeError::Fetch(other.to_string()),
        }
    }
}

/// Outcome fanned out to the waiters of one resource type
pub type Outcome<V> = std::result::Result<V, CoalescerError>;

/// Request coalescer configuration
#[derive(Debug, Clone)]
pub struct CoalescerConfig {
    /// Quiet period after the last arrival before the queue is flushed
    pub debounce_window: Duration,
    /// Longest the first request of a window waits for its flush; `None` lets a
    /// steady stream of arrivals postpone the flush indefinitely
    pub max_delay: Option<Duration>,
    /// Per resource type fetch timeout
    pub fetch_timeout: Option<Duration>,
    /// TTL for fetched values offered to the cache; `None` uses the cache default
    pub cache_ttl: Option<Duration>,
    /// Offer successful fetches to the attached cache store
    pub cache_results: bool,
}

impl Default for CoalescerConfig {
    fn default() -> Self {
        Self {
            debounce_window: Duration::from_millis(50),
            max_delay: Some(Duration::from_millis(500)),
            fetch_timeout: None,
            cache_ttl: None,
            cache_results: true,
        }
    }
}

impl CoalescerConfig {
    /// Create a new config
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the debounce window
    pub fn with_debounce_window(mut self, window: Duration) -> Self {
        self.debounce_window = window;
        self
    }

    /// Set or clear the cap on total coalescing delay
    pub fn with_max_delay(mut self, max_delay: Option<Duration>) -> Self {
        self.max_delay = max_delay;
        self
    }

    /// Set or clear the per-type fetch timeout
    pub fn with_fetch_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.fetch_timeout = timeout;
        self
    }
}

/// Coalescer counters snapshot
#[derive(Debug, Default, Clone, PartialEq)]
pub struct CoalescerStats {
    /// Calls to `enqueue`
    pub requests: u64,
    /// Non-empty flushes
    pub flushes: u64,
    /// Backing fetches issued
    pub fetches: u64,
    /// Backing fetches that failed or timed out
    pub failures: u64,
}
