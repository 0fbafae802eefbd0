//! Batch executor configuration

use super::*;
use crate::core::batch::BatchConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Batch executor defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchSettings {
    /// Items dispatched together in one group
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
    /// Retries per item after the first attempt
    #[serde(default = "default_retry_attempts")]
    pub retry_attempts: u32,
    /// Linear backoff unit in milliseconds
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
}

impl Default for BatchSettings {
    fn default() -> Self {
        Self {
            concurrency: default_concurrency(),
            retry_attempts: default_retry_attempts(),
            retry_delay_ms: default_retry_delay_ms(),
        }
    }
}

impl From<&BatchSettings> for BatchConfig {
    fn from(settings: &BatchSettings) -> Self {
        Self {
            concurrency: settings.concurrency,
            retry_attempts: settings.retry_attempts,
            retry_delay: Duration::from_millis(settings.retry_delay_ms),
        }
    }
}
