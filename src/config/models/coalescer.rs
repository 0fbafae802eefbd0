//! Request coalescer configuration

use super::*;
use crate::core::coalescer::CoalescerConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Request coalescer settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoalescerSettings {
    /// Quiet period after the last arrival before a flush
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    /// Upper bound on how long the first request of a window may wait.
    /// `null` disables the cap.
    #[serde(default = "default_max_coalesce_delay_ms")]
    pub max_delay_ms: Option<u64>,
    /// Per resource type fetch timeout; unset means no timeout
    #[serde(default)]
    pub fetch_timeout_ms: Option<u64>,
    /// TTL for fetched values offered to the cache; unset uses the cache default
    #[serde(default)]
    pub cache_ttl_ms: Option<u64>,
    /// Offer successful fetches to the cache store
    #[serde(default = "default_true")]
    pub cache_results: bool,
}

impl Default for CoalescerSettings {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            max_delay_ms: default_max_coalesce_delay_ms(),
            fetch_timeout_ms: None,
            cache_ttl_ms: None,
            cache_results: true,
        }
    }
}

impl From<&CoalescerSettings> for CoalescerConfig {
    fn from(settings: &CoalescerSettings) -> Self {
        Self {
            debounce_window: Duration::from_millis(settings.debounce_ms),
            max_delay: settings.max_delay_ms.map(Duration::from_millis),
            fetch_timeout: settings.fetch_timeout_ms.map(Duration::from_millis),
            cache_ttl: settings.cache_ttl_ms.map(Duration::from_millis),
            cache_results: settings.cache_results,
        }
    }
}
