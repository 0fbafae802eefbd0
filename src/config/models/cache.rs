//! Cache configuration

use super::*;
use crate::core::cache_manager::CacheConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Cache store settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheSettings {
    /// Process-wide default TTL in milliseconds
    #[serde(default = "default_cache_ttl_ms")]
    pub default_ttl_ms: u64,
    /// Entry count above which the store reports itself unhealthy
    #[serde(default = "default_cache_max_entries")]
    pub max_entries: usize,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            default_ttl_ms: default_cache_ttl_ms(),
            max_entries: default_cache_max_entries(),
        }
    }
}

impl From<&CacheSettings> for CacheConfig {
    fn from(settings: &CacheSettings) -> Self {
        Self {
            default_ttl: Duration::from_millis(settings.default_ttl_ms),
            max_entries: settings.max_entries,
        }
    }
}
