//! Configuration data models
//!
//! This module defines all configuration structures used throughout the crate.
//! Durations are expressed in milliseconds so they read naturally in YAML and
//! environment variables; each model converts into its runtime counterpart.

pub mod batch;
pub mod cache;
pub mod coalescer;
pub mod logging;

// Re-export all configuration types
pub use batch::*;
pub use cache::*;
pub use coalescer::*;
pub use logging::*;

/// Default cache TTL in milliseconds (5 minutes)
pub fn default_cache_ttl_ms() -> u64 {
    300_000
}

/// Default cache sanity ceiling
pub fn default_cache_max_entries() -> usize {
    10_000
}

/// Default debounce window in milliseconds
pub fn default_debounce_ms() -> u64 {
    50
}

/// Default cap on total coalescing delay in milliseconds
pub fn default_max_coalesce_delay_ms() -> Option<u64> {
    Some(500)
}

/// Default batch concurrency
pub fn default_concurrency() -> usize {
    5
}

/// Default number of retries per batch item
pub fn default_retry_attempts() -> u32 {
    2
}

/// Default linear backoff unit in milliseconds
pub fn default_retry_delay_ms() -> u64 {
    1000
}

/// Default log level
pub fn default_log_level() -> String {
    "info".to_string()
}

pub(crate) fn default_true() -> bool {
    true
}
