//! Validators for the subsystem settings

use super::trait_def::Validate;
use crate::config::models::*;
use tracing_subscriber::EnvFilter;

impl Validate for CacheSettings {
    fn validate(&self) -> Result<(), String> {
        if self.default_ttl_ms == 0 {
            return Err("Cache default TTL must be greater than 0".to_string());
        }

        if self.max_entries == 0 {
            return Err("Cache max entries must be greater than 0".to_string());
        }

        Ok(())
    }
}

impl Validate for CoalescerSettings {
    fn validate(&self) -> Result<(), String> {
        if let Some(max_delay) = self.max_delay_ms {
            if max_delay < self.debounce_ms {
                return Err(format!(
                    "Coalescer max delay ({}ms) must not be shorter than the debounce window ({}ms)",
                    max_delay, self.debounce_ms
                ));
            }
        }

        if self.fetch_timeout_ms == Some(0) {
            return Err("Coalescer fetch timeout must be greater than 0".to_string());
        }

        if self.cache_ttl_ms == Some(0) {
            return Err("Coalescer cache TTL must be greater than 0".to_string());
        }

        Ok(())
    }
}

impl Validate for BatchSettings {
    fn validate(&self) -> Result<(), String> {
        if self.concurrency == 0 {
            return Err("Batch concurrency must be a positive integer".to_string());
        }

        Ok(())
    }
}

impl Validate for LoggingSettings {
    fn validate(&self) -> Result<(), String> {
        if self.level.trim().is_empty() {
            return Err("Log level must not be empty".to_string());
        }

        EnvFilter::try_new(&self.level)
            .map(|_| ())
            .map_err(|e| format!("Invalid log filter '{}': {}", self.level, e))
    }
}
