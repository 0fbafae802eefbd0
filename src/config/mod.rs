//! Configuration management for the Batch/Cache subsystem
//!
//! This module handles loading, validation, and management of all subsystem configuration.

pub mod models;
pub mod validation;

pub use models::*;
pub use validation::Validate;

use crate::utils::error::{BackofficeError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info};

/// Prefix shared by every environment variable the crate reads
pub const ENV_PREFIX: &str = "BACKOFFICE_";

/// Main configuration struct
///
/// Unknown keys in configuration files are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Cache store settings
    #[serde(default)]
    pub cache: CacheSettings,
    /// Request coalescer settings
    #[serde(default)]
    pub coalescer: CoalescerSettings,
    /// Batch executor defaults
    #[serde(default)]
    pub batch: BatchSettings,
    /// Logging settings
    #[serde(default)]
    pub logging: LoggingSettings,
}

impl Config {
    /// Load configuration from a YAML file
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading configuration from: {:?}", path);

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| BackofficeError::Config(format!("Failed to read config file: {}", e)))?;

        let config = Self::from_yaml_str(&content)?;

        debug!("Configuration loaded successfully");
        Ok(config)
    }

    /// Parse and validate configuration from YAML text
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(content)
            .map_err(|e| BackofficeError::Config(format!("Failed to parse config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");
        Self::from_env_vars(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup, starting from defaults
    pub fn from_env_vars<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |suffix: &str| lookup(&format!("{}{}", ENV_PREFIX, suffix));
        let mut config = Self::default();

        if let Some(v) = var("CACHE_TTL_MS") {
            config.cache.default_ttl_ms = parse_var("CACHE_TTL_MS", &v)?;
        }
        if let Some(v) = var("CACHE_MAX_ENTRIES") {
            config.cache.max_entries = parse_var("CACHE_MAX_ENTRIES", &v)?;
        }

        if let Some(v) = var("DEBOUNCE_MS") {
            config.coalescer.debounce_ms = parse_var("DEBOUNCE_MS", &v)?;
        }
        if let Some(v) = var("MAX_COALESCE_DELAY_MS") {
            config.coalescer.max_delay_ms = parse_optional_var("MAX_COALESCE_DELAY_MS", &v)?;
        }
        if let Some(v) = var("FETCH_TIMEOUT_MS") {
            config.coalescer.fetch_timeout_ms = parse_optional_var("FETCH_TIMEOUT_MS", &v)?;
        }
        if let Some(v) = var("COALESCER_CACHE_RESULTS") {
            config.coalescer.cache_results = parse_var("COALESCER_CACHE_RESULTS", &v)?;
        }

        if let Some(v) = var("BATCH_CONCURRENCY") {
            config.batch.concurrency = parse_var("BATCH_CONCURRENCY", &v)?;
        }
        if let Some(v) = var("BATCH_RETRY_ATTEMPTS") {
            config.batch.retry_attempts = parse_var("BATCH_RETRY_ATTEMPTS", &v)?;
        }
        if let Some(v) = var("BATCH_RETRY_DELAY_MS") {
            config.batch.retry_delay_ms = parse_var("BATCH_RETRY_DELAY_MS", &v)?;
        }

        if let Some(v) = var("LOG_LEVEL") {
            config.logging.level = v;
        }
        if let Some(v) = var("LOG_JSON") {
            config.logging.json = parse_var("LOG_JSON", &v)?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<()> {
        debug!("Validating configuration");

        self.cache
            .validate()
            .map_err(|e| BackofficeError::Config(format!("Cache config error: {}", e)))?;

        self.coalescer
            .validate()
            .map_err(|e| BackofficeError::Config(format!("Coalescer config error: {}", e)))?;

        self.batch
            .validate()
            .map_err(|e| BackofficeError::Config(format!("Batch config error: {}", e)))?;

        self.logging
            .validate()
            .map_err(|e| BackofficeError::Config(format!("Logging config error: {}", e)))?;

        Ok(())
    }
}

fn parse_var<T>(name: &str, value: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e| {
        BackofficeError::Config(format!("Invalid {}{}: {}", ENV_PREFIX, name, e))
    })
}

/// `none`, `off` or an empty value clear the setting
fn parse_optional_var(name: &str, value: &str) -> Result<Option<u64>> {
    match value.trim().to_ascii_lowercase().as_str() {
        "" | "none" | "off" => Ok(None),
        _ => parse_var(name, value).map(Some),
    }
}
