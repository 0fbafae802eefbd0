//! Logging setup
//!
//! The crate itself only emits `tracing` events. Binaries and tests embedding
//! the subsystem call [`init_logging`] once at startup to install a subscriber.

use crate::config::LoggingSettings;
use crate::utils::error::{BackofficeError, Result};
use tracing_subscriber::EnvFilter;

/// Build the filter for the given settings
///
/// `RUST_LOG` takes precedence over the configured level when `prefer_env` is set.
pub fn build_env_filter(settings: &LoggingSettings, prefer_env: bool) -> Result<EnvFilter> {
    if prefer_env {
        if let Ok(filter) = EnvFilter::try_from_default_env() {
            return Ok(filter);
        }
    }

    EnvFilter::try_new(&settings.level)
        .map_err(|e| BackofficeError::Config(format!("Invalid log filter: {}", e)))
}

/// Install the global tracing subscriber
///
/// Fails if a global subscriber is already installed.
pub fn init_logging(settings: &LoggingSettings) -> Result<()> {
    let filter = build_env_filter(settings, true)?;
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false);

    let installed = if settings.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    installed.map_err(|e| BackofficeError::Internal(format!("Failed to install logger: {}", e)))
}
