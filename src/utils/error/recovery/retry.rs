//! Retry mechanism with linear backoff

use super::types::RetryConfig;
use tracing::{debug, warn};

/// Retry mechanism with linear backoff
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    config: RetryConfig,
}

impl RetryPolicy {
    /// Create a new retry policy
    pub fn new(config: RetryConfig) -> Self {
        Self { config }
    }

    /// Get current configuration
    pub fn config(&self) -> &RetryConfig {
        &self.config
    }

    /// Execute a function with retry logic
    pub async fn call<F, Fut, R, E>(&self, f: F) -> std::result::Result<R, E>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = std::result::Result<R, E>>,
        E: std::fmt::Display,
    {
        self.call_counted(f).await.0
    }

    /// Execute a function with retry logic, also reporting how many attempts ran
    pub async fn call_counted<F, Fut, R, E>(&self, mut f: F) -> (std::result::Result<R, E>, u32)
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = std::result::Result<R, E>>,
        E: std::fmt::Display,
    {
        let mut attempt = 0u32;

        loop {
            attempt += 1;

            match f().await {
                Ok(result) => {
                    if attempt > 1 {
                        debug!("Retry succeeded on attempt {}", attempt);
                    }
                    return (Ok(result), attempt);
                }
                Err(error) => {
                    if attempt > self.config.max_retries {
                        warn!("Giving up after {} attempts: {}", attempt, error);
                        return (Err(error), attempt);
                    }

                    let delay = self.config.delay_for(attempt);
                    debug!(
                        "Attempt {} failed: {}, retrying in {:?}",
                        attempt, error, delay
                    );

                    if !delay.is_zero() {
                        tokio::time::sleep(delay).await;
                    }
                }
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(RetryConfig::default())
    }
}
