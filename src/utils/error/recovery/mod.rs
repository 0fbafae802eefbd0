//! Error recovery utilities
//!
//! This module provides the retry policy shared by the batch executor.

mod retry;
mod types;

pub use retry::RetryPolicy;
pub use types::RetryConfig;
