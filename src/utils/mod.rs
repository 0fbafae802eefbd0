//! Utility modules for the Batch/Cache subsystem
//!
//! - **error**: Error types and retry/backoff policy
//! - **logging**: Tracing subscriber setup

pub mod error;
pub mod logging;

use uuid::Uuid;

/// Generate a unique operation ID
pub fn generate_operation_id() -> String {
    Uuid::new_v4().to_string()
}
