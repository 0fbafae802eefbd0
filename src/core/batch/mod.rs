//! Batch execution for back-office bulk operations
//!
//! Runs an async operation over a list of items in fixed-size groups, retries
//! failed items with linear backoff, reports progress, and keeps a registry of
//! live operations for status queries and cooperative cancellation.

mod dispatch;
mod executor;
mod registry;
mod types;


// Re-export all public types
pub use dispatch::{BatchHandler, FnHandler, OperationDispatcher};
pub use executor::{BatchExecutor, batch_execute};
pub use registry::{LiveOperation, OperationRegistry, Registration};
pub use types::{
    BatchConfig, BatchItemError, BatchItemResult, BatchOperation, BatchOptions, BatchProgress,
    BatchSummary, ErrorCallback, ProgressCallback,
};
