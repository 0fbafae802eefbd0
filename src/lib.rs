//! # backoffice-rs
//!
//! Batch/Cache subsystem for back-office services.
//!
//! ## Features
//!
//! - **TTL cache**: Keyed in-memory store with per-entry TTL and serialized
//!   read-modify-write per key
//! - **Request coalescing**: Concurrent requests for the same resource type in
//!   one debounce window share a single backing fetch
//! - **Batch execution**: Fixed-size groups, per-item linear retry, progress
//!   reporting and cooperative cancellation
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use backoffice_rs::{BatchCacheSubsystem, Config, FetcherRegistry};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_file("config/backoffice.yaml").await?;
//!     backoffice_rs::utils::logging::init_logging(&config.logging)?;
//!
//!     let mut fetchers = FetcherRegistry::new();
//!     fetchers.register_fn("open_tickets", |_| async { Ok(vec![101u64, 102, 107]) });
//!
//!     let subsystem = BatchCacheSubsystem::new(&config, Arc::new(fetchers))?;
//!     subsystem.bootstrap();
//!
//!     let tickets = subsystem.get_or_fetch("open_tickets").await?;
//!     let summary = subsystem
//!         .executor()
//!         .run(
//!             tickets,
//!             |id, _| async move { Ok(format!("closed {id}")) },
//!             subsystem.executor().options(),
//!         )
//!         .await?;
//!     println!("{} closed, {} failed", summary.completed, summary.failed);
//!     Ok(())
//! }
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_inception)]

pub mod config;
pub mod core;
pub mod utils;

// Re-export main types
pub use config::Config;
pub use utils::error::{BackofficeError, Result};

pub use core::batch::{
    BatchConfig, BatchExecutor, BatchItemError, BatchOptions, BatchProgress, BatchSummary,
    OperationDispatcher,
};
pub use core::cache_manager::{CacheConfig, CacheStore};
pub use core::coalescer::{
    CoalescerConfig, CoalescerError, FetcherRegistry, RequestCoalescer, ResourceFetcher,
};
pub use core::subsystem::BatchCacheSubsystem;

// Version information
/// Current version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Name of the crate
pub const NAME: &str = env!("CARGO_PKG_NAME");
