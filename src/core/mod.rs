//! Core functionality for the Batch/Cache subsystem
//!
//! This module contains the cache store, the request coalescer, the batch
//! executor and the facade that wires them together.

pub mod batch;
pub mod cache_manager;
pub mod coalescer;
pub mod subsystem;

// Re-export commonly used types
pub use subsystem::BatchCacheSubsystem;
