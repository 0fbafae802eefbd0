//! Request coalescing
//!
//! Concurrent requests for the same resource type that arrive within one
//! debounce window share a single backing fetch. When the window closes, every
//! pending resource type is fetched concurrently and each outcome is fanned out
//! to the waiters of that type only.

mod coalescer;
mod registry;
mod types;

pub use coalescer::RequestCoalescer;
pub use registry::{FetcherRegistry, FnFetcher};
pub use types::{CoalescerConfig, CoalescerError, CoalescerStats, Outcome, ResourceFetcher};
