//! Integration tests for backoffice-rs
//!
//! These tests drive the public API only and use real fetchers and
//! operations, no mocks.

pub mod batch_tests;
pub mod config_tests;
pub mod subsystem_tests;
