//! Core error type definitions

use thiserror::Error;

/// Result type alias for the crate
pub type Result<T> = std::result::Result<T, BackofficeError>;

/// Main error type for the Batch/Cache subsystem
#[derive(Error, Debug)]
pub enum BackofficeError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Structurally invalid arguments, raised before any work starts
    #[error("Validation error: {0}")]
    Validation(String),

    /// Not found errors
    #[error("Not found: {0}")]
    NotFound(String),

    /// Backing fetch failures
    #[error("Fetch error: {0}")]
    Fetch(String),

    /// Batch item operation failures
    #[error("Operation error: {0}")]
    Operation(String),

    /// Timeout errors
    #[error("Timeout error: {0}")]
    Timeout(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}
