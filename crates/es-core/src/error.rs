//! Error types for evsel

use thiserror::Error;

/// evsel error type
///
/// Only configuration and I/O problems surface here. An event that fails a
/// selection cut is not an error; see `es_analysis::Outcome`.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    /// Fatal configuration error (unknown era, bad run card, ...)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Lookup of an unsupported key combination
    #[error("Not found: {0}")]
    NotFound(String),

    /// Runtime failure outside the event logic (thread pool setup, ...)
    #[error("Computation error: {0}")]
    Computation(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
