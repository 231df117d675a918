//! Error types for the rutina_core library.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for rutina_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Draft input rejected on commit
    #[error("{0}")]
    Validation(String),

    /// Record does not exist for the requesting user
    #[error("Not found: {0}")]
    NotFound(String),

    /// Persistence gateway failure
    #[error("Store error: {0}")]
    Store(String),

    /// PDF generation failure
    #[error("Export error: {0}")]
    Export(String),

    /// No usable ownership key
    #[error("Identity error: {0}")]
    Identity(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}
