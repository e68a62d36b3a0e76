//! Error types for InfoFlow
//!
//! This module defines all error types used throughout the application,
//! using `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Main error type for InfoFlow operations
///
/// This enum encompasses all possible errors that can occur during
/// configuration loading, session persistence, provider interactions,
/// document extraction, and voice capture.
#[derive(Error, Debug)]
pub enum InfoFlowError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// The persisted session blob exists but cannot be parsed
    ///
    /// Fatal at startup: the store is never auto-repaired, the user has
    /// to fix or remove the file.
    #[error("Session store is corrupt: {0}")]
    StorageCorrupt(String),

    /// Session store errors other than corruption (paths, permissions)
    #[error("Storage error: {0}")]
    Storage(String),

    /// A session identifier that does not exist in the store
    #[error("Unknown session: {0}")]
    UnknownSession(String),

    /// Renaming a session onto an identifier that is already taken
    #[error("Session already exists: {0}")]
    SessionExists(String),

    /// Provider-related errors (API calls, connectivity)
    #[error("Provider error: {0}")]
    Provider(String),

    /// Document text extraction errors
    #[error("Extraction error: {0}")]
    Extraction(String),

    /// Voice capture errors (transcriber process, audio pipeline)
    #[error("Voice capture error: {0}")]
    Voice(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Result type alias for InfoFlow operations
///
/// This is a convenience alias that uses `anyhow::Error` as the error type,
/// allowing for rich error context and easy error propagation.
pub type Result<T> = anyhow::Result<T>;
