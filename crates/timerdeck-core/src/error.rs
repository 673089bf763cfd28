//! Core error types for timerdeck-core.
//!
//! Failure policy: validation clamps instead of erroring, update and delete
//! failures are logged and swallowed at the sync adapter, and a denied
//! notification permission is an expected outcome, not an error path.
//! Creation and configuration load/save are the fallible surfaces.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for timerdeck-core. Fallible entry points (timer
/// creation, configuration load/save) return this umbrella; the sub-enums
/// stay available for callers that want to match on the exact failure.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Remote document store errors
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Errors surfaced by a [`DocumentStore`](crate::store::DocumentStore)
/// implementation.
#[derive(Error, Debug)]
pub enum StoreError {
    /// No document with the given id exists in the collection
    #[error("Document not found: {0}")]
    NotFound(String),

    /// The store could not be reached or rejected the request
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// The change-stream subscription has shut down
    #[error("Change stream closed")]
    StreamClosed,

    /// Document payload could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),

    /// No platform config directory could be resolved
    #[error("No configuration directory available on this platform")]
    NoConfigDir,
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
