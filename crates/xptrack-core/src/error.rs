//! Core error types for xptrack-core.
//!
//! This module defines the error hierarchy using thiserror. Every failure
//! in the engine is local and synchronous: either it is reported to the
//! caller (invalid goal input) or it is absorbed into a degenerate but
//! valid result (empty-series renders). Nothing is retried.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for xptrack-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Goal validation errors
    #[error("Goal error: {0}")]
    Goal(#[from] GoalError),

    /// Series generation errors
    #[error("Series error: {0}")]
    Series(#[from] SeriesError),

    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Rejected goal input. Recoverable: the store is left untouched and the
/// caller surfaces the rejection to the user.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum GoalError {
    /// Value outside the accepted [1, 1000] XP/day range
    #[error("daily goal {value} is outside the accepted range 1..=1000")]
    OutOfRange { value: i64 },

    /// Free-form input that is not a whole number
    #[error("daily goal '{input}' is not a whole number")]
    NotAnInteger { input: String },

    /// Preset id not in the fixed preset table
    #[error("unknown goal preset '{id}'")]
    UnknownPreset { id: String },
}

/// Series generation errors. An invalid window is a programming error:
/// the discrete period selector makes it unreachable from the UI.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum SeriesError {
    /// Non-positive window length
    #[error("series window must be positive, got {days} days")]
    InvalidWindow { days: i64 },
}

/// Database-specific errors.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Failed to open database connection
    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Database is locked
    #[error("Database is locked")]
    Locked,
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

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown configuration key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

impl From<rusqlite::Error> for DatabaseError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(err, _msg) => {
                if err.code == rusqlite::ErrorCode::DatabaseLocked {
                    DatabaseError::Locked
                } else {
                    DatabaseError::QueryFailed(err.to_string())
                }
            }
            _ => DatabaseError::QueryFailed(err.to_string()),
        }
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
