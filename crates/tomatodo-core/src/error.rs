//! Core error types for tomatodo-core.
//!
//! None of these are fatal to the timer: callers log and fall back to a safe
//! default. They exist so the boundary can tell *why* something was ignored.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for tomatodo-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Snapshot slot errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Alert playback errors
    #[error("Alert error: {0}")]
    Alert(#[from] AlertError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors from the durable key-value slot.
#[derive(Error, Debug)]
pub enum StorageError {
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

    /// An unusable database file could not be moved out of the way
    #[error("Failed to set aside {path}: {source}")]
    SetAside {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Data directory could not be resolved or created
    #[error("Data directory unavailable: {0}")]
    DataDir(String),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Unknown dot-path key
    #[error("unknown config key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

/// Validation errors for user input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Task text was empty after trimming
    #[error("task text must not be empty")]
    EmptyTaskText,

    /// No task is currently being edited
    #[error("no task is being edited")]
    NoEditTarget,

    /// Unrecognised timer mode name
    #[error("unknown timer mode '{0}' (expected focus, short-break or long-break)")]
    UnknownMode(String),

    /// Unrecognised interactive command
    #[error("unknown command '{0}' (try 'help')")]
    UnknownCommand(String),

    /// Command given without a required argument
    #[error("'{command}' needs {what}")]
    MissingArgument {
        command: &'static str,
        what: &'static str,
    },

    /// No task matched the given position or id prefix
    #[error("no task matches '{0}'")]
    UnknownTask(String),
}

/// Failure to deliver the completion cue.
#[derive(Error, Debug)]
pub enum AlertError {
    /// The configured sound resource does not exist
    #[error("sound file not found: {0}")]
    MissingSound(PathBuf),

    /// Playback or terminal write failed
    #[error("alert playback failed: {0}")]
    Playback(#[from] std::io::Error),
}

impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(inner, _msg) => {
                if inner.code == rusqlite::ErrorCode::DatabaseBusy
                    || inner.code == rusqlite::ErrorCode::DatabaseLocked
                {
                    StorageError::Locked
                } else {
                    StorageError::QueryFailed(err.to_string())
                }
            }
            _ => StorageError::QueryFailed(err.to_string()),
        }
    }
}

impl From<rusqlite::Error> for CoreError {
    fn from(err: rusqlite::Error) -> Self {
        CoreError::Storage(err.into())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
