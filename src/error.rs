//! Error types for the deployment coordinator
//!
//! Uses `thiserror` for library errors. The binary wraps these in `anyhow`.

use std::path::PathBuf;
use thiserror::Error;

use crate::domain::ports::{LockError, StateError};

/// Result type alias for coordinator operations
pub type DeployResult<T> = Result<T, DeployError>;

/// Main error type for coordinator operations
#[derive(Error, Debug)]
pub enum DeployError {
    /// The state file exists but could not be parsed
    #[error(
        "deployment state corrupted: {path}\n  → Fix: repair the JSON by hand or move it aside\n  → Details: {message}"
    )]
    StateCorrupted { path: PathBuf, message: String },

    /// The state file could not be read or written
    #[error("failed to access deployment state {path}: {message}")]
    StateAccess { path: PathBuf, message: String },

    /// The lock file could not be opened or locked for a reason other than contention
    #[error("failed to access deployment lock {path}: {message}")]
    LockAccess { path: PathBuf, message: String },

    /// Invalid configuration file
    #[error("invalid configuration in {file}: {message}")]
    InvalidConfig { file: PathBuf, message: String },

    /// Configuration file given explicitly but missing
    #[error("configuration file not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Invalid glob pattern for report discovery
    #[error("invalid report pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    /// A publish chain failed on a step that cannot be skipped
    #[error("{chain} publish failed at step '{step}': {message}")]
    PublishFailed {
        chain: String,
        step: String,
        message: String,
    },

    /// Directory not found
    #[error("directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    /// File watcher could not be started
    #[error("watch error: {0}")]
    Watch(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<StateError> for DeployError {
    fn from(err: StateError) -> Self {
        match err {
            StateError::Corrupted { path, message } => DeployError::StateCorrupted { path, message },
            StateError::AccessError { path, message }
            | StateError::SerializationError { path, message } => {
                DeployError::StateAccess { path, message }
            }
        }
    }
}

impl From<LockError> for DeployError {
    fn from(err: LockError) -> Self {
        match err {
            LockError::AccessError { path, message } => DeployError::LockAccess { path, message },
        }
    }
}
