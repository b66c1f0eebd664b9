//! StateRepository port
//!
//! Persists the deployment state (default `deployment_state.json`).

use std::path::{Path, PathBuf};

use crate::domain::entities::DeploymentState;

pub trait StateRepository {
    /// Load the state. A missing file yields the default state.
    fn load(&self) -> Result<DeploymentState, StateError>;
    /// Replace the stored state in full.
    fn save(&self, state: &DeploymentState) -> Result<(), StateError>;
    fn path(&self) -> &Path;
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum StateError {
    #[error("Failed to access state {path}: {message}")]
    AccessError { path: PathBuf, message: String },

    #[error("Failed to serialize state {path}: {message}")]
    SerializationError { path: PathBuf, message: String },

    #[error("state file corrupted: {path}: {message}")]
    Corrupted { path: PathBuf, message: String },
}
