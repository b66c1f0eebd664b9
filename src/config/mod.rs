//! Configuration
//!
//! Resolution order:
//! 1. `--config <file>` (must exist)
//! 2. Project config (`<root>/deploy.toml`)
//! 3. User config (`~/.config/prospector/deploy.toml`)
//! 4. Built-in defaults
//!
//! Environment variables (`PROSPECTOR_*`) override whichever file won.

mod loader;
mod types;

pub use loader::{
    load_layered, load_with_warnings, with_env_overrides, ConfigWarning, LoadedConfig,
    PROJECT_CONFIG,
};
pub use types::{Config, LockConfig, PathsConfig, PolicyConfig, PublishConfig, WatchConfig};
