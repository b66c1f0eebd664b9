//! prospector-deploy - deployment coordinator for the NYC ODCV Prospector site
//!
//! Decides when the generated static site needs a homepage-only deploy, a full
//! report regeneration, or nothing at all, and serializes deploys through a
//! file lock so cron jobs, watchers and manual runs never overlap.

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod logging;

// Re-exports for convenience
pub use application::{DeployOptions, DeployUseCase, RunOutcome, RunReport, StatusUseCase};
pub use config::Config;
pub use domain::value_objects::{DeployClass, DeployKind};
pub use error::{DeployError, DeployResult};
