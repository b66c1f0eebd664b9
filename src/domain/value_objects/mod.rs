//! Domain Value Objects
//!
//! Immutable value types that represent domain concepts.

mod deploy_class;
mod first_observation;
mod hash;
mod report_glob;

pub use deploy_class::{DeployClass, DeployKind};
pub use first_observation::FirstObservation;
pub use hash::ContentHash;
pub use report_glob::ReportGlob;
