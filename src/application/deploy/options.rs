//! Deploy Options
//!
//! Configuration types for a coordinator run.

use crate::domain::value_objects::DeployClass;

/// Options for the deploy use case
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeployOptions {
    /// Requested deployment class
    pub class: DeployClass,
    /// Evaluate and report only; persist nothing, publish nothing
    pub dry_run: bool,
}

impl DeployOptions {
    pub fn new(class: DeployClass) -> Self {
        Self {
            class,
            dry_run: false,
        }
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}

impl Default for DeployOptions {
    fn default() -> Self {
        Self::new(DeployClass::Auto)
    }
}
