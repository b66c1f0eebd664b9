//! First-observation policy
//!
//! Decides what a fingerprint seen for the first time means.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// How the change detector treats a tracked file with no stored baseline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FirstObservation {
    /// Record the fingerprint as the baseline; not a change (default)
    #[default]
    Baseline,
    /// Count the first sighting as a change
    Change,
}

impl FirstObservation {
    pub fn counts_as_change(&self) -> bool {
        matches!(self, FirstObservation::Change)
    }
}

impl FromStr for FirstObservation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "baseline" => Ok(FirstObservation::Baseline),
            "change" => Ok(FirstObservation::Change),
            other => Err(format!(
                "unknown first_observation '{}' (expected baseline or change)",
                other
            )),
        }
    }
}
