//! Deployment class and kind value objects
//!
//! A *class* is what a trigger asks for (`homepage`, `reports`, `auto`).
//! A *kind* is what actually gets deployed (`homepage` or `reports`).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Requested scope of a coordinator invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DeployClass {
    /// Homepage-only evaluation
    Homepage,
    /// Full report set evaluation
    Reports,
    /// Change-driven evaluation
    #[default]
    Auto,
}

impl DeployClass {
    pub const ALL: [DeployClass; 3] = [DeployClass::Homepage, DeployClass::Reports, DeployClass::Auto];

    pub fn as_str(&self) -> &'static str {
        match self {
            DeployClass::Homepage => "homepage",
            DeployClass::Reports => "reports",
            DeployClass::Auto => "auto",
        }
    }
}

impl fmt::Display for DeployClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeployClass {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "homepage" => Ok(DeployClass::Homepage),
            "reports" => Ok(DeployClass::Reports),
            "auto" => Ok(DeployClass::Auto),
            other => Err(format!(
                "unknown deployment class '{}' (expected homepage, reports or auto)",
                other
            )),
        }
    }
}

/// What a deploy publishes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeployKind {
    Homepage,
    Reports,
}

impl DeployKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeployKind::Homepage => "homepage",
            DeployKind::Reports => "reports",
        }
    }
}

impl fmt::Display for DeployKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
