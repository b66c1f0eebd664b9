//! Report glob value object
//!
//! Matches report artifact file names using gitignore-style globs
//! (via the `ignore` crate's override matcher).

use std::fmt;
use std::path::Path;

use ignore::overrides::{Override, OverrideBuilder};

use crate::error::DeployError;

/// Compiled glob for report files, e.g. `*.html`
#[derive(Clone)]
pub struct ReportGlob {
    pattern: String,
    matcher: Override,
}

impl ReportGlob {
    /// Compile a glob. Matching is done against file names only.
    pub fn new(pattern: &str) -> Result<Self, DeployError> {
        let trimmed = pattern.trim();
        if trimmed.is_empty() || trimmed.starts_with('!') {
            return Err(DeployError::InvalidPattern {
                pattern: pattern.to_string(),
                message: "pattern must be a non-empty, non-negated glob".to_string(),
            });
        }

        let mut builder = OverrideBuilder::new("");
        builder
            .add(trimmed)
            .map_err(|e| DeployError::InvalidPattern {
                pattern: pattern.to_string(),
                message: e.to_string(),
            })?;
        let matcher = builder.build().map_err(|e| DeployError::InvalidPattern {
            pattern: pattern.to_string(),
            message: e.to_string(),
        })?;

        Ok(Self {
            pattern: trimmed.to_string(),
            matcher,
        })
    }

    /// Check whether a file name matches
    pub fn matches(&self, file_name: &Path) -> bool {
        self.matcher.matched(file_name, false).is_whitelist()
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }
}

impl fmt::Debug for ReportGlob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ReportGlob").field(&self.pattern).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn html_glob_matches_html_only() {
        let glob = ReportGlob::new("*.html").unwrap();
        assert!(glob.matches(Path::new("1000010001.html")));
        assert!(glob.matches(Path::new("index.html")));
        assert!(!glob.matches(Path::new("style.css")));
        assert!(!glob.matches(Path::new("report.html.bak")));
    }

    #[test]
    fn empty_pattern_is_rejected() {
        assert!(matches!(
            ReportGlob::new("  "),
            Err(DeployError::InvalidPattern { .. })
        ));
    }

    #[test]
    fn negated_pattern_is_rejected() {
        assert!(ReportGlob::new("!*.html").is_err());
    }
}
