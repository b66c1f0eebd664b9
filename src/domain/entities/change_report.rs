//! Change report entity
//!
//! The ephemeral result of one change-detection pass.

/// Which tracked items differ from their stored fingerprints
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeReport {
    pub homepage_changed: bool,
    pub reports_changed: bool,
    pub code_changed: bool,
    /// Homepage (0|1) + differing sampled reports + code (0|1)
    pub total_changes: u32,
    /// Fingerprint keys that differed, in detection order
    pub changed_paths: Vec<String>,
}

impl ChangeReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.total_changes == 0
    }

    pub(crate) fn record(&mut self, key: &str) {
        self.total_changes = self.total_changes.saturating_add(1);
        self.changed_paths.push(key.to_string());
    }
}
