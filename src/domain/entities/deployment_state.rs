//! Deployment state entity
//!
//! The single durable record the coordinator reads and rewrites on every
//! invocation. All mutation happens while the deployment lock is held.

use std::collections::BTreeMap;

use crate::domain::value_objects::{ContentHash, DeployClass, DeployKind};

/// Outcome of a recorded deployment
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeployOutcome {
    Succeeded,
    Failed { reason: String },
    /// The process died while the publish chain was running
    Interrupted,
}

impl DeployOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeployOutcome::Succeeded => "succeeded",
            DeployOutcome::Failed { .. } => "failed",
            DeployOutcome::Interrupted => "interrupted",
        }
    }
}

/// One entry of the append-only deployment history
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentRecord {
    pub kind: DeployKind,
    pub trigger: DeployClass,
    pub started_at: i64,
    pub finished_at: Option<i64>,
    pub outcome: DeployOutcome,
    /// Accumulated change count when the deploy was dispatched
    pub changes: u32,
}

/// Marker persisted before a publish chain runs and cleared once its outcome is recorded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingDeploy {
    pub kind: DeployKind,
    pub trigger: DeployClass,
    pub started_at: i64,
    pub changes: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeploymentState {
    pub changes_since_last_report_deploy: u32,
    /// Epoch seconds, 0 if never deployed
    pub last_homepage_deploy: i64,
    /// Epoch seconds, 0 if never deployed
    pub last_report_deploy: i64,
    pub file_fingerprints: BTreeMap<String, ContentHash>,
    pub deployment_history: Vec<DeploymentRecord>,
    pub pending_deploy: Option<PendingDeploy>,
}

impl DeploymentState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fingerprint(&self, key: &str) -> Option<&ContentHash> {
        self.file_fingerprints.get(key)
    }

    /// Store a fingerprint, returning the previous one
    pub fn set_fingerprint(&mut self, key: impl Into<String>, hash: ContentHash) -> Option<ContentHash> {
        self.file_fingerprints.insert(key.into(), hash)
    }

    /// Put back a fingerprint as it was before detection; `None` forgets the key
    pub fn restore_fingerprint(&mut self, key: &str, previous: Option<ContentHash>) {
        match previous {
            Some(hash) => {
                self.file_fingerprints.insert(key.to_string(), hash);
            }
            None => {
                self.file_fingerprints.remove(key);
            }
        }
    }

    /// Take back changes that will be detected again on the next run
    pub fn withdraw(&mut self, changes: u32) {
        self.changes_since_last_report_deploy =
            self.changes_since_last_report_deploy.saturating_sub(changes);
    }

    /// Add detected changes to the accumulator
    pub fn accumulate(&mut self, changes: u32) {
        self.changes_since_last_report_deploy =
            self.changes_since_last_report_deploy.saturating_add(changes);
    }

    pub fn last_deploy(&self, kind: DeployKind) -> i64 {
        match kind {
            DeployKind::Homepage => self.last_homepage_deploy,
            DeployKind::Reports => self.last_report_deploy,
        }
    }

    /// Mark a deploy as in flight
    pub fn begin(&mut self, kind: DeployKind, trigger: DeployClass, started_at: i64) -> PendingDeploy {
        let pending = PendingDeploy {
            kind,
            trigger,
            started_at,
            changes: self.changes_since_last_report_deploy,
        };
        self.pending_deploy = Some(pending);
        pending
    }

    /// Record a confirmed deploy: timestamps move, the report accumulator resets.
    pub fn complete(&mut self, finished_at: i64) -> Option<&DeploymentRecord> {
        let pending = self.pending_deploy.take()?;
        match pending.kind {
            DeployKind::Homepage => self.last_homepage_deploy = pending.started_at,
            DeployKind::Reports => {
                self.last_report_deploy = pending.started_at;
                self.changes_since_last_report_deploy = 0;
            }
        }
        self.push_record(pending, Some(finished_at), DeployOutcome::Succeeded);
        self.deployment_history.last()
    }

    /// Record a failed deploy. Timestamps and the accumulator stay as they were
    /// so the next invocation is free to retry.
    pub fn fail(&mut self, finished_at: i64, reason: impl Into<String>) -> Option<&DeploymentRecord> {
        let pending = self.pending_deploy.take()?;
        self.push_record(
            pending,
            Some(finished_at),
            DeployOutcome::Failed {
                reason: reason.into(),
            },
        );
        self.deployment_history.last()
    }

    /// Convert a marker left behind by a crashed run into an `interrupted` record
    pub fn recover_interrupted(&mut self) -> Option<PendingDeploy> {
        let pending = self.pending_deploy.take()?;
        self.push_record(pending, None, DeployOutcome::Interrupted);
        Some(pending)
    }

    pub fn recent_history(&self, limit: usize) -> &[DeploymentRecord] {
        let start = self.deployment_history.len().saturating_sub(limit);
        &self.deployment_history[start..]
    }

    fn push_record(&mut self, pending: PendingDeploy, finished_at: Option<i64>, outcome: DeployOutcome) {
        self.deployment_history.push(DeploymentRecord {
            kind: pending.kind,
            trigger: pending.trigger,
            started_at: pending.started_at,
            finished_at,
            outcome,
            changes: pending.changes,
        });
    }
}
