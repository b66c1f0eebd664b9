//! Deploy Result
//!
//! Outcome types for coordinator runs.

use crate::domain::entities::{ChangeReport, LockHolder, PendingDeploy};
use crate::domain::policies::Decision;
use crate::domain::ports::PublishReport;
use crate::domain::value_objects::DeployClass;
use crate::error::DeployError;

/// Outcome of one coordinator invocation
#[derive(Debug, Clone)]
pub enum RunOutcome {
    /// Another process holds the deployment lock; nothing was touched
    Contended {
        holder: Option<LockHolder>,
        stale: bool,
    },
    /// The lock was taken and the policy evaluated
    Evaluated(RunReport),
}

impl RunOutcome {
    pub fn is_contended(&self) -> bool {
        matches!(self, RunOutcome::Contended { .. })
    }

    /// Whether a publish chain was started
    pub fn deploy_attempted(&self) -> bool {
        match self {
            RunOutcome::Contended { .. } => false,
            RunOutcome::Evaluated(report) => report.deploy_attempted(),
        }
    }

    pub fn report(&self) -> Option<&RunReport> {
        match self {
            RunOutcome::Contended { .. } => None,
            RunOutcome::Evaluated(report) => Some(report),
        }
    }
}

/// What an evaluated run saw and did
#[derive(Debug, Clone)]
pub struct RunReport {
    pub class: DeployClass,
    pub changes: ChangeReport,
    pub decision: Decision,
    /// Marker left by a crashed run, recorded as interrupted
    pub recovered: Option<PendingDeploy>,
    /// Present when a publish chain ran
    pub publish: Option<PublishReport>,
    pub dry_run: bool,
}

impl RunReport {
    pub fn deploy_attempted(&self) -> bool {
        self.publish.is_some()
    }

    pub fn is_success(&self) -> bool {
        self.publish.as_ref().map_or(true, PublishReport::is_success)
    }

    /// Error describing a hard publish failure, if one occurred
    pub fn publish_error(&self) -> Option<DeployError> {
        let publish = self.publish.as_ref()?;
        let step = publish.fatal_step()?;
        Some(DeployError::PublishFailed {
            chain: publish.kind.to_string(),
            step: step.step.to_string(),
            message: step.outcome.reason().unwrap_or("failed").to_string(),
        })
    }
}
