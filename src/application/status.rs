//! Status Use Case
//!
//! Read-only summary of the deployment state and the lock holder.
//! Never takes the deployment lock.

use crate::domain::entities::{DeploymentRecord, LockHolder, PendingDeploy};
use crate::domain::policies::{cooldown_remaining, PolicySettings};
use crate::domain::ports::{Clock, DeployLock, StateRepository};
use crate::error::DeployResult;

/// Snapshot for `status`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusReport {
    pub now: i64,
    pub accumulated: u32,
    pub threshold: u32,
    pub last_homepage_deploy: i64,
    pub last_report_deploy: i64,
    /// Seconds left before a report deploy is allowed, if cooling down
    pub report_cooldown_remaining: Option<u64>,
    pub homepage_cooldown_remaining: Option<u64>,
    pub tracked_files: usize,
    pub pending: Option<PendingDeploy>,
    pub lock_holder: Option<LockHolder>,
    pub lock_stale: bool,
    /// Most recent records, oldest first
    pub history: Vec<DeploymentRecord>,
}

impl StatusReport {
    /// Seconds since `timestamp`, `None` if it was never set
    pub fn age_of(&self, timestamp: i64) -> Option<u64> {
        if timestamp == 0 {
            return None;
        }
        Some(u64::try_from(self.now.saturating_sub(timestamp)).unwrap_or(0))
    }

    pub fn threshold_reached(&self) -> bool {
        self.accumulated >= self.threshold
    }
}

pub struct StatusUseCase<SR, L, C>
where
    SR: StateRepository,
    L: DeployLock,
    C: Clock,
{
    state_repo: SR,
    lock: L,
    clock: C,
    settings: PolicySettings,
    stale_after: u64,
}

impl<SR, L, C> StatusUseCase<SR, L, C>
where
    SR: StateRepository,
    L: DeployLock,
    C: Clock,
{
    pub fn new(state_repo: SR, lock: L, clock: C, settings: PolicySettings) -> Self {
        Self {
            state_repo,
            lock,
            clock,
            settings,
            stale_after: 3600,
        }
    }

    pub fn with_stale_after(mut self, secs: u64) -> Self {
        self.stale_after = secs;
        self
    }

    pub fn execute(&self, history_limit: usize) -> DeployResult<StatusReport> {
        let state = self.state_repo.load()?;
        let now = self.clock.now();
        let lock_holder = self.lock.current_holder();
        let lock_stale = lock_holder
            .as_ref()
            .is_some_and(|h| h.is_stale(now, self.stale_after));

        Ok(StatusReport {
            now,
            accumulated: state.changes_since_last_report_deploy,
            threshold: self.settings.changes_threshold,
            last_homepage_deploy: state.last_homepage_deploy,
            last_report_deploy: state.last_report_deploy,
            report_cooldown_remaining: cooldown_remaining(
                state.last_report_deploy,
                self.settings.report_cooldown,
                now,
            ),
            homepage_cooldown_remaining: cooldown_remaining(
                state.last_homepage_deploy,
                self.settings.homepage_cooldown,
                now,
            ),
            tracked_files: state.file_fingerprints.len(),
            pending: state.pending_deploy,
            lock_holder,
            lock_stale,
            history: state.recent_history(history_limit).to_vec(),
        })
    }
}
