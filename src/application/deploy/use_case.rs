//! Deploy Use Case
//!
//! Orchestrates one coordinator invocation:
//! 1. Take the deployment lock (non-blocking)
//! 2. Load state, recovering a marker left by a crashed run
//! 3. Detect changes
//! 4. Evaluate the deployment policy
//! 5. Publish if warranted, recording the outcome
//! 6. Persist state and release the lock
//!
//! Homepage and code changes are "held": their new fingerprints are only
//! committed once a deploy that covers them succeeds. A wait, a no-op, a
//! failure or a crash leaves the old fingerprint in place so the next run
//! sees the same change again.
//!
//! This use case is pure orchestration - the decision table lives in
//! `DeployPolicy` and change detection in `ChangeDetector`.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::entities::{ChangeReport, DeploymentState};
use crate::domain::policies::DeployPolicy;
use crate::domain::ports::{
    Clock, DeployEvent, DeployEventSink, DeployLock, FileSystem, LockAttempt, NoopEventSink,
    PublishReport, Publisher, StateRepository,
};
use crate::domain::services::ChangeDetector;
use crate::domain::value_objects::{ContentHash, DeployKind};
use crate::error::DeployResult;

use super::options::DeployOptions;
use super::result::{RunOutcome, RunReport};

/// Either deploy regenerates the homepage; only a full-report deploy covers code
const HOMEPAGE_SETTLED_BY: &[DeployKind] = &[DeployKind::Homepage, DeployKind::Reports];
const CODE_SETTLED_BY: &[DeployKind] = &[DeployKind::Reports];

/// A detected change whose fingerprint waits for a covering deploy
struct HeldChange {
    key: String,
    detected: ContentHash,
    settled_by: &'static [DeployKind],
}

/// Deploy use case - orchestrates a coordinator run
///
/// Parameterized by its ports so tests can drive it with in-memory mocks.
pub struct DeployUseCase<SR, L, FS, P, C>
where
    SR: StateRepository,
    L: DeployLock,
    FS: FileSystem,
    P: Publisher,
    C: Clock,
{
    state_repo: SR,
    lock: L,
    detector: ChangeDetector<FS>,
    policy: DeployPolicy,
    publisher: P,
    clock: C,
    stale_after: u64,
}

impl<SR, L, FS, P, C> DeployUseCase<SR, L, FS, P, C>
where
    SR: StateRepository,
    L: DeployLock,
    FS: FileSystem,
    P: Publisher,
    C: Clock,
{
    pub fn new(
        state_repo: SR,
        lock: L,
        detector: ChangeDetector<FS>,
        policy: DeployPolicy,
        publisher: P,
        clock: C,
    ) -> Self {
        Self {
            state_repo,
            lock,
            detector,
            policy,
            publisher,
            clock,
            stale_after: 3600,
        }
    }

    /// Seconds after which a live lock holder is reported as stale
    pub fn with_stale_after(mut self, secs: u64) -> Self {
        self.stale_after = secs;
        self
    }

    /// Run without event reporting
    pub fn run(&self, options: &DeployOptions) -> DeployResult<RunOutcome> {
        self.run_with_events(options, Arc::new(NoopEventSink))
    }

    /// Run, emitting events for progress reporting and NDJSON streams
    pub fn run_with_events(
        &self,
        options: &DeployOptions,
        events: Arc<dyn DeployEventSink>,
    ) -> DeployResult<RunOutcome> {
        let class = options.class;

        let guard = match self.lock.try_acquire(class)? {
            LockAttempt::Acquired(guard) => guard,
            LockAttempt::Contended { holder } => {
                let now = self.clock.now();
                let stale = holder
                    .as_ref()
                    .is_some_and(|h| h.is_stale(now, self.stale_after));
                match &holder {
                    Some(h) => warn!(holder = %h.describe(), stale, "deployment already in progress"),
                    None => warn!("deployment already in progress"),
                }
                events.on_event(DeployEvent::LockContended {
                    holder: holder.clone(),
                    stale,
                });
                return Ok(RunOutcome::Contended { holder, stale });
            }
        };

        events.on_event(DeployEvent::Started {
            class,
            dry_run: options.dry_run,
        });

        let mut state = self.state_repo.load()?;

        let recovered = state.recover_interrupted();
        if let Some(pending) = recovered {
            warn!(
                kind = %pending.kind,
                started_at = pending.started_at,
                "previous deploy was interrupted"
            );
            events.on_event(DeployEvent::InterruptedRecovered { pending });
        }

        let previous = state.file_fingerprints.clone();
        let changes = self.detector.detect(&mut state);
        let now = self.clock.now();
        let decision = self.policy.decide(&state, &changes, class, now);
        state.changes_since_last_report_deploy = decision.accumulated;

        events.on_event(DeployEvent::ChangesDetected {
            report: changes.clone(),
            accumulated: decision.accumulated,
        });
        info!(
            class = %class,
            changes = changes.total_changes,
            accumulated = decision.accumulated,
            action = decision.action.name(),
            "{}",
            decision.action
        );
        events.on_event(DeployEvent::Decided {
            action: decision.action,
        });

        let mut report = RunReport {
            class,
            changes,
            decision,
            recovered,
            publish: None,
            dry_run: options.dry_run,
        };

        if options.dry_run {
            events.on_event(DeployEvent::Completed {
                action: decision.action,
                success: true,
                dry_run: true,
            });
            guard.release();
            return Ok(RunOutcome::Evaluated(report));
        }

        let kind = decision.action.deploy_kind();
        if let Some(kind) = kind {
            state.begin(kind, class, now);
        }
        let held = self.hold_changes(&mut state, &report.changes, &previous);

        match kind {
            Some(kind) => {
                self.state_repo.save(&state)?;

                let publish = self.publisher.publish(kind, events.as_ref());
                if publish.is_success() {
                    self.settle(&mut state, kind, &held);
                }
                self.record_publish(&mut state, &publish);
                self.state_repo.save(&state)?;
                report.publish = Some(publish);
            }
            None => self.state_repo.save(&state)?,
        }

        events.on_event(DeployEvent::Completed {
            action: decision.action,
            success: report.is_success(),
            dry_run: false,
        });
        guard.release();
        Ok(RunOutcome::Evaluated(report))
    }

    /// Roll the homepage and code fingerprints back to their pre-detection
    /// values and take their changes out of the accumulator.
    fn hold_changes(
        &self,
        state: &mut DeploymentState,
        changes: &ChangeReport,
        previous: &BTreeMap<String, ContentHash>,
    ) -> Vec<HeldChange> {
        let mut candidates: Vec<(String, &'static [DeployKind])> = Vec::new();
        if changes.homepage_changed {
            candidates.push((self.detector.homepage_key(), HOMEPAGE_SETTLED_BY));
        }
        if changes.code_changed {
            candidates.push((self.detector.code_key(), CODE_SETTLED_BY));
        }

        candidates
            .into_iter()
            .filter_map(|(key, settled_by)| {
                let detected = state.fingerprint(&key).cloned()?;
                state.restore_fingerprint(&key, previous.get(&key).cloned());
                state.withdraw(1);
                debug!(key = %key, "change held until a covering deploy succeeds");
                Some(HeldChange {
                    key,
                    detected,
                    settled_by,
                })
            })
            .collect()
    }

    /// Commit the held changes a successful deploy covered, then absorb the
    /// chain's own rewrites so they do not read as new changes.
    fn settle(&self, state: &mut DeploymentState, kind: DeployKind, held: &[HeldChange]) {
        for change in held.iter().filter(|c| c.settled_by.contains(&kind)) {
            state.set_fingerprint(change.key.clone(), change.detected.clone());
            state.accumulate(1);
        }
        self.detector.rebaseline_artifacts(state);
    }

    fn record_publish(&self, state: &mut DeploymentState, publish: &PublishReport) {
        for step in publish.degraded_steps() {
            warn!(
                step = %step.step,
                reason = step.outcome.reason().unwrap_or(""),
                "publish step failed, continuing"
            );
        }

        let finished_at = self.clock.now();
        match publish.failure_reason() {
            None => {
                state.complete(finished_at);
                info!(kind = %publish.kind, "deploy completed");
            }
            Some(reason) => {
                warn!(kind = %publish.kind, reason = %reason, "deploy failed");
                state.fail(finished_at, reason);
            }
        }
    }
}
