//! Deployment Policy
//!
//! Pure decision function from (state, detected changes, requested class, now)
//! to an action. No I/O; the coordinator applies the result.

use std::fmt;

use crate::domain::entities::{ChangeReport, DeploymentState};
use crate::domain::value_objects::{DeployClass, DeployKind};

/// Tunables for the decision table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PolicySettings {
    /// Accumulated changes that trigger an automatic full-report deploy
    pub changes_threshold: u32,
    /// Seconds required since the last homepage deploy
    pub homepage_cooldown: u64,
    /// Seconds required since the last full-report deploy
    pub report_cooldown: u64,
}

impl Default for PolicySettings {
    fn default() -> Self {
        Self {
            changes_threshold: 5,
            homepage_cooldown: 0,
            report_cooldown: 300,
        }
    }
}

/// Why a full-report deploy was chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportTrigger {
    /// `reports` class asked for it
    Requested,
    /// Accumulated changes reached the threshold
    ThresholdReached,
    /// The generator code changed
    CodeChanged,
}

impl ReportTrigger {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportTrigger::Requested => "requested",
            ReportTrigger::ThresholdReached => "threshold_reached",
            ReportTrigger::CodeChanged => "code_changed",
        }
    }
}

/// Why nothing is deployed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoOpReason {
    /// `homepage` class but the homepage artifact did not change
    HomepageUnchanged,
    /// Not enough accumulated changes yet
    BelowThreshold { remaining: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeployAction {
    DeployHomepage,
    DeployReports(ReportTrigger),
    /// A deploy is warranted but its cooldown has not elapsed
    Wait { kind: DeployKind, remaining_secs: u64 },
    NoOp(NoOpReason),
}

impl DeployAction {
    /// The kind of deploy to dispatch, if any
    pub fn deploy_kind(&self) -> Option<DeployKind> {
        match self {
            DeployAction::DeployHomepage => Some(DeployKind::Homepage),
            DeployAction::DeployReports(_) => Some(DeployKind::Reports),
            DeployAction::Wait { .. } | DeployAction::NoOp(_) => None,
        }
    }

    pub fn is_deploy(&self) -> bool {
        self.deploy_kind().is_some()
    }

    pub fn name(&self) -> &'static str {
        match self {
            DeployAction::DeployHomepage => "deploy_homepage",
            DeployAction::DeployReports(_) => "deploy_reports",
            DeployAction::Wait { .. } => "wait",
            DeployAction::NoOp(_) => "noop",
        }
    }
}

impl fmt::Display for DeployAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeployAction::DeployHomepage => write!(f, "deploy homepage"),
            DeployAction::DeployReports(trigger) => match trigger {
                ReportTrigger::Requested => write!(f, "deploy full reports (requested)"),
                ReportTrigger::ThresholdReached => {
                    write!(f, "deploy full reports (change threshold reached)")
                }
                ReportTrigger::CodeChanged => write!(f, "deploy full reports (code changed)"),
            },
            DeployAction::Wait {
                kind,
                remaining_secs,
            } => write!(f, "wait: {} cooldown has {}s remaining", kind, remaining_secs),
            DeployAction::NoOp(NoOpReason::HomepageUnchanged) => {
                write!(f, "no-op: homepage unchanged")
            }
            DeployAction::NoOp(NoOpReason::BelowThreshold { remaining }) => write!(
                f,
                "no-op: {} more change(s) needed before report regeneration",
                remaining
            ),
        }
    }
}

/// Result of evaluating the policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    pub action: DeployAction,
    /// Accumulator value after adding this pass's changes
    pub accumulated: u32,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DeployPolicy {
    settings: PolicySettings,
}

impl DeployPolicy {
    pub fn new(settings: PolicySettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &PolicySettings {
        &self.settings
    }

    pub fn decide(
        &self,
        state: &DeploymentState,
        changes: &ChangeReport,
        class: DeployClass,
        now: i64,
    ) -> Decision {
        let accumulated = state
            .changes_since_last_report_deploy
            .saturating_add(changes.total_changes);

        let homepage_wait = cooldown_remaining(
            state.last_homepage_deploy,
            self.settings.homepage_cooldown,
            now,
        );
        let report_wait = cooldown_remaining(
            state.last_report_deploy,
            self.settings.report_cooldown,
            now,
        );

        let action = match class {
            DeployClass::Homepage => match (changes.homepage_changed, homepage_wait) {
                (true, None) => DeployAction::DeployHomepage,
                (true, Some(remaining_secs)) => DeployAction::Wait {
                    kind: DeployKind::Homepage,
                    remaining_secs,
                },
                (false, _) => DeployAction::NoOp(NoOpReason::HomepageUnchanged),
            },
            DeployClass::Reports => match report_wait {
                None => DeployAction::DeployReports(ReportTrigger::Requested),
                Some(remaining_secs) => DeployAction::Wait {
                    kind: DeployKind::Reports,
                    remaining_secs,
                },
            },
            DeployClass::Auto => {
                let threshold_reached = accumulated >= self.settings.changes_threshold;
                if changes.homepage_changed && homepage_wait.is_none() {
                    DeployAction::DeployHomepage
                } else if changes.code_changed {
                    // Code changes bypass both the threshold and the report cooldown
                    DeployAction::DeployReports(ReportTrigger::CodeChanged)
                } else if threshold_reached {
                    match report_wait {
                        None => DeployAction::DeployReports(ReportTrigger::ThresholdReached),
                        Some(remaining_secs) => DeployAction::Wait {
                            kind: DeployKind::Reports,
                            remaining_secs,
                        },
                    }
                } else if let (true, Some(remaining_secs)) =
                    (changes.homepage_changed, homepage_wait)
                {
                    DeployAction::Wait {
                        kind: DeployKind::Homepage,
                        remaining_secs,
                    }
                } else {
                    DeployAction::NoOp(NoOpReason::BelowThreshold {
                        remaining: self.settings.changes_threshold.saturating_sub(accumulated),
                    })
                }
            }
        };

        Decision {
            action,
            accumulated,
        }
    }
}

/// `None` when the cooldown is satisfied (`now - last > cooldown`), else the
/// seconds still to wait. A zero cooldown is always satisfied.
pub fn cooldown_remaining(last: i64, cooldown: u64, now: i64) -> Option<u64> {
    if cooldown == 0 {
        return None;
    }
    let elapsed = now.saturating_sub(last);
    let cooldown = i64::try_from(cooldown).unwrap_or(i64::MAX);
    if elapsed > cooldown {
        None
    } else {
        // At exactly `cooldown` elapsed one more second is still needed
        Some(u64::try_from(cooldown - elapsed).unwrap_or(0).max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: i64 = 1_700_000_000;

    fn policy() -> DeployPolicy {
        DeployPolicy::new(PolicySettings::default())
    }

    fn changes(homepage: bool, reports: u32, code: bool) -> ChangeReport {
        ChangeReport {
            homepage_changed: homepage,
            reports_changed: reports > 0,
            code_changed: code,
            total_changes: u32::from(homepage) + reports + u32::from(code),
            changed_paths: Vec::new(),
        }
    }

    // === homepage class ===

    #[test]
    fn homepage_deploys_when_changed() {
        let state = DeploymentState::new();
        let d = policy().decide(&state, &changes(true, 0, false), DeployClass::Homepage, NOW);
        assert_eq!(d.action, DeployAction::DeployHomepage);
    }

    #[test]
    fn homepage_noop_when_unchanged() {
        let state = DeploymentState::new();
        let d = policy().decide(&state, &changes(false, 3, false), DeployClass::Homepage, NOW);
        assert_eq!(d.action, DeployAction::NoOp(NoOpReason::HomepageUnchanged));
        assert_eq!(d.accumulated, 3);
    }

    #[test]
    fn homepage_waits_for_cooldown() {
        let policy = DeployPolicy::new(PolicySettings {
            homepage_cooldown: 60,
            ..PolicySettings::default()
        });
        let state = DeploymentState {
            last_homepage_deploy: NOW - 20,
            ..DeploymentState::new()
        };
        let d = policy.decide(&state, &changes(true, 0, false), DeployClass::Homepage, NOW);
        assert_eq!(
            d.action,
            DeployAction::Wait {
                kind: DeployKind::Homepage,
                remaining_secs: 40
            }
        );
    }

    // === reports class ===

    #[test]
    fn reports_deploy_unconditionally_when_cooled_down() {
        let state = DeploymentState::new();
        let d = policy().decide(&state, &ChangeReport::new(), DeployClass::Reports, NOW);
        assert_eq!(d.action, DeployAction::DeployReports(ReportTrigger::Requested));
    }

    #[test]
    fn reports_wait_inside_cooldown_regardless_of_changes() {
        let state = DeploymentState {
            last_report_deploy: NOW - 100,
            changes_since_last_report_deploy: 50,
            ..DeploymentState::new()
        };
        let d = policy().decide(&state, &changes(false, 10, true), DeployClass::Reports, NOW);
        assert_eq!(
            d.action,
            DeployAction::Wait {
                kind: DeployKind::Reports,
                remaining_secs: 200
            }
        );
    }

    #[test]
    fn report_cooldown_boundary_is_strict() {
        let state = DeploymentState {
            last_report_deploy: NOW - 300,
            ..DeploymentState::new()
        };
        let d = policy().decide(&state, &ChangeReport::new(), DeployClass::Reports, NOW);
        assert!(!d.action.is_deploy());

        let d = policy().decide(&state, &ChangeReport::new(), DeployClass::Reports, NOW + 1);
        assert!(d.action.is_deploy());
    }

    // === auto class ===

    #[test]
    fn auto_homepage_takes_priority_over_threshold() {
        let state = DeploymentState {
            changes_since_last_report_deploy: 10,
            ..DeploymentState::new()
        };
        let d = policy().decide(&state, &changes(true, 2, false), DeployClass::Auto, NOW);
        assert_eq!(d.action, DeployAction::DeployHomepage);
        assert_eq!(d.accumulated, 13);
    }

    #[test]
    fn auto_code_change_bypasses_threshold_and_cooldown() {
        let state = DeploymentState {
            last_report_deploy: NOW - 10,
            ..DeploymentState::new()
        };
        let d = policy().decide(&state, &changes(false, 0, true), DeployClass::Auto, NOW);
        assert_eq!(d.action, DeployAction::DeployReports(ReportTrigger::CodeChanged));
    }

    #[test]
    fn auto_threshold_reached_deploys_reports() {
        let state = DeploymentState {
            changes_since_last_report_deploy: 4,
            ..DeploymentState::new()
        };
        let d = policy().decide(&state, &changes(false, 1, false), DeployClass::Auto, NOW);
        assert_eq!(
            d.action,
            DeployAction::DeployReports(ReportTrigger::ThresholdReached)
        );
        assert_eq!(d.accumulated, 5);
    }

    #[test]
    fn auto_threshold_reached_but_cooling_down_waits() {
        let state = DeploymentState {
            changes_since_last_report_deploy: 9,
            last_report_deploy: NOW - 60,
            ..DeploymentState::new()
        };
        let d = policy().decide(&state, &changes(false, 1, false), DeployClass::Auto, NOW);
        assert_eq!(
            d.action,
            DeployAction::Wait {
                kind: DeployKind::Reports,
                remaining_secs: 240
            }
        );
    }

    #[test]
    fn auto_below_threshold_is_noop_with_remaining() {
        let state = DeploymentState {
            changes_since_last_report_deploy: 1,
            ..DeploymentState::new()
        };
        let d = policy().decide(&state, &changes(false, 2, false), DeployClass::Auto, NOW);
        assert_eq!(
            d.action,
            DeployAction::NoOp(NoOpReason::BelowThreshold { remaining: 2 })
        );
        assert_eq!(d.accumulated, 3);
    }

    #[test]
    fn auto_no_changes_is_noop() {
        let state = DeploymentState::new();
        let d = policy().decide(&state, &ChangeReport::new(), DeployClass::Auto, NOW);
        assert!(!d.action.is_deploy());
        assert_eq!(d.accumulated, 0);
    }

    // === helpers ===

    #[test]
    fn zero_cooldown_is_always_satisfied() {
        assert_eq!(cooldown_remaining(NOW, 0, NOW), None);
    }

    #[test]
    fn never_deployed_satisfies_cooldown() {
        assert_eq!(cooldown_remaining(0, 300, NOW), None);
    }

    #[test]
    fn action_display_is_readable() {
        assert_eq!(
            DeployAction::NoOp(NoOpReason::BelowThreshold { remaining: 3 }).to_string(),
            "no-op: 3 more change(s) needed before report regeneration"
        );
        assert_eq!(DeployAction::DeployHomepage.name(), "deploy_homepage");
    }
}
