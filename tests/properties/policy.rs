//! Property tests for the deployment decision table.

use proptest::prelude::*;

use prospector_deploy::domain::entities::{ChangeReport, DeploymentState};
use prospector_deploy::domain::policies::{
    cooldown_remaining, DeployAction, DeployPolicy, PolicySettings, ReportTrigger,
};
use prospector_deploy::{DeployClass, DeployKind};

const NOW: i64 = 1_700_000_000;

fn class() -> impl Strategy<Value = DeployClass> {
    prop_oneof![
        Just(DeployClass::Homepage),
        Just(DeployClass::Reports),
        Just(DeployClass::Auto),
    ]
}

fn settings() -> impl Strategy<Value = PolicySettings> {
    (1u32..20, 0u64..3_600, 0u64..3_600).prop_map(|(threshold, homepage, report)| {
        PolicySettings {
            changes_threshold: threshold,
            homepage_cooldown: homepage,
            report_cooldown: report,
        }
    })
}

fn changes() -> impl Strategy<Value = ChangeReport> {
    (any::<bool>(), 0u32..12, any::<bool>()).prop_map(|(homepage, reports, code)| ChangeReport {
        homepage_changed: homepage,
        reports_changed: reports > 0,
        code_changed: code,
        total_changes: u32::from(homepage) + reports + u32::from(code),
        changed_paths: Vec::new(),
    })
}

fn state() -> impl Strategy<Value = DeploymentState> {
    (0u32..40, 0i64..7_200, 0i64..7_200).prop_map(|(accumulated, since_home, since_report)| {
        DeploymentState {
            changes_since_last_report_deploy: accumulated,
            last_homepage_deploy: NOW - since_home,
            last_report_deploy: NOW - since_report,
            ..DeploymentState::new()
        }
    })
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: the accumulator is the stored count plus this pass's changes.
    #[test]
    fn property_accumulator_adds_detected_changes(
        settings in settings(),
        state in state(),
        changes in changes(),
        class in class(),
    ) {
        let decision = DeployPolicy::new(settings).decide(&state, &changes, class, NOW);
        prop_assert_eq!(
            decision.accumulated,
            state.changes_since_last_report_deploy + changes.total_changes
        );
    }

    /// PROPERTY: a deploy is only dispatched when its cooldown has elapsed,
    /// except report regeneration forced by a code change.
    #[test]
    fn property_deploys_respect_cooldowns(
        settings in settings(),
        state in state(),
        changes in changes(),
        class in class(),
    ) {
        let action = DeployPolicy::new(settings).decide(&state, &changes, class, NOW).action;
        match action {
            DeployAction::DeployHomepage => {
                prop_assert!(changes.homepage_changed);
                prop_assert!(cooldown_remaining(
                    state.last_homepage_deploy,
                    settings.homepage_cooldown,
                    NOW
                ).is_none());
            }
            DeployAction::DeployReports(ReportTrigger::CodeChanged) => {
                prop_assert!(changes.code_changed);
            }
            DeployAction::DeployReports(_) => {
                prop_assert!(cooldown_remaining(
                    state.last_report_deploy,
                    settings.report_cooldown,
                    NOW
                ).is_none());
            }
            DeployAction::Wait { remaining_secs, .. } => prop_assert!(remaining_secs > 0),
            DeployAction::NoOp(_) => {}
        }
    }

    /// PROPERTY: each class only ever dispatches its own kind of deploy.
    #[test]
    fn property_class_limits_deploy_kind(
        settings in settings(),
        state in state(),
        changes in changes(),
    ) {
        let policy = DeployPolicy::new(settings);

        let homepage = policy.decide(&state, &changes, DeployClass::Homepage, NOW).action;
        prop_assert_ne!(homepage.deploy_kind(), Some(DeployKind::Reports));

        let reports = policy.decide(&state, &changes, DeployClass::Reports, NOW).action;
        prop_assert_ne!(reports.deploy_kind(), Some(DeployKind::Homepage));
    }

    /// PROPERTY: in auto mode, a code change always leads to report
    /// regeneration unless an eligible homepage deploy goes first.
    #[test]
    fn property_auto_code_change_regenerates_reports(
        settings in settings(),
        state in state(),
        mut changes in changes(),
    ) {
        changes.code_changed = true;
        changes.total_changes += 1;
        let action = DeployPolicy::new(settings)
            .decide(&state, &changes, DeployClass::Auto, NOW)
            .action;
        prop_assert!(matches!(
            action,
            DeployAction::DeployHomepage | DeployAction::DeployReports(ReportTrigger::CodeChanged)
        ));
    }

    /// PROPERTY: a zero cooldown is always satisfied.
    #[test]
    fn property_zero_cooldown_never_waits(last in any::<i64>(), now in any::<i64>()) {
        prop_assert_eq!(cooldown_remaining(last, 0, now), None);
    }
}
