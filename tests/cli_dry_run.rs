mod common;

use common::*;

#[test]
fn dry_run_reports_decision_without_side_effects() {
    let env = TestEnv::with_site();

    let result = env.run(&["reports", "--dry-run"]);

    assert!(result.is_success(), "{}", result.combined_output());
    assert!(result
        .stdout
        .contains("Dry run: would deploy full reports (requested)"));
    assert!(!env.path("deployment_state.json").exists());
    assert!(!env.path("publish.log").exists());
}

#[test]
fn dry_run_json_marks_completion() {
    let env = TestEnv::with_site();

    let result = env.run(&["auto", "--dry-run", "--json"]);

    assert!(result.is_success(), "{}", result.combined_output());
    let start = result.event("start").expect("start event");
    assert_eq!(start["dry_run"], true);
    let complete = result.event("complete").expect("complete event");
    assert_eq!(complete["dry_run"], true);
    assert_eq!(complete["success"], true);
    assert!(!env.path("deployment_state.json").exists());
}

#[test]
fn bare_invocation_runs_auto() {
    let env = TestEnv::with_site();

    let result = env.run(&["--json"]);

    assert!(result.is_success(), "{}", result.combined_output());
    assert_eq!(result.event("start").unwrap()["class"], "auto");
    assert_eq!(result.event("decision").unwrap()["action"], "noop");
}
