//! Watch module tests

use super::*;
use std::path::PathBuf;
use std::time::Duration;

use crate::domain::value_objects::DeployClass;

fn options() -> WatchOptions {
    WatchOptions::new("/site").with_paths(vec![
        PathBuf::from("nyc_odcv_prospector.py"),
        PathBuf::from("building_reports/index.html"),
        PathBuf::from("data_for_viz"),
        PathBuf::from("final_building_rankings.csv"),
    ])
}

#[test]
fn code_change_classifies_as_reports() {
    let changes = vec![
        PathBuf::from("/site/building_reports/index.html"),
        PathBuf::from("/site/nyc_odcv_prospector.py"),
    ];
    assert_eq!(classify_batch(&changes, &options()), DeployClass::Reports);
}

#[test]
fn homepage_change_classifies_as_homepage() {
    let changes = vec![PathBuf::from("/site/building_reports/index.html")];
    assert_eq!(classify_batch(&changes, &options()), DeployClass::Homepage);
}

#[test]
fn data_change_classifies_as_auto() {
    let changes = vec![PathBuf::from("/site/data_for_viz/borough.json")];
    assert_eq!(classify_batch(&changes, &options()), DeployClass::Auto);
}

#[test]
fn tracked_paths_include_directory_contents() {
    let opts = options();
    assert!(opts.is_tracked(&PathBuf::from("/site/data_for_viz/a/b.json")));
    assert!(opts.is_tracked(&PathBuf::from("/site/final_building_rankings.csv")));
    assert!(!opts.is_tracked(&PathBuf::from("/site/building_reports/1001.html")));
    assert!(!opts.is_tracked(&PathBuf::from("/site/deployment_state.json")));
}

#[test]
fn watcher_state_waits_for_debounce() {
    let mut state = WatcherState::new(Duration::from_secs(60));
    assert!(!state.should_run());

    state.add_change(PathBuf::from("/site/a"));
    state.add_change(PathBuf::from("/site/a"));
    assert!(state.has_pending());
    assert!(!state.should_run());

    assert_eq!(state.take_changes(), vec![PathBuf::from("/site/a")]);
    assert!(!state.has_pending());
}

#[test]
fn watcher_state_runs_after_zero_debounce() {
    let mut state = WatcherState::new(Duration::ZERO);
    state.add_change(PathBuf::from("/site/b"));
    assert!(state.should_run());
}

#[test]
fn watch_event_json_has_command_field() {
    let json = WatchEvent::RunStarted {
        class: "auto".to_string(),
    }
    .to_json();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["event"], "run_started");
    assert_eq!(value["command"], "watch");
    assert_eq!(value["class"], "auto");
}
