mod common;

use common::*;

#[test]
fn invalid_config_is_fatal_and_names_file() {
    let env = TestEnv::new();
    env.write("deploy.toml", "[policy]\nchanges_threshold = \"lots\"\n");

    let result = env.run(&["status"]);

    assert_eq!(result.exit_code, 1);
    assert!(result.stderr.contains("invalid configuration in"));
    assert!(result.stderr.contains("deploy.toml"));
}

#[test]
fn unknown_config_key_warns_and_continues() {
    let env = TestEnv::new();
    env.write("deploy.toml", "[policy]\nreport_cooldwn = 60\n");

    let result = env.run(&["status"]);

    assert!(result.is_success(), "{}", result.combined_output());
    assert!(result.stderr.contains("unknown config key 'report_cooldwn'"));
    assert!(result.stderr.contains("did you mean 'report_cooldown'?"));
}

#[test]
fn missing_explicit_config_is_fatal() {
    let env = TestEnv::new();

    let result = env.run(&["status", "--config", "nope.toml"]);

    assert_eq!(result.exit_code, 1);
    assert!(result.stderr.contains("configuration file not found"));
}

#[test]
fn user_config_applies_when_project_has_none() {
    let env = TestEnv::new();
    let user_config = env.home_dir.path().join(".config/prospector/deploy.toml");
    std::fs::create_dir_all(user_config.parent().unwrap()).unwrap();
    std::fs::write(&user_config, "[policy]\nchanges_threshold = 9\n").unwrap();

    let result = env.run(&["status", "--json"]);

    assert!(result.is_success(), "{}", result.combined_output());
    assert_eq!(result.event("status").unwrap()["changes_threshold"], 9);
}

#[test]
fn environment_overrides_config_file() {
    let env = TestEnv::new();
    env.write("deploy.toml", "[policy]\nchanges_threshold = 9\n");

    let result = env.run_with_env(
        &["status", "--json"],
        &[("PROSPECTOR_CHANGES_THRESHOLD", "2")],
    );

    assert!(result.is_success(), "{}", result.combined_output());
    assert_eq!(result.event("status").unwrap()["changes_threshold"], 2);
}

#[test]
fn missing_root_is_fatal() {
    let env = TestEnv::new();

    let result = env.run(&["status", "--root", "does/not/exist"]);

    assert_eq!(result.exit_code, 1);
    assert!(result.stderr.contains("directory not found"));
}
