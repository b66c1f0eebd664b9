//! Common test utilities for CLI contract tests.
//!
//! `TestEnv` gives each test an isolated project root and home directory and
//! runs the compiled `prospector-deploy` binary against them.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::TempDir;

/// Exit status used when another process holds the deployment lock
pub const EXIT_CONTENDED: i32 = 75;

/// Result of running the CLI
#[derive(Debug)]
pub struct TestResult {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl TestResult {
    pub fn is_success(&self) -> bool {
        self.exit_code == 0
    }

    /// Parse every stdout line as a JSON object
    pub fn json_lines(&self) -> Vec<serde_json::Value> {
        self.stdout
            .lines()
            .filter(|l| !l.trim().is_empty())
            .map(|l| {
                serde_json::from_str(l)
                    .unwrap_or_else(|e| panic!("stdout line is not JSON ({e}): {l}"))
            })
            .collect()
    }

    /// First JSON event with the given `event` name
    pub fn event(&self, name: &str) -> Option<serde_json::Value> {
        self.json_lines().into_iter().find(|v| v["event"] == name)
    }

    pub fn combined_output(&self) -> String {
        format!("{}\n{}", self.stdout, self.stderr)
    }
}

/// Isolated project + home directory
pub struct TestEnv {
    pub project_root: TempDir,
    pub home_dir: TempDir,
    bin: PathBuf,
}

impl TestEnv {
    pub fn new() -> Self {
        Self {
            project_root: tempfile::tempdir().expect("project tempdir"),
            home_dir: tempfile::tempdir().expect("home tempdir"),
            bin: PathBuf::from(env!("CARGO_BIN_EXE_prospector-deploy")),
        }
    }

    /// A project with the generator code file, a homepage and two reports
    pub fn with_site() -> Self {
        let env = Self::new();
        env.write("nyc_odcv_prospector.py", "print('generate')\n");
        env.write(
            "building_reports/index.html",
            "<html><link href=\"style.css\"></html>\n",
        );
        env.write("building_reports/100_main_st.html", "<p>100 Main St</p>\n");
        env.write("building_reports/200_broadway.html", "<p>200 Broadway</p>\n");
        env
    }

    pub fn root(&self) -> &Path {
        self.project_root.path()
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.root().join(relative)
    }

    pub fn write(&self, relative: &str, content: &str) {
        let path = self.path(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create parent directories");
        }
        std::fs::write(&path, content).expect("write project file");
    }

    pub fn read(&self, relative: &str) -> String {
        std::fs::read_to_string(self.path(relative))
            .unwrap_or_else(|e| panic!("read {relative}: {e}"))
    }

    /// Parsed `deployment_state.json`
    pub fn state(&self) -> serde_json::Value {
        serde_json::from_str(&self.read("deployment_state.json")).expect("state is JSON")
    }

    pub fn run(&self, args: &[&str]) -> TestResult {
        self.run_with_env(args, &[])
    }

    pub fn run_with_env(&self, args: &[&str], env_vars: &[(&str, &str)]) -> TestResult {
        let mut cmd = Command::new(&self.bin);
        cmd.current_dir(self.root())
            .args(args)
            .env("HOME", self.home_dir.path())
            .env("XDG_CONFIG_HOME", self.home_dir.path().join(".config"))
            .env("NO_COLOR", "1")
            .env_remove("RUST_LOG")
            .env_remove("GITHUB_ACTIONS");
        for key in [
            "PROSPECTOR_CHANGES_THRESHOLD",
            "PROSPECTOR_HOMEPAGE_COOLDOWN",
            "PROSPECTOR_REPORT_COOLDOWN",
            "PROSPECTOR_STATE_FILE",
            "PROSPECTOR_LOCK_FILE",
            "PROSPECTOR_FIRST_OBSERVATION",
        ] {
            cmd.env_remove(key);
        }
        for (key, value) in env_vars {
            cmd.env(key, value);
        }

        let output = cmd.output().expect("failed to execute prospector-deploy");
        TestResult {
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        }
    }
}

/// `deploy.toml` that replaces the real publish commands with shell stubs
pub fn stub_config(reports_command: &str) -> String {
    format!(
        r#"[publish]
homepage_command = ["sh", "-c", "echo homepage >> publish.log"]
reports_command = ["sh", "-c", "{reports_command}"]
git = "true"
"#
    )
}
