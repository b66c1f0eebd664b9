//! Configuration type definitions

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::application::WatchOptions;
use crate::domain::policies::PolicySettings;
use crate::domain::services::DetectorSettings;
use crate::domain::value_objects::{FirstObservation, ReportGlob};
use crate::error::{DeployError, DeployResult};
use crate::infrastructure::PublishSettings;

/// `[policy]` - decision table tunables
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    pub changes_threshold: u32,
    /// Seconds
    pub homepage_cooldown: u64,
    /// Seconds
    pub report_cooldown: u64,
    /// Report files fingerprinted per detection pass
    pub report_sample_size: usize,
    pub first_observation: FirstObservation,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        let settings = PolicySettings::default();
        Self {
            changes_threshold: settings.changes_threshold,
            homepage_cooldown: settings.homepage_cooldown,
            report_cooldown: settings.report_cooldown,
            report_sample_size: 10,
            first_observation: FirstObservation::default(),
        }
    }
}

/// `[paths]` - tracked files and coordinator files, relative to the project root
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub code_file: PathBuf,
    pub homepage: PathBuf,
    pub reports_dir: PathBuf,
    pub reports_glob: String,
    pub state_file: PathBuf,
    pub lock_file: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            code_file: PathBuf::from("nyc_odcv_prospector.py"),
            homepage: PathBuf::from("building_reports/index.html"),
            reports_dir: PathBuf::from("building_reports"),
            reports_glob: "*.html".to_string(),
            state_file: PathBuf::from("deployment_state.json"),
            lock_file: PathBuf::from("deployment.lock"),
        }
    }
}

/// `[lock]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LockConfig {
    /// A live holder older than this is flagged as stale
    pub stale_after_secs: u64,
}

impl Default for LockConfig {
    fn default() -> Self {
        Self {
            stale_after_secs: 3600,
        }
    }
}

/// `[publish]` - command lines for the publish chains
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PublishConfig {
    pub homepage_command: Vec<String>,
    pub reports_command: Vec<String>,
    /// Unset: use the built-in rewriter
    pub cache_bust_command: Option<Vec<String>>,
    pub stage_paths: Vec<String>,
    pub optional_stage_paths: Vec<String>,
    pub git: String,
    pub remote: String,
    pub branch: String,
    pub commit_message: String,
}

impl Default for PublishConfig {
    fn default() -> Self {
        let defaults = PublishSettings::new(".", default_glob());
        Self {
            homepage_command: defaults.homepage_command,
            reports_command: defaults.reports_command,
            cache_bust_command: None,
            stage_paths: defaults.stage_paths,
            optional_stage_paths: defaults.optional_stage_paths,
            git: defaults.git,
            remote: defaults.remote,
            branch: defaults.branch,
            commit_message: defaults.commit_message,
        }
    }
}

/// `[watch]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchConfig {
    pub paths: Vec<PathBuf>,
    pub debounce_ms: u64,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            paths: vec![
                PathBuf::from("nyc_odcv_prospector.py"),
                PathBuf::from("building_reports/index.html"),
                PathBuf::from("data_for_viz"),
                PathBuf::from("final_building_rankings.csv"),
            ],
            debounce_ms: crate::application::watch::DEBOUNCE_MS,
        }
    }
}

/// Coordinator configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub policy: PolicyConfig,
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub lock: LockConfig,
    #[serde(default)]
    pub publish: PublishConfig,
    #[serde(default)]
    pub watch: WatchConfig,
}

fn default_glob() -> ReportGlob {
    match ReportGlob::new("*.html") {
        Ok(glob) => glob,
        Err(e) => unreachable!("built-in glob is valid: {e}"),
    }
}

impl Config {
    /// Load a single file (no layering, no env overrides)
    pub fn load(path: &Path) -> DeployResult<Self> {
        super::loader::load_with_warnings(path).map(|(config, _)| config)
    }

    /// Reject values that would only fail later, mid-deploy
    pub fn validate(&self, source: &Path) -> DeployResult<()> {
        let invalid = |message: String| DeployError::InvalidConfig {
            file: source.to_path_buf(),
            message,
        };

        ReportGlob::new(&self.paths.reports_glob)?;
        if self.policy.report_sample_size == 0 {
            return Err(invalid("policy.report_sample_size must be at least 1".into()));
        }
        if self.publish.reports_command.is_empty() {
            return Err(invalid("publish.reports_command must not be empty".into()));
        }
        if self.publish.stage_paths.is_empty() {
            return Err(invalid("publish.stage_paths must not be empty".into()));
        }
        if let Some(cmd) = &self.publish.cache_bust_command {
            if cmd.is_empty() {
                return Err(invalid(
                    "publish.cache_bust_command must not be empty (remove it to use the built-in rewriter)"
                        .into(),
                ));
            }
        }
        if has_bad_strftime(&self.publish.commit_message) {
            return Err(invalid(format!(
                "publish.commit_message '{}' is not a valid strftime format",
                self.publish.commit_message
            )));
        }
        Ok(())
    }

    pub fn policy_settings(&self) -> PolicySettings {
        PolicySettings {
            changes_threshold: self.policy.changes_threshold,
            homepage_cooldown: self.policy.homepage_cooldown,
            report_cooldown: self.policy.report_cooldown,
        }
    }

    pub fn detector_settings(&self) -> DeployResult<DetectorSettings> {
        Ok(DetectorSettings {
            code_file: self.paths.code_file.clone(),
            homepage: self.paths.homepage.clone(),
            reports_dir: self.paths.reports_dir.clone(),
            report_glob: ReportGlob::new(&self.paths.reports_glob)?,
            sample_size: self.policy.report_sample_size,
            first_observation: self.policy.first_observation,
        })
    }

    pub fn publish_settings(&self, root: &Path) -> DeployResult<PublishSettings> {
        let mut settings = PublishSettings::new(root, ReportGlob::new(&self.paths.reports_glob)?);
        settings.homepage_command = self.publish.homepage_command.clone();
        settings.reports_command = self.publish.reports_command.clone();
        settings.cache_bust_command = self.publish.cache_bust_command.clone();
        settings.cache_bust_dir = self.paths.reports_dir.clone();
        settings.stage_paths = self.publish.stage_paths.clone();
        settings.optional_stage_paths = self.publish.optional_stage_paths.clone();
        settings.git = self.publish.git.clone();
        settings.remote = self.publish.remote.clone();
        settings.branch = self.publish.branch.clone();
        settings.commit_message = self.publish.commit_message.clone();
        Ok(settings)
    }

    pub fn watch_options(&self, root: &Path) -> WatchOptions {
        WatchOptions::new(root)
            .with_paths(self.watch.paths.clone())
            .with_code_file(&self.paths.code_file)
            .with_homepage(&self.paths.homepage)
            .with_debounce(Duration::from_millis(self.watch.debounce_ms))
    }

    pub fn state_path(&self, root: &Path) -> PathBuf {
        root.join(&self.paths.state_file)
    }

    pub fn lock_path(&self, root: &Path) -> PathBuf {
        root.join(&self.paths.lock_file)
    }
}

fn has_bad_strftime(format: &str) -> bool {
    use chrono::format::{Item, StrftimeItems};
    StrftimeItems::new(format).any(|item| matches!(item, Item::Error))
}
