use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use prospector_deploy::config::{load_layered, ConfigWarning};
use prospector_deploy::domain::policies::DeployPolicy;
use prospector_deploy::domain::services::ChangeDetector;
use prospector_deploy::infrastructure::{
    CommandPublisher, FileDeployLock, JsonStateRepository, LocalFs, SystemClock,
    SystemCommandRunner,
};
use prospector_deploy::{Config, DeployError, DeployUseCase};

use crate::ui::ci::{github_actions_annotation, AnnotationLevel};

/// Fully wired coordinator for a project on the local machine
pub type LocalDeployUseCase = DeployUseCase<
    JsonStateRepository,
    FileDeployLock,
    LocalFs,
    CommandPublisher<SystemCommandRunner, LocalFs>,
    SystemClock,
>;

/// Resolved project root plus its effective configuration
#[derive(Debug, Clone)]
pub struct Project {
    pub root: PathBuf,
    pub config: Config,
}

impl Project {
    pub fn load(root: Option<&Path>, config: Option<&Path>) -> Result<Self> {
        let root = match root {
            Some(root) => root.to_path_buf(),
            None => std::env::current_dir().context("resolving current directory")?,
        };
        if !root.is_dir() {
            return Err(DeployError::DirectoryNotFound { path: root }.into());
        }

        let loaded = load_layered(&root, config)?;
        print_config_warnings(&loaded.warnings);
        if let Some(source) = &loaded.source {
            tracing::debug!(config = %source.display(), root = %root.display(), "configuration resolved");
        }

        Ok(Self {
            root,
            config: loaded.config,
        })
    }

    pub fn state_repository(&self) -> JsonStateRepository {
        JsonStateRepository::new(self.config.state_path(&self.root))
    }

    pub fn lock(&self) -> FileDeployLock {
        FileDeployLock::new(self.config.lock_path(&self.root))
    }

    pub fn deploy_use_case(&self) -> Result<LocalDeployUseCase> {
        let detector =
            ChangeDetector::new(LocalFs::new(), &self.root, self.config.detector_settings()?);
        let publisher = CommandPublisher::new(
            SystemCommandRunner::new(),
            LocalFs::new(),
            self.config.publish_settings(&self.root)?,
        );

        Ok(DeployUseCase::new(
            self.state_repository(),
            self.lock(),
            detector,
            DeployPolicy::new(self.config.policy_settings()),
            publisher,
            SystemClock,
        )
        .with_stale_after(self.config.lock.stale_after_secs))
    }
}

/// Unknown keys go to stderr so stdout stays machine-readable under `--json`
pub fn print_config_warnings(warnings: &[ConfigWarning]) {
    let github_actions = std::env::var_os("GITHUB_ACTIONS").is_some();
    for line in config_warning_lines(warnings, github_actions) {
        eprintln!("{}", line);
    }
}

/// Under GitHub Actions each warning is also raised as a workflow annotation
fn config_warning_lines(warnings: &[ConfigWarning], github_actions: bool) -> Vec<String> {
    let mut lines = Vec::with_capacity(warnings.len() * 2);
    for w in warnings {
        if github_actions {
            let file = w.file.display().to_string();
            lines.push(github_actions_annotation(
                AnnotationLevel::Warning,
                &w.to_string(),
                Some(&file),
                Some("prospector-deploy config"),
            ));
        }
        lines.push(format!("⚠ {}", w));
    }
    lines
}
