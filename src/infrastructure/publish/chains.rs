//! Publish chains
//!
//! Homepage: generate → cache-bust → stage → commit (if staged) → push.
//! Reports: the full regeneration pipeline as one step.
//!
//! Generation and cache-busting are soft steps; a failure is recorded and the
//! chain continues with the existing artifact. Everything that touches git is
//! required.

use std::path::PathBuf;

use tracing::{debug, info, warn};

use crate::domain::ports::{
    CommandRunner, CommandSpec, DeployEvent, DeployEventSink, FileSystem, PublishReport,
    PublishStep, Publisher, StepOutcome, StepReport,
};
use crate::domain::services::{default_token, CacheBuster};
use crate::domain::value_objects::{DeployKind, ReportGlob};

/// Command lines and git settings for the chains
#[derive(Debug, Clone)]
pub struct PublishSettings {
    /// Project root; every command runs here
    pub root: PathBuf,
    pub homepage_command: Vec<String>,
    pub reports_command: Vec<String>,
    /// External rewriter; `None` uses the built-in one
    pub cache_bust_command: Option<Vec<String>>,
    /// Directory the built-in rewriter processes
    pub cache_bust_dir: PathBuf,
    pub cache_bust_glob: ReportGlob,
    /// Paths whose staging must succeed
    pub stage_paths: Vec<String>,
    /// Paths staged best-effort (may be ignored by git)
    pub optional_stage_paths: Vec<String>,
    pub git: String,
    pub remote: String,
    pub branch: String,
    /// strftime format for the commit message, local time
    pub commit_message: String,
}

impl PublishSettings {
    pub fn new(root: impl Into<PathBuf>, cache_bust_glob: ReportGlob) -> Self {
        Self {
            root: root.into(),
            homepage_command: vec!["python3".into(), "generate_homepage_only.py".into()],
            reports_command: vec!["bash".into(), "deploy_reports.sh".into()],
            cache_bust_command: None,
            cache_bust_dir: PathBuf::from("building_reports"),
            cache_bust_glob,
            stage_paths: vec!["building_reports/index.html".into()],
            optional_stage_paths: vec!["deployment_state.json".into()],
            git: "git".into(),
            remote: "origin".into(),
            branch: "main".into(),
            commit_message: "Homepage update: %Y-%m-%d %H:%M:%S".into(),
        }
    }
}

pub struct CommandPublisher<R: CommandRunner, FS: FileSystem> {
    runner: R,
    buster: CacheBuster<FS>,
    settings: PublishSettings,
}

impl<R: CommandRunner, FS: FileSystem> CommandPublisher<R, FS> {
    pub fn new(runner: R, fs: FS, settings: PublishSettings) -> Self {
        let buster = CacheBuster::new(fs, settings.cache_bust_glob.clone());
        Self {
            runner,
            buster,
            settings,
        }
    }

    fn command(&self, argv: &[String]) -> Option<CommandSpec> {
        CommandSpec::from_argv(argv).map(|spec| spec.current_dir(&self.settings.root))
    }

    fn git<I, S>(&self, args: I) -> CommandSpec
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        CommandSpec::new(self.settings.git.clone())
            .args(args)
            .current_dir(&self.settings.root)
    }

    fn run_to_outcome(&self, spec: &CommandSpec) -> StepOutcome {
        match self.runner.run(spec) {
            Ok(out) if out.success() => StepOutcome::Succeeded,
            Ok(out) => StepOutcome::Failed {
                reason: out.describe_failure(),
            },
            Err(e) => StepOutcome::Failed {
                reason: format!("failed to start '{}': {}", spec.program, e),
            },
        }
    }

    fn run_argv(&self, argv: &[String]) -> StepOutcome {
        match self.command(argv) {
            Some(spec) => self.run_to_outcome(&spec),
            None => StepOutcome::Skipped {
                reason: "no command configured".to_string(),
            },
        }
    }

    /// Run one step, emit its events and append it. Returns false if the chain must stop.
    fn step(
        &self,
        report: &mut PublishReport,
        events: &dyn DeployEventSink,
        step: PublishStep,
        required: bool,
        run: impl FnOnce() -> StepOutcome,
    ) -> bool {
        let kind = report.kind;
        events.on_event(DeployEvent::StepStarted { kind, step });

        let result = StepReport {
            step,
            outcome: run(),
            required,
        };
        match &result.outcome {
            StepOutcome::Succeeded => info!(kind = %kind, step = %step, "step succeeded"),
            StepOutcome::Skipped { reason } => {
                info!(kind = %kind, step = %step, reason = %reason, "step skipped")
            }
            StepOutcome::Failed { reason } => {
                warn!(kind = %kind, step = %step, required, reason = %reason, "step failed")
            }
        }

        let fatal = result.is_fatal();
        events.on_event(DeployEvent::StepFinished {
            kind,
            report: result.clone(),
        });
        report.steps.push(result);
        !fatal
    }

    fn cache_bust(&self) -> StepOutcome {
        if let Some(argv) = &self.settings.cache_bust_command {
            return self.run_argv(argv);
        }

        let dir = self.settings.root.join(&self.settings.cache_bust_dir);
        let summary = self.buster.bust_directory(&dir, &default_token());
        info!(
            scanned = summary.scanned,
            updated = summary.updated.len(),
            "cache-busting pass finished"
        );
        match summary.errors.first() {
            None => StepOutcome::Succeeded,
            Some((path, err)) => StepOutcome::Failed {
                reason: format!(
                    "{} file(s) failed, first {}: {}",
                    summary.errors.len(),
                    path.display(),
                    err
                ),
            },
        }
    }

    fn stage(&self) -> StepOutcome {
        let mut args = vec!["add".to_string(), "--".to_string()];
        args.extend(self.settings.stage_paths.iter().cloned());
        let outcome = self.run_to_outcome(&self.git(args));
        if outcome.is_failure() {
            return outcome;
        }

        for path in &self.settings.optional_stage_paths {
            if let StepOutcome::Failed { reason } =
                self.run_to_outcome(&self.git(["add", "--", path.as_str()]))
            {
                debug!(path = %path, reason = %reason, "optional path not staged");
            }
        }
        outcome
    }

    /// `Ok(true)` when something is staged
    fn has_staged_changes(&self) -> Result<bool, String> {
        let spec = self.git(["diff", "--cached", "--quiet"]);
        match self.runner.run(&spec) {
            Ok(out) => match out.code {
                Some(0) => Ok(false),
                Some(1) => Ok(true),
                _ => Err(out.describe_failure()),
            },
            Err(e) => Err(format!("failed to start '{}': {}", spec.program, e)),
        }
    }

    fn homepage_chain(&self, events: &dyn DeployEventSink) -> PublishReport {
        let mut report = PublishReport::new(DeployKind::Homepage);

        self.step(&mut report, events, PublishStep::GenerateHomepage, false, || {
            self.run_argv(&self.settings.homepage_command)
        });
        self.step(&mut report, events, PublishStep::CacheBust, false, || {
            self.cache_bust()
        });
        if !self.step(&mut report, events, PublishStep::Stage, true, || self.stage()) {
            return report;
        }

        let mut committed = false;
        let proceed = self.step(&mut report, events, PublishStep::Commit, true, || {
            match self.has_staged_changes() {
                Ok(false) => StepOutcome::Skipped {
                    reason: "no staged changes".to_string(),
                },
                Ok(true) => {
                    let message = chrono::Local::now()
                        .format(&self.settings.commit_message)
                        .to_string();
                    let outcome = self.run_to_outcome(&self.git(["commit", "-m", message.as_str()]));
                    committed = !outcome.is_failure();
                    outcome
                }
                Err(reason) => StepOutcome::Failed { reason },
            }
        });
        if !proceed {
            return report;
        }

        self.step(&mut report, events, PublishStep::Push, true, || {
            if committed {
                self.run_to_outcome(&self.git([
                    "push",
                    self.settings.remote.as_str(),
                    self.settings.branch.as_str(),
                ]))
            } else {
                StepOutcome::Skipped {
                    reason: "nothing committed".to_string(),
                }
            }
        });
        report
    }

    fn reports_chain(&self, events: &dyn DeployEventSink) -> PublishReport {
        let mut report = PublishReport::new(DeployKind::Reports);
        self.step(&mut report, events, PublishStep::GenerateReports, true, || {
            self.run_argv(&self.settings.reports_command)
        });
        report
    }
}

impl<R: CommandRunner, FS: FileSystem> Publisher for CommandPublisher<R, FS> {
    fn publish(&self, kind: DeployKind, events: &dyn DeployEventSink) -> PublishReport {
        info!(kind = %kind, "publishing");
        match kind {
            DeployKind::Homepage => self.homepage_chain(events),
            DeployKind::Reports => self.reports_chain(events),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{CommandOutput, NoopEventSink};
    use crate::infrastructure::fs::LocalFs;
    use std::cell::RefCell;
    use tempfile::tempdir;

    /// Records commands; exit codes are scripted by command-line prefix
    struct ScriptedRunner {
        script: Vec<(&'static str, Option<i32>)>,
        calls: RefCell<Vec<String>>,
    }

    impl ScriptedRunner {
        fn new(script: Vec<(&'static str, Option<i32>)>) -> Self {
            Self {
                script,
                calls: RefCell::new(Vec::new()),
            }
        }
    }

    impl CommandRunner for &ScriptedRunner {
        fn run(&self, spec: &CommandSpec) -> std::io::Result<CommandOutput> {
            let line = spec.to_string();
            self.calls.borrow_mut().push(line.clone());
            let code = self
                .script
                .iter()
                .find(|(prefix, _)| line.starts_with(prefix))
                .map(|(_, code)| *code)
                .unwrap_or(Some(0));
            Ok(CommandOutput {
                code,
                stderr_tail: String::new(),
            })
        }
    }

    fn publisher<'a>(
        runner: &'a ScriptedRunner,
        root: &std::path::Path,
    ) -> CommandPublisher<&'a ScriptedRunner, LocalFs> {
        let settings = PublishSettings::new(root, ReportGlob::new("*.html").unwrap());
        CommandPublisher::new(runner, LocalFs::new(), settings)
    }

    fn outcomes(report: &PublishReport) -> Vec<(PublishStep, &'static str)> {
        report
            .steps
            .iter()
            .map(|s| (s.step, s.outcome.as_str()))
            .collect()
    }

    #[test]
    fn homepage_chain_commits_and_pushes() {
        let dir = tempdir().unwrap();
        let runner = ScriptedRunner::new(vec![("git diff --cached --quiet", Some(1))]);

        let report = publisher(&runner, dir.path()).publish(DeployKind::Homepage, &NoopEventSink);

        assert!(report.is_success());
        let calls = runner.calls.borrow();
        assert_eq!(calls[0], "python3 generate_homepage_only.py");
        assert_eq!(calls[1], "git add -- building_reports/index.html");
        assert_eq!(calls[2], "git add -- deployment_state.json");
        assert_eq!(calls[3], "git diff --cached --quiet");
        assert!(calls[4].starts_with("git commit -m \"Homepage update: "));
        assert_eq!(calls[5], "git push origin main");
    }

    #[test]
    fn generation_failure_is_soft() {
        let dir = tempdir().unwrap();
        let runner = ScriptedRunner::new(vec![
            ("python3", Some(1)),
            ("git diff", Some(1)),
        ]);

        let report = publisher(&runner, dir.path()).publish(DeployKind::Homepage, &NoopEventSink);

        assert!(report.is_success());
        assert_eq!(report.degraded_steps().count(), 2);
        assert_eq!(report.steps[0].outcome.as_str(), "failed");
    }

    #[test]
    fn nothing_staged_skips_commit_and_push() {
        let dir = tempdir().unwrap();
        std::fs::create_dir(dir.path().join("building_reports")).unwrap();
        let runner = ScriptedRunner::new(vec![("git diff --cached --quiet", Some(0))]);

        let report = publisher(&runner, dir.path()).publish(DeployKind::Homepage, &NoopEventSink);

        assert!(report.is_success());
        assert_eq!(
            outcomes(&report),
            vec![
                (PublishStep::GenerateHomepage, "succeeded"),
                (PublishStep::CacheBust, "succeeded"),
                (PublishStep::Stage, "succeeded"),
                (PublishStep::Commit, "skipped"),
                (PublishStep::Push, "skipped"),
            ]
        );
        assert!(!runner.calls.borrow().iter().any(|c| c.starts_with("git push")));
    }

    #[test]
    fn push_failure_fails_chain() {
        let dir = tempdir().unwrap();
        let runner = ScriptedRunner::new(vec![
            ("git diff --cached --quiet", Some(1)),
            ("git push", Some(128)),
        ]);

        let report = publisher(&runner, dir.path()).publish(DeployKind::Homepage, &NoopEventSink);

        assert!(!report.is_success());
        assert_eq!(report.fatal_step().unwrap().step, PublishStep::Push);
        assert_eq!(
            report.failure_reason().as_deref(),
            Some("push: exit status 128")
        );
    }

    #[test]
    fn stage_failure_stops_chain() {
        let dir = tempdir().unwrap();
        let runner = ScriptedRunner::new(vec![("git add -- building_reports", Some(128))]);

        let report = publisher(&runner, dir.path()).publish(DeployKind::Homepage, &NoopEventSink);

        assert!(!report.is_success());
        assert_eq!(report.steps.last().unwrap().step, PublishStep::Stage);
        assert!(!runner.calls.borrow().iter().any(|c| c.starts_with("git commit")));
    }

    #[test]
    fn builtin_cache_bust_rewrites_homepage() {
        let dir = tempdir().unwrap();
        let reports = dir.path().join("building_reports");
        std::fs::create_dir(&reports).unwrap();
        std::fs::write(reports.join("index.html"), r#"<link href="style.css">"#).unwrap();
        let runner = ScriptedRunner::new(vec![("git diff", Some(0))]);

        publisher(&runner, dir.path()).publish(DeployKind::Homepage, &NoopEventSink);

        let html = std::fs::read_to_string(reports.join("index.html")).unwrap();
        assert!(html.starts_with(r#"<link href="style.css?v="#));
    }

    #[test]
    fn reports_chain_failure_is_hard() {
        let dir = tempdir().unwrap();
        let runner = ScriptedRunner::new(vec![("bash deploy_reports.sh", Some(2))]);

        let report = publisher(&runner, dir.path()).publish(DeployKind::Reports, &NoopEventSink);

        assert!(!report.is_success());
        assert_eq!(
            report.failure_reason().as_deref(),
            Some("generate_reports: exit status 2")
        );
    }
}
