use std::sync::Arc;

use anyhow::Result;
use prospector_deploy::domain::ports::DeployEventSink;
use prospector_deploy::infrastructure::JsonEventSink;
use prospector_deploy::{DeployClass, DeployOptions, RunOutcome};

use super::project::Project;
use super::Exit;
use crate::ui::context::UiContext;
use crate::ui::views::deploy::ConsoleEventSink;

pub fn cmd_deploy(project: &Project, ui: &UiContext, class: DeployClass, dry_run: bool) -> Result<Exit> {
    let use_case = project.deploy_use_case()?;

    let events: Arc<dyn DeployEventSink> = if ui.json {
        Arc::new(JsonEventSink::stdout("deploy"))
    } else {
        Arc::new(ConsoleEventSink::new(ui.color, ui.unicode, ui.verbose))
    };

    let options = DeployOptions::new(class).with_dry_run(dry_run);
    let outcome = use_case.run_with_events(&options, events)?;

    exit_for(&outcome)
}

/// Contention is a distinct, non-error exit; a hard publish failure is an error
pub fn exit_for(outcome: &RunOutcome) -> Result<Exit> {
    match outcome {
        RunOutcome::Contended { .. } => Ok(Exit::Contended),
        RunOutcome::Evaluated(report) => match report.publish_error() {
            Some(err) => Err(err.into()),
            None => Ok(Exit::Success),
        },
    }
}
