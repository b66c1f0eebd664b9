use anyhow::Result;
use prospector_deploy::infrastructure::SystemClock;
use prospector_deploy::StatusUseCase;

use super::project::Project;
use super::Exit;
use crate::ui::context::UiContext;
use crate::ui::views::status::{render_status, status_json};

pub fn cmd_status(project: &Project, ui: &UiContext, history: usize) -> Result<Exit> {
    let use_case = StatusUseCase::new(
        project.state_repository(),
        project.lock(),
        SystemClock,
        project.config.policy_settings(),
    )
    .with_stale_after(project.config.lock.stale_after_secs);

    let report = use_case.execute(history)?;

    if ui.json {
        crate::ui::json::emit(status_json(&report))?;
    } else {
        print!("{}", render_status(&report, ui.color, ui.unicode));
    }
    Ok(Exit::Success)
}
