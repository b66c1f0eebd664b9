use std::path::Path;

use anyhow::Result;
use prospector_deploy::domain::services::{default_token, CacheBuster};
use prospector_deploy::domain::value_objects::ReportGlob;
use prospector_deploy::infrastructure::LocalFs;
use prospector_deploy::DeployError;

use super::project::Project;
use super::Exit;
use crate::ui::context::UiContext;
use crate::ui::views::bust_cache::{bust_summary_json, render_bust_summary};

pub fn cmd_bust_cache(
    project: &Project,
    ui: &UiContext,
    dir: Option<&Path>,
    token: Option<&str>,
) -> Result<Exit> {
    let dir = project
        .root
        .join(dir.unwrap_or(project.config.paths.reports_dir.as_path()));
    if !dir.is_dir() {
        return Err(DeployError::DirectoryNotFound { path: dir }.into());
    }

    let token = token.map(str::to_string).unwrap_or_else(default_token);
    let glob = ReportGlob::new(&project.config.paths.reports_glob)?;
    let summary = CacheBuster::new(LocalFs::new(), glob).bust_directory(&dir, &token);

    if ui.json {
        crate::ui::json::emit(bust_summary_json(&summary, &token))?;
    } else {
        print!("{}", render_bust_summary(&summary, &token, ui.color, ui.unicode));
    }
    Ok(Exit::Success)
}
