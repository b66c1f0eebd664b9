//! prospector-deploy CLI
//!
//! Usage: prospector-deploy [COMMAND]
//!
//! Commands:
//!   homepage    Deploy the homepage if it changed
//!   reports     Regenerate and deploy all reports
//!   auto        Let the policy decide (default)
//!   status      Show coordinator state
//!   bust-cache  Refresh cache-busting tokens in report HTML
//!   watch       Run the coordinator on file changes

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use prospector_deploy::DeployClass;

mod cli;
mod commands;
mod ui;

use cli::{Cli, Commands};
use commands::project::Project;
use commands::Exit;
use ui::context::UiContext;

fn main() -> ExitCode {
    let cli = Cli::parse();
    prospector_deploy::logging::init(cli.verbose);

    let json = cli.json;
    match run(cli) {
        Ok(exit) => ExitCode::from(exit.code()),
        Err(err) => {
            ui::error::print_error(&err, json);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<Exit> {
    let ui = UiContext::new(cli.json, cli.verbose);
    let project = Project::load(cli.root.as_deref(), cli.config.as_deref())?;

    match cli.command.unwrap_or(Commands::Auto { dry_run: false }) {
        Commands::Status { history } => commands::status::cmd_status(&project, &ui, history),
        Commands::BustCache { dir, token } => {
            commands::bust_cache::cmd_bust_cache(&project, &ui, dir.as_deref(), token.as_deref())
        }
        Commands::Watch => commands::watch::cmd_watch(&project, &ui),
        Commands::Homepage { dry_run } => {
            commands::deploy::cmd_deploy(&project, &ui, DeployClass::Homepage, dry_run)
        }
        Commands::Reports { dry_run } => {
            commands::deploy::cmd_deploy(&project, &ui, DeployClass::Reports, dry_run)
        }
        Commands::Auto { dry_run } => {
            commands::deploy::cmd_deploy(&project, &ui, DeployClass::Auto, dry_run)
        }
    }
}
