use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Deployment coordinator for the NYC ODCV Prospector building reports
#[derive(Parser, Debug)]
#[command(name = "prospector-deploy")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "Run without a command to evaluate an automatic ('auto') deploy.\n\
Exit status: 0 evaluated, 75 lock held by another process, 1 error.")]
pub struct Cli {
    /// Project root (defaults to the current directory)
    #[arg(long, global = true, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Configuration file (defaults to <root>/deploy.toml, then the user config)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Emit NDJSON events on stdout
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Deploy the homepage if it changed
    Homepage {
        /// Evaluate and report without persisting state or publishing
        #[arg(long)]
        dry_run: bool,
    },

    /// Regenerate and deploy all reports (subject to cooldown)
    Reports {
        /// Evaluate and report without persisting state or publishing
        #[arg(long)]
        dry_run: bool,
    },

    /// Let the policy decide between homepage, reports, or nothing
    Auto {
        /// Evaluate and report without persisting state or publishing
        #[arg(long)]
        dry_run: bool,
    },

    /// Show accumulated changes, cooldowns, lock holder and recent history
    Status {
        /// Number of history records to show
        #[arg(long, value_name = "N", default_value_t = 10)]
        history: usize,
    },

    /// Add or refresh `?v=<token>` cache-busting parameters in report HTML
    BustCache {
        /// Directory to rewrite (defaults to the configured reports directory)
        #[arg(long, value_name = "DIR")]
        dir: Option<PathBuf>,

        /// Token to use (defaults to the current UTC time, %Y%m%d%H%M%S)
        #[arg(long)]
        token: Option<String>,
    },

    /// Watch tracked files and run the coordinator on change
    Watch,
}
