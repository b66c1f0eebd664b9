//! System Command Runner
//!
//! Runs publish steps as child processes, capturing their output so it does
//! not interleave with NDJSON on stdout.

use std::process::Command;

use tracing::debug;

use crate::domain::ports::{CommandOutput, CommandRunner, CommandSpec};

/// Lines of stderr kept for failure messages
const STDERR_TAIL_LINES: usize = 5;

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemCommandRunner;

impl SystemCommandRunner {
    pub fn new() -> Self {
        Self
    }
}

impl CommandRunner for SystemCommandRunner {
    fn run(&self, spec: &CommandSpec) -> std::io::Result<CommandOutput> {
        let mut command = Command::new(&spec.program);
        command.args(&spec.args);
        if let Some(cwd) = &spec.cwd {
            command.current_dir(cwd);
        }

        debug!(command = %spec, "running");
        let output = command.output()?;

        for line in String::from_utf8_lossy(&output.stdout).lines() {
            debug!(target: "prospector_deploy::subprocess", "{}", line);
        }

        Ok(CommandOutput {
            code: output.status.code(),
            stderr_tail: tail(&String::from_utf8_lossy(&output.stderr), STDERR_TAIL_LINES),
        })
    }
}

fn tail(text: &str, lines: usize) -> String {
    let all: Vec<&str> = text.lines().filter(|l| !l.trim().is_empty()).collect();
    let start = all.len().saturating_sub(lines);
    all[start..].join(" | ")
}
