//! CommandRunner port
//!
//! Synchronous subprocess execution for publish steps.

use std::fmt;
use std::path::PathBuf;

/// A command line to run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
        }
    }

    /// Build from an argv vector (`["python3", "generate_homepage_only.py"]`)
    pub fn from_argv(argv: &[String]) -> Option<Self> {
        let (program, args) = argv.split_first()?;
        Some(Self {
            program: program.clone(),
            args: args.to_vec(),
            cwd: None,
        })
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            if arg.contains(' ') {
                write!(f, " \"{}\"", arg)?;
            } else {
                write!(f, " {}", arg)?;
            }
        }
        Ok(())
    }
}

/// Exit information of a finished command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// `None` when terminated by a signal
    pub code: Option<i32>,
    /// Last lines of stderr, for diagnostics
    pub stderr_tail: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    pub fn describe_failure(&self) -> String {
        let status = match self.code {
            Some(code) => format!("exit status {}", code),
            None => "terminated by signal".to_string(),
        };
        if self.stderr_tail.is_empty() {
            status
        } else {
            format!("{}: {}", status, self.stderr_tail)
        }
    }
}

pub trait CommandRunner {
    /// Run to completion. `Err` means the command could not be spawned at all.
    fn run(&self, command: &CommandSpec) -> std::io::Result<CommandOutput>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_argv_splits_program() {
        let argv = vec!["bash".to_string(), "deploy_reports.sh".to_string()];
        let spec = CommandSpec::from_argv(&argv).unwrap();
        assert_eq!(spec.program, "bash");
        assert_eq!(spec.args, vec!["deploy_reports.sh"]);
        assert!(CommandSpec::from_argv(&[]).is_none());
    }

    #[test]
    fn display_quotes_spaced_args() {
        let spec = CommandSpec::new("git").args(["commit", "-m", "Homepage update"]);
        assert_eq!(spec.to_string(), "git commit -m \"Homepage update\"");
    }

    #[test]
    fn failure_description_includes_stderr() {
        let out = CommandOutput {
            code: Some(128),
            stderr_tail: "fatal: not a git repository".to_string(),
        };
        assert!(!out.success());
        assert_eq!(
            out.describe_failure(),
            "exit status 128: fatal: not a git repository"
        );
    }
}
