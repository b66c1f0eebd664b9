//! Publisher port
//!
//! Runs a publish chain (homepage or full reports) and reports every step
//! explicitly instead of swallowing failures.

use std::fmt;

use crate::domain::ports::DeployEventSink;
use crate::domain::value_objects::DeployKind;

/// Individual steps of the publish chains
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PublishStep {
    GenerateHomepage,
    CacheBust,
    Stage,
    Commit,
    Push,
    GenerateReports,
}

impl PublishStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            PublishStep::GenerateHomepage => "generate_homepage",
            PublishStep::CacheBust => "cache_bust",
            PublishStep::Stage => "stage",
            PublishStep::Commit => "commit",
            PublishStep::Push => "push",
            PublishStep::GenerateReports => "generate_reports",
        }
    }
}

impl fmt::Display for PublishStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    Succeeded,
    Skipped { reason: String },
    Failed { reason: String },
}

impl StepOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            StepOutcome::Succeeded => "succeeded",
            StepOutcome::Skipped { .. } => "skipped",
            StepOutcome::Failed { .. } => "failed",
        }
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            StepOutcome::Succeeded => None,
            StepOutcome::Skipped { reason } | StepOutcome::Failed { reason } => Some(reason),
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, StepOutcome::Failed { .. })
    }
}

/// Result of one step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepReport {
    pub step: PublishStep,
    pub outcome: StepOutcome,
    /// A failure of a required step fails the whole chain
    pub required: bool,
}

impl StepReport {
    pub fn succeeded(step: PublishStep, required: bool) -> Self {
        Self {
            step,
            outcome: StepOutcome::Succeeded,
            required,
        }
    }

    pub fn skipped(step: PublishStep, required: bool, reason: impl Into<String>) -> Self {
        Self {
            step,
            outcome: StepOutcome::Skipped {
                reason: reason.into(),
            },
            required,
        }
    }

    pub fn failed(step: PublishStep, required: bool, reason: impl Into<String>) -> Self {
        Self {
            step,
            outcome: StepOutcome::Failed {
                reason: reason.into(),
            },
            required,
        }
    }

    /// A failure the chain degrades around
    pub fn is_degraded(&self) -> bool {
        !self.required && self.outcome.is_failure()
    }

    pub fn is_fatal(&self) -> bool {
        self.required && self.outcome.is_failure()
    }
}

/// Result of a whole chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishReport {
    pub kind: DeployKind,
    pub steps: Vec<StepReport>,
}

impl PublishReport {
    pub fn new(kind: DeployKind) -> Self {
        Self {
            kind,
            steps: Vec::new(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.fatal_step().is_none()
    }

    /// First required step that failed
    pub fn fatal_step(&self) -> Option<&StepReport> {
        self.steps.iter().find(|s| s.is_fatal())
    }

    pub fn degraded_steps(&self) -> impl Iterator<Item = &StepReport> {
        self.steps.iter().filter(|s| s.is_degraded())
    }

    /// Short reason for history records
    pub fn failure_reason(&self) -> Option<String> {
        self.fatal_step().map(|s| {
            format!(
                "{}: {}",
                s.step,
                s.outcome.reason().unwrap_or("failed")
            )
        })
    }
}

pub trait Publisher {
    /// Run the chain for `kind`, emitting a step event as each step finishes.
    fn publish(&self, kind: DeployKind, events: &dyn DeployEventSink) -> PublishReport;
}
