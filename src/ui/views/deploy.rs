//! Console rendering for coordinator runs

use std::io::{self, Write};

use prospector_deploy::domain::entities::ChangeReport;
use prospector_deploy::domain::policies::DeployAction;
use prospector_deploy::domain::ports::{DeployEvent, DeployEventSink, StepOutcome, StepReport};

use super::format_timestamp;
use crate::ui::blocks::header::CommandHeader;
use crate::ui::primitives::icon::Icon;
use crate::ui::primitives::text::ColoredText;

/// Human-readable event sink writing to stdout
pub struct ConsoleEventSink {
    color: bool,
    unicode: bool,
    verbose: u8,
}

impl ConsoleEventSink {
    pub fn new(color: bool, unicode: bool, verbose: u8) -> Self {
        Self {
            color,
            unicode,
            verbose,
        }
    }

    pub fn render(&self, event: &DeployEvent) -> Option<String> {
        render_event(event, self.color, self.unicode, self.verbose)
    }
}

impl DeployEventSink for ConsoleEventSink {
    fn on_event(&self, event: DeployEvent) {
        if let Some(line) = self.render(&event) {
            let mut out = io::stdout().lock();
            let _ = out.write_all(line.as_bytes());
            let _ = out.flush();
        }
    }
}

fn icon(icon: Icon, color: bool, unicode: bool) -> String {
    icon.colored(color, unicode)
}

fn describe_changes(report: &ChangeReport) -> String {
    if report.is_empty() {
        return "no changes detected".to_string();
    }
    let mut parts = Vec::new();
    if report.code_changed {
        parts.push("code");
    }
    if report.homepage_changed {
        parts.push("homepage");
    }
    if report.reports_changed {
        parts.push("reports");
    }
    format!(
        "{} change(s) detected ({})",
        report.total_changes,
        parts.join(", ")
    )
}

fn render_step(report: &StepReport, color: bool, unicode: bool) -> String {
    match &report.outcome {
        StepOutcome::Succeeded => format!(
            "  {} {}\n",
            icon(Icon::Success, color, unicode),
            report.step
        ),
        StepOutcome::Skipped { reason } => format!(
            "  {} {} {}\n",
            icon(Icon::Skipped, color, unicode),
            report.step,
            ColoredText::dim(format!("(skipped: {})", reason)).render(color)
        ),
        StepOutcome::Failed { reason } => {
            let (mark, label) = if report.is_fatal() {
                (Icon::Error, "failed")
            } else {
                (Icon::Warning, "failed, continuing")
            };
            format!(
                "  {} {} ({}: {})\n",
                icon(mark, color, unicode),
                report.step,
                label,
                reason
            )
        }
    }
}

fn render_completion(action: &DeployAction, success: bool, dry_run: bool) -> (Icon, String) {
    if dry_run {
        return (Icon::Success, format!("Dry run: would {}", action));
    }
    match (action.deploy_kind(), success) {
        (Some(kind), true) => (Icon::Success, format!("Deployed {}", kind)),
        (Some(kind), false) => (Icon::Error, format!("{} deploy failed", kind)),
        (None, _) => (Icon::Success, "Nothing to deploy".to_string()),
    }
}

pub fn render_event(event: &DeployEvent, color: bool, unicode: bool, verbose: u8) -> Option<String> {
    let rendered = match event {
        DeployEvent::Started { class, dry_run } => {
            let mut header = CommandHeader::new(Icon::Deploy, "Prospector Deploy");
            header.add("Class", class.as_str());
            if *dry_run {
                header.add("Mode", "dry run");
            }
            header.render(color, unicode)
        }
        DeployEvent::LockContended { holder, stale } => {
            let who = holder
                .as_ref()
                .map(|h| format!("{} since {}", h.describe(), format_timestamp(h.acquired_at)))
                .unwrap_or_else(|| "another process".to_string());
            let suffix = if *stale { " [stale]" } else { "" };
            format!(
                "{} Deployment lock held by {}{}\n",
                icon(Icon::Lock, color, unicode),
                who,
                ColoredText::warning(suffix).render(color)
            )
        }
        DeployEvent::InterruptedRecovered { pending } => format!(
            "{} Previous {} deploy started {} was interrupted; recorded in history\n",
            icon(Icon::Warning, color, unicode),
            pending.kind,
            format_timestamp(pending.started_at)
        ),
        DeployEvent::ChangesDetected {
            report,
            accumulated,
        } => {
            let mut out = format!(
                "{} {}, {} accumulated\n",
                icon(Icon::Arrow, color, unicode),
                describe_changes(report),
                accumulated
            );
            if verbose > 0 {
                for path in &report.changed_paths {
                    out.push_str(&format!("    {}\n", ColoredText::dim(path.as_str()).render(color)));
                }
            }
            out
        }
        DeployEvent::Decided { action } => format!(
            "{} Decision: {}\n",
            icon(Icon::Progress, color, unicode),
            action
        ),
        DeployEvent::StepStarted { step, .. } => {
            if verbose == 0 {
                return None;
            }
            format!("  {} {}...\n", icon(Icon::Progress, color, unicode), step)
        }
        DeployEvent::StepFinished { report, .. } => render_step(report, color, unicode),
        DeployEvent::Completed {
            action,
            success,
            dry_run,
        } => {
            let (mark, message) = render_completion(action, *success, *dry_run);
            let message = if *success {
                ColoredText::success(message).render(color)
            } else {
                ColoredText::error(message).render(color)
            };
            format!("{} {}\n", icon(mark, color, unicode), message)
        }
    };
    Some(rendered)
}
