//! Rendering for `status`

use prospector_deploy::application::StatusReport;
use prospector_deploy::domain::entities::{DeployOutcome, DeploymentRecord};

use super::{format_duration, format_timestamp};
use crate::ui::blocks::header::CommandHeader;
use crate::ui::primitives::icon::Icon;
use crate::ui::primitives::text::ColoredText;

fn last_deploy(report: &StatusReport, timestamp: i64) -> String {
    match report.age_of(timestamp) {
        Some(age) => format!("{} ({} ago)", format_timestamp(timestamp), format_duration(age)),
        None => "never".to_string(),
    }
}

fn cooldown(remaining: Option<u64>) -> String {
    match remaining {
        Some(secs) => format!("{} remaining", format_duration(secs)),
        None => "ready".to_string(),
    }
}

fn render_record(record: &DeploymentRecord, color: bool, unicode: bool) -> String {
    let (icon, detail) = match &record.outcome {
        DeployOutcome::Succeeded => (Icon::Success, String::new()),
        DeployOutcome::Failed { reason } => (Icon::Error, format!(": {}", reason)),
        DeployOutcome::Interrupted => (Icon::Warning, String::new()),
    };
    format!(
        "  {} {}  {:<8} via {:<8} {}{} ({} change(s))\n",
        icon.colored(color, unicode),
        format_timestamp(record.started_at),
        record.kind.as_str(),
        record.trigger.as_str(),
        record.outcome.as_str(),
        detail,
        record.changes
    )
}

pub fn render_status(report: &StatusReport, color: bool, unicode: bool) -> String {
    let mut header = CommandHeader::new(Icon::Status, "Deployment Status");
    let accumulated = format!("{} / {}", report.accumulated, report.threshold);
    header.add(
        "Changes since last report deploy",
        if report.threshold_reached() {
            ColoredText::warning(format!("{} (threshold reached)", accumulated)).render(color)
        } else {
            accumulated
        },
    );
    header.add("Last homepage deploy", last_deploy(report, report.last_homepage_deploy));
    header.add("Last report deploy", last_deploy(report, report.last_report_deploy));
    header.add("Homepage cooldown", cooldown(report.homepage_cooldown_remaining));
    header.add("Report cooldown", cooldown(report.report_cooldown_remaining));
    header.add("Tracked files", report.tracked_files.to_string());

    let pending = match &report.pending {
        Some(p) => ColoredText::warning(format!(
            "{} deploy started {} (will be recorded as interrupted)",
            p.kind,
            format_timestamp(p.started_at)
        ))
        .render(color),
        None => "none".to_string(),
    };
    header.add("Pending deploy", pending);

    let lock = match &report.lock_holder {
        Some(holder) => {
            let mut text = format!(
                "held by {} for {}",
                holder.describe(),
                format_duration(holder.held_for(report.now))
            );
            if report.lock_stale {
                text.push_str(" [stale]");
            }
            ColoredText::warning(text).render(color)
        }
        None => "free".to_string(),
    };
    header.add("Lock", lock);

    let mut out = header.render(color, unicode);
    if report.history.is_empty() {
        out.push_str("History: empty\n");
    } else {
        out.push_str(&format!("History (last {}, newest first):\n", report.history.len()));
        for record in report.history.iter().rev() {
            out.push_str(&render_record(record, color, unicode));
        }
    }
    out
}

pub fn status_json(report: &StatusReport) -> serde_json::Value {
    let history: Vec<serde_json::Value> = report
        .history
        .iter()
        .map(|r| {
            serde_json::json!({
                "kind": r.kind.as_str(),
                "trigger": r.trigger.as_str(),
                "started_at": r.started_at,
                "finished_at": r.finished_at,
                "outcome": r.outcome.as_str(),
                "detail": match &r.outcome {
                    DeployOutcome::Failed { reason } => Some(reason.as_str()),
                    _ => None,
                },
                "changes": r.changes,
            })
        })
        .collect();

    serde_json::json!({
        "event": "status",
        "command": "status",
        "now": report.now,
        "accumulated_changes": report.accumulated,
        "changes_threshold": report.threshold,
        "threshold_reached": report.threshold_reached(),
        "last_homepage_deploy": report.last_homepage_deploy,
        "last_report_deploy": report.last_report_deploy,
        "homepage_cooldown_remaining": report.homepage_cooldown_remaining,
        "report_cooldown_remaining": report.report_cooldown_remaining,
        "tracked_files": report.tracked_files,
        "pending_deploy": report.pending.as_ref().map(|p| serde_json::json!({
            "kind": p.kind.as_str(),
            "trigger": p.trigger.as_str(),
            "started_at": p.started_at,
            "changes": p.changes,
        })),
        "lock": report.lock_holder.as_ref().map(|h| serde_json::json!({
            "pid": h.pid,
            "hostname": h.hostname,
            "acquired_at": h.acquired_at,
            "class": h.class.map(|c| c.as_str()),
            "stale": report.lock_stale,
        })),
        "history": history,
    })
}
