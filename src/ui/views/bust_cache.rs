use std::path::Path;

use prospector_deploy::domain::services::BustSummary;

use crate::ui::primitives::icon::Icon;

/// Files listed individually before collapsing into a count
const MAX_LISTED: usize = 10;

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

pub fn render_bust_summary(summary: &BustSummary, token: &str, color: bool, unicode: bool) -> String {
    let mut out = String::new();
    for path in summary.updated.iter().take(MAX_LISTED) {
        out.push_str(&format!(
            "{} Updated: {}\n",
            Icon::Success.colored(color, unicode),
            display_name(path)
        ));
    }
    if summary.updated.len() > MAX_LISTED {
        out.push_str(&format!("  ... and {} more\n", summary.updated.len() - MAX_LISTED));
    }
    for (path, error) in &summary.errors {
        out.push_str(&format!(
            "{} Error processing {}: {}\n",
            Icon::Error.colored(color, unicode),
            display_name(path),
            error
        ));
    }
    out.push_str(&format!(
        "Cache-busted {} of {} file(s) with token {}\n",
        summary.updated.len(),
        summary.scanned,
        token
    ));
    out
}

pub fn bust_summary_json(summary: &BustSummary, token: &str) -> serde_json::Value {
    serde_json::json!({
        "event": "complete",
        "command": "bust-cache",
        "token": token,
        "scanned": summary.scanned,
        "updated": summary.updated.iter().map(|p| p.display().to_string()).collect::<Vec<_>>(),
        "errors": summary.errors.iter().map(|(p, e)| serde_json::json!({
            "path": p.display().to_string(),
            "error": e,
        })).collect::<Vec<_>>(),
    })
}
