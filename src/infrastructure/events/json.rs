//! JSON Event Sink
//!
//! Outputs coordinator events as NDJSON for cron/CI consumption.

use crate::domain::entities::LockHolder;
use crate::domain::policies::DeployAction;
use crate::domain::ports::{DeployEvent, DeployEventSink};
use std::io::{self, Write};
use std::sync::Mutex;

/// Event sink that outputs NDJSON events to stdout
pub struct JsonEventSink {
    /// Mutex to ensure thread-safe writes
    writer: Mutex<Box<dyn Write + Send>>,
    command: &'static str,
}

impl JsonEventSink {
    /// Create a new JSON event sink writing to stdout
    pub fn stdout(command: &'static str) -> Self {
        Self {
            writer: Mutex::new(Box::new(io::stdout())),
            command,
        }
    }

    /// Create a JSON event sink writing to a custom writer (for testing)
    pub fn with_writer<W: Write + Send + 'static>(command: &'static str, writer: W) -> Self {
        Self {
            writer: Mutex::new(Box::new(writer)),
            command,
        }
    }

    fn write_event(&self, event: serde_json::Value) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{}", event);
            let _ = writer.flush();
        }
    }
}

fn holder_json(holder: &LockHolder) -> serde_json::Value {
    serde_json::json!({
        "pid": holder.pid,
        "hostname": holder.hostname,
        "acquired_at": holder.acquired_at,
        "class": holder.class.map(|c| c.as_str()),
    })
}

impl DeployEventSink for JsonEventSink {
    fn on_event(&self, event: DeployEvent) {
        let command = self.command;
        let json = match event {
            DeployEvent::Started { class, dry_run } => {
                serde_json::json!({
                    "event": "start",
                    "command": command,
                    "class": class.as_str(),
                    "dry_run": dry_run,
                })
            }

            DeployEvent::LockContended { holder, stale } => {
                serde_json::json!({
                    "event": "lock_contended",
                    "command": command,
                    "holder": holder.as_ref().map(holder_json),
                    "stale": stale,
                })
            }

            DeployEvent::InterruptedRecovered { pending } => {
                serde_json::json!({
                    "event": "interrupted_recovered",
                    "command": command,
                    "kind": pending.kind.as_str(),
                    "started_at": pending.started_at,
                })
            }

            DeployEvent::ChangesDetected {
                report,
                accumulated,
            } => {
                serde_json::json!({
                    "event": "changes_detected",
                    "command": command,
                    "code_changed": report.code_changed,
                    "homepage_changed": report.homepage_changed,
                    "reports_changed": report.reports_changed,
                    "total_changes": report.total_changes,
                    "accumulated": accumulated,
                    "paths": report.changed_paths,
                })
            }

            DeployEvent::Decided { action } => {
                let mut value = serde_json::json!({
                    "event": "decision",
                    "command": command,
                    "action": action.name(),
                    "detail": action.to_string(),
                });
                if let DeployAction::Wait { remaining_secs, .. } = action {
                    value["remaining_secs"] = serde_json::json!(remaining_secs);
                }
                value
            }

            DeployEvent::StepStarted { kind, step } => {
                serde_json::json!({
                    "event": "step_start",
                    "command": command,
                    "kind": kind.as_str(),
                    "step": step.as_str(),
                })
            }

            DeployEvent::StepFinished { kind, report } => {
                serde_json::json!({
                    "event": "step_finished",
                    "command": command,
                    "kind": kind.as_str(),
                    "step": report.step.as_str(),
                    "outcome": report.outcome.as_str(),
                    "reason": report.outcome.reason(),
                    "required": report.required,
                })
            }

            DeployEvent::Completed {
                action,
                success,
                dry_run,
            } => {
                serde_json::json!({
                    "event": "complete",
                    "command": command,
                    "action": action.name(),
                    "success": success,
                    "dry_run": dry_run,
                })
            }
        };

        self.write_event(json);
    }
}
