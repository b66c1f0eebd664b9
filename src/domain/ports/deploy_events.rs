//! Deploy Event Port
//!
//! Provides an observable interface for coordinator runs.
//! Enables console progress, NDJSON event streams, and debugging.

use crate::domain::entities::{ChangeReport, LockHolder, PendingDeploy};
use crate::domain::policies::DeployAction;
use crate::domain::ports::{PublishStep, StepReport};
use crate::domain::value_objects::{DeployClass, DeployKind};

/// Event emitted during a coordinator run
#[derive(Debug, Clone)]
pub enum DeployEvent {
    /// Run started with the lock held
    Started { class: DeployClass, dry_run: bool },

    /// Another process holds the lock
    LockContended {
        holder: Option<LockHolder>,
        /// Holder exceeded the staleness window
        stale: bool,
    },

    /// A previous run died mid-publish
    InterruptedRecovered { pending: PendingDeploy },

    /// Detection pass finished
    ChangesDetected {
        report: ChangeReport,
        accumulated: u32,
    },

    /// Policy decided
    Decided { action: DeployAction },

    /// Publish step started
    StepStarted { kind: DeployKind, step: PublishStep },

    /// Publish step finished
    StepFinished { kind: DeployKind, report: StepReport },

    /// Run completed
    Completed {
        action: DeployAction,
        success: bool,
        dry_run: bool,
    },
}

/// Trait for receiving deploy events
///
/// Implementations:
/// - ConsoleEventSink: human-readable lines
/// - JsonEventSink: NDJSON event stream for cron/CI
/// - NoopEventSink: silent operation
pub trait DeployEventSink: Send + Sync {
    /// Handle a deploy event
    fn on_event(&self, event: DeployEvent);
}

/// No-op event sink for silent operation
pub struct NoopEventSink;

impl DeployEventSink for NoopEventSink {
    fn on_event(&self, _event: DeployEvent) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct RecordingEventSink {
        events: Mutex<Vec<DeployEvent>>,
    }

    impl DeployEventSink for RecordingEventSink {
        fn on_event(&self, event: DeployEvent) {
            self.events.lock().unwrap().push(event);
        }
    }

    #[test]
    fn recording_sink_captures_events() {
        let sink = RecordingEventSink {
            events: Mutex::new(Vec::new()),
        };

        sink.on_event(DeployEvent::Started {
            class: DeployClass::Auto,
            dry_run: false,
        });
        sink.on_event(DeployEvent::Decided {
            action: DeployAction::DeployHomepage,
        });

        assert_eq!(sink.events.lock().unwrap().len(), 2);
    }
}
