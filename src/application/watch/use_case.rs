//! Watch Use Case implementation

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{channel, Receiver};
use std::sync::Arc;
use std::time::Duration;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tracing::{debug, info};

use crate::application::deploy::RunOutcome;
use crate::domain::value_objects::DeployClass;
use crate::error::{DeployError, DeployResult};

use super::event::{classify_batch, WatchEvent, WatchOptions, WatcherState};

/// Watch Use Case
///
/// Orchestrates continuous file watching. Each debounced batch becomes one
/// coordinator run supplied by the caller.
pub struct WatchUseCase {
    options: WatchOptions,
}

impl WatchUseCase {
    pub fn new(options: WatchOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &WatchOptions {
        &self.options
    }

    /// Start watching (blocking)
    ///
    /// Blocks until the running flag is set to false. A failed run is reported
    /// through `on_event` and watching continues.
    pub fn start<F, R>(&self, running: Arc<AtomicBool>, on_event: F, mut run: R) -> DeployResult<()>
    where
        F: Fn(WatchEvent),
        R: FnMut(DeployClass) -> DeployResult<RunOutcome>,
    {
        let (tx, rx) = channel();

        let mut watcher = RecommendedWatcher::new(
            move |res: Result<Event, notify::Error>| {
                if let Ok(event) = res {
                    for path in event.paths {
                        let _ = tx.send(path);
                    }
                }
            },
            Config::default(),
        )
        .map_err(|e| DeployError::Watch(e.to_string()))?;

        let mut watching = Vec::new();
        for path in self.options.absolute_paths() {
            if path.is_dir() {
                watcher
                    .watch(&path, RecursiveMode::Recursive)
                    .map_err(|e| DeployError::Watch(e.to_string()))?;
            } else if path.is_file() {
                // Editors replace files on save; watch the parent and filter
                let parent = path.parent().unwrap_or(self.options.root.as_path());
                watcher
                    .watch(parent, RecursiveMode::NonRecursive)
                    .map_err(|e| DeployError::Watch(e.to_string()))?;
            } else {
                on_event(WatchEvent::PathMissing {
                    path: path.display().to_string(),
                });
                continue;
            }
            watching.push(path.display().to_string());
        }

        if watching.is_empty() {
            return Err(DeployError::Watch("none of the watched paths exist".to_string()));
        }

        on_event(WatchEvent::WatchStarted {
            root: self.options.root.display().to_string(),
            watching,
        });

        let mut state = WatcherState::new(self.options.debounce);

        while running.load(Ordering::SeqCst) {
            if let Ok(path) = rx.recv_timeout(Duration::from_millis(100)) {
                if self.options.is_tracked(&path) {
                    state.add_change(path);
                }
            }

            if state.should_run() {
                let changes = state.take_changes();
                for path in &changes {
                    on_event(WatchEvent::FileChanged {
                        path: path.display().to_string(),
                    });
                }

                let class = classify_batch(&changes, &self.options);
                info!(class = %class, files = changes.len(), "change batch");
                on_event(WatchEvent::RunStarted {
                    class: class.to_string(),
                });
                self.report_run(class, run(class), &on_event);

                let dropped = drain(&rx);
                if dropped > 0 {
                    debug!(dropped, "discarded events received during run");
                }
            }
        }

        on_event(WatchEvent::Shutdown);
        Ok(())
    }

    fn report_run(
        &self,
        class: DeployClass,
        result: DeployResult<RunOutcome>,
        on_event: &impl Fn(WatchEvent),
    ) {
        match result {
            Ok(RunOutcome::Contended { holder, .. }) => on_event(WatchEvent::Contended {
                holder: holder.map(|h| h.describe()),
            }),
            Ok(RunOutcome::Evaluated(report)) => on_event(WatchEvent::RunFinished {
                class: class.to_string(),
                action: report.decision.action.name().to_string(),
                deployed: report.deploy_attempted(),
                success: report.is_success(),
            }),
            Err(e) => on_event(WatchEvent::Error {
                message: e.to_string(),
            }),
        }
    }
}

/// Discard everything queued so far
fn drain<T>(rx: &Receiver<T>) -> usize {
    rx.try_iter().count()
}
