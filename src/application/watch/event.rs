//! Watch event types and options

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::domain::value_objects::DeployClass;

/// Default debounce duration in milliseconds
pub const DEBOUNCE_MS: u64 = 2000;

/// Watch options
#[derive(Debug, Clone)]
pub struct WatchOptions {
    /// Project root; all other paths are relative to it
    pub root: PathBuf,
    /// Files and directories to watch
    pub paths: Vec<PathBuf>,
    /// Generator code file; a change triggers `reports`
    pub code_file: PathBuf,
    /// Homepage artifact; a change triggers `homepage`
    pub homepage: PathBuf,
    pub debounce: Duration,
}

impl WatchOptions {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            paths: Vec::new(),
            code_file: PathBuf::from("nyc_odcv_prospector.py"),
            homepage: PathBuf::from("building_reports/index.html"),
            debounce: Duration::from_millis(DEBOUNCE_MS),
        }
    }

    pub fn with_paths(mut self, paths: Vec<PathBuf>) -> Self {
        self.paths = paths;
        self
    }

    pub fn with_code_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.code_file = path.into();
        self
    }

    pub fn with_homepage(mut self, path: impl Into<PathBuf>) -> Self {
        self.homepage = path.into();
        self
    }

    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    /// Watched paths resolved against the root
    pub fn absolute_paths(&self) -> Vec<PathBuf> {
        self.paths.iter().map(|p| self.root.join(p)).collect()
    }

    /// Whether an event path falls under one of the watched paths
    pub fn is_tracked(&self, path: &Path) -> bool {
        self.absolute_paths()
            .iter()
            .any(|watched| path == watched || path.starts_with(watched))
    }
}

/// Watch event types for NDJSON output
#[derive(Debug, Clone, serde::Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum WatchEvent {
    /// Watch started
    WatchStarted { root: String, watching: Vec<String> },
    /// A watched path was missing at startup
    PathMissing { path: String },
    /// File changed
    FileChanged { path: String },
    /// Coordinator run started for a batch
    RunStarted { class: String },
    /// Coordinator run finished
    RunFinished {
        class: String,
        action: String,
        deployed: bool,
        success: bool,
    },
    /// Another process held the lock
    Contended { holder: Option<String> },
    /// Error occurred
    Error { message: String },
    /// Watch stopped
    Shutdown,
}

impl WatchEvent {
    /// Convert to JSON string with "command": "watch" field included
    pub fn to_json(&self) -> String {
        let mut value =
            serde_json::to_value(self).unwrap_or_else(|_| serde_json::json!({"event": "error"}));
        if let Some(obj) = value.as_object_mut() {
            obj.insert("command".to_string(), serde_json::json!("watch"));
        }
        serde_json::to_string(&value).unwrap_or_else(|_| "{}".to_string())
    }
}

/// Watcher state for debouncing
#[derive(Debug)]
pub struct WatcherState {
    pending_changes: BTreeSet<PathBuf>,
    last_change: Option<Instant>,
    debounce: Duration,
}

impl Default for WatcherState {
    fn default() -> Self {
        Self::new(Duration::from_millis(DEBOUNCE_MS))
    }
}

impl WatcherState {
    pub fn new(debounce: Duration) -> Self {
        Self {
            pending_changes: BTreeSet::new(),
            last_change: None,
            debounce,
        }
    }

    /// Add a file change to pending changes
    pub fn add_change(&mut self, path: PathBuf) {
        self.pending_changes.insert(path);
        self.last_change = Some(Instant::now());
    }

    /// Check if debounce period has passed and we have pending changes
    pub fn should_run(&self) -> bool {
        match self.last_change {
            Some(last) => !self.pending_changes.is_empty() && last.elapsed() >= self.debounce,
            None => false,
        }
    }

    /// Take all pending changes, resetting state
    pub fn take_changes(&mut self) -> Vec<PathBuf> {
        self.last_change = None;
        std::mem::take(&mut self.pending_changes).into_iter().collect()
    }

    pub fn has_pending(&self) -> bool {
        !self.pending_changes.is_empty()
    }
}

/// Pick the deployment class for a batch of changed absolute paths.
///
/// Code changes win over homepage changes; anything else is `auto`.
pub fn classify_batch(changes: &[PathBuf], options: &WatchOptions) -> DeployClass {
    let code = options.root.join(&options.code_file);
    let homepage = options.root.join(&options.homepage);

    if changes.iter().any(|p| *p == code) {
        DeployClass::Reports
    } else if changes.iter().any(|p| *p == homepage) {
        DeployClass::Homepage
    } else {
        DeployClass::Auto
    }
}
