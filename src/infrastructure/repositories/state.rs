//! JSON State Repository
//!
//! Persists the deployment state as pretty-printed JSON
//! (default `deployment_state.json`), rewritten atomically on every save.
//!
//! The in-flight marker lives in a sidecar (`deployment_state.pending.json`)
//! so the main file can be committed by the publish chain without carrying
//! a marker that a fresh checkout would read as an interrupted deploy.
//! The sidecar is written before the main file and removed after it.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer, Serialize};
use tracing::debug;

use crate::domain::entities::{DeployOutcome, DeploymentRecord, DeploymentState, PendingDeploy};
use crate::domain::ports::{StateError, StateRepository};
use crate::domain::value_objects::{ContentHash, DeployClass, DeployKind};
use crate::infrastructure::fs::atomic_write;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct JsonRecord {
    kind: DeployKind,
    trigger: DeployClass,
    started_at: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    finished_at: Option<i64>,
    outcome: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    detail: Option<String>,
    #[serde(default)]
    changes: u32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct JsonPending {
    kind: DeployKind,
    trigger: DeployClass,
    started_at: i64,
    #[serde(default)]
    changes: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct JsonState {
    #[serde(default)]
    changes_since_last_report_deploy: u32,
    #[serde(default, deserialize_with = "epoch_seconds")]
    last_homepage_deploy: i64,
    #[serde(default, deserialize_with = "epoch_seconds")]
    last_report_deploy: i64,
    #[serde(default, alias = "last_file_hashes")]
    file_fingerprints: BTreeMap<String, Option<String>>,
    #[serde(default)]
    deployment_history: Vec<JsonRecord>,
    /// Read for state files written before the sidecar existed
    #[serde(default, skip_serializing)]
    pending_deploy: Option<JsonPending>,
}

/// Accept integer or fractional epoch seconds; fractions are truncated.
fn epoch_seconds<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Epoch {
        Int(i64),
        Float(f64),
    }

    Ok(match Epoch::deserialize(deserializer)? {
        Epoch::Int(secs) => secs,
        Epoch::Float(secs) => secs.trunc() as i64,
    })
}

pub struct JsonStateRepository {
    path: PathBuf,
    pending_path: PathBuf,
}

impl JsonStateRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let pending_path = pending_path_for(&path);
        Self { path, pending_path }
    }

    /// Sidecar holding the in-flight marker
    pub fn pending_path(&self) -> &Path {
        &self.pending_path
    }

    fn load_pending(&self) -> Result<Option<PendingDeploy>, StateError> {
        let Some(content) = read_optional(&self.pending_path)? else {
            return Ok(None);
        };
        let json: JsonPending =
            serde_json::from_str(&content).map_err(|e| StateError::Corrupted {
                path: self.pending_path.clone(),
                message: e.to_string(),
            })?;
        Ok(Some(pending_from_json(json)))
    }

    fn clear_pending(&self) -> Result<(), StateError> {
        match fs::remove_file(&self.pending_path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StateError::AccessError {
                path: self.pending_path.clone(),
                message: e.to_string(),
            }),
        }
    }
}

impl StateRepository for JsonStateRepository {
    fn load(&self) -> Result<DeploymentState, StateError> {
        let mut state = match read_optional(&self.path)? {
            Some(content) => {
                let json: JsonState =
                    serde_json::from_str(&content).map_err(|e| StateError::Corrupted {
                        path: self.path.clone(),
                        message: e.to_string(),
                    })?;
                from_json(json)
            }
            None => {
                debug!(path = %self.path.display(), "no state file, starting fresh");
                DeploymentState::new()
            }
        };

        if let Some(pending) = self.load_pending()? {
            state.pending_deploy = Some(pending);
        }

        // A sidecar whose deploy is already in the history outlived its removal
        if let Some(pending) = state.pending_deploy {
            let recorded = state
                .deployment_history
                .last()
                .is_some_and(|r| r.kind == pending.kind && r.started_at == pending.started_at);
            if recorded {
                debug!(path = %self.pending_path.display(), "ignoring stale pending marker");
                state.pending_deploy = None;
            }
        }

        Ok(state)
    }

    fn save(&self, state: &DeploymentState) -> Result<(), StateError> {
        match state.pending_deploy {
            Some(pending) => {
                write_json(&self.pending_path, &pending_to_json(pending))?;
                write_json(&self.path, &to_json(state))
            }
            None => {
                write_json(&self.path, &to_json(state))?;
                self.clear_pending()
            }
        }
    }

    fn path(&self) -> &Path {
        &self.path
    }
}

/// `deployment_state.json` -> `deployment_state.pending.json`
fn pending_path_for(path: &Path) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "deployment_state".to_string());
    path.with_file_name(format!("{}.pending.json", stem))
}

fn read_optional(path: &Path) -> Result<Option<String>, StateError> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(StateError::AccessError {
            path: path.to_path_buf(),
            message: e.to_string(),
        }),
    }
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), StateError> {
    let mut content =
        serde_json::to_string_pretty(value).map_err(|e| StateError::SerializationError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
    content.push('\n');

    atomic_write(path, content.as_bytes()).map_err(|e| StateError::AccessError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

fn pending_from_json(p: JsonPending) -> PendingDeploy {
    PendingDeploy {
        kind: p.kind,
        trigger: p.trigger,
        started_at: p.started_at,
        changes: p.changes,
    }
}

fn pending_to_json(p: PendingDeploy) -> JsonPending {
    JsonPending {
        kind: p.kind,
        trigger: p.trigger,
        started_at: p.started_at,
        changes: p.changes,
    }
}

fn from_json(json: JsonState) -> DeploymentState {
    DeploymentState {
        changes_since_last_report_deploy: json.changes_since_last_report_deploy,
        last_homepage_deploy: json.last_homepage_deploy,
        last_report_deploy: json.last_report_deploy,
        file_fingerprints: json
            .file_fingerprints
            .into_iter()
            .filter_map(|(key, hash)| hash.map(|h| (key, ContentHash::new(&h))))
            .collect(),
        deployment_history: json
            .deployment_history
            .into_iter()
            .map(record_from_json)
            .collect(),
        pending_deploy: json.pending_deploy.map(pending_from_json),
    }
}

fn record_from_json(record: JsonRecord) -> DeploymentRecord {
    let outcome = match record.outcome.as_str() {
        "succeeded" => DeployOutcome::Succeeded,
        "interrupted" => DeployOutcome::Interrupted,
        _ => DeployOutcome::Failed {
            reason: record.detail.unwrap_or_default(),
        },
    };
    DeploymentRecord {
        kind: record.kind,
        trigger: record.trigger,
        started_at: record.started_at,
        finished_at: record.finished_at,
        outcome,
        changes: record.changes,
    }
}

fn to_json(state: &DeploymentState) -> JsonState {
    JsonState {
        changes_since_last_report_deploy: state.changes_since_last_report_deploy,
        last_homepage_deploy: state.last_homepage_deploy,
        last_report_deploy: state.last_report_deploy,
        file_fingerprints: state
            .file_fingerprints
            .iter()
            .map(|(key, hash)| (key.clone(), Some(hash.to_string())))
            .collect(),
        deployment_history: state
            .deployment_history
            .iter()
            .map(|r| JsonRecord {
                kind: r.kind,
                trigger: r.trigger,
                started_at: r.started_at,
                finished_at: r.finished_at,
                outcome: r.outcome.as_str().to_string(),
                detail: match &r.outcome {
                    DeployOutcome::Failed { reason } => Some(reason.clone()),
                    _ => None,
                },
                changes: r.changes,
            })
            .collect(),
        pending_deploy: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_loads_default_state() {
        let dir = tempdir().unwrap();
        let repo = JsonStateRepository::new(dir.path().join("deployment_state.json"));
        assert_eq!(repo.load().unwrap(), DeploymentState::new());
    }

    #[test]
    fn save_then_load_preserves_state() {
        let dir = tempdir().unwrap();
        let repo = JsonStateRepository::new(dir.path().join("deployment_state.json"));

        let mut state = DeploymentState::new();
        state.accumulate(4);
        state.set_fingerprint("nyc_odcv_prospector.py", ContentHash::from_bytes(b"v1"));
        state.begin(DeployKind::Reports, DeployClass::Auto, 100);
        state.fail(130, "generate_reports: exit status 1");
        state.begin(DeployKind::Homepage, DeployClass::Homepage, 200);

        repo.save(&state).unwrap();
        assert_eq!(repo.load().unwrap(), state);
    }

    #[test]
    fn save_writes_pretty_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("deployment_state.json");
        JsonStateRepository::new(&path)
            .save(&DeploymentState::new())
            .unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("\n  \"changes_since_last_report_deploy\": 0"));
        assert!(!content.contains("pending_deploy"));
    }

    #[test]
    fn pending_marker_lives_in_sidecar() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("deployment_state.json");
        let repo = JsonStateRepository::new(&path);
        assert_eq!(
            repo.pending_path(),
            dir.path().join("deployment_state.pending.json")
        );

        let mut state = DeploymentState::new();
        state.begin(DeployKind::Homepage, DeployClass::Auto, 300);
        repo.save(&state).unwrap();

        assert!(!fs::read_to_string(&path).unwrap().contains("pending_deploy"));
        let sidecar = fs::read_to_string(repo.pending_path()).unwrap();
        assert!(sidecar.contains("\"started_at\": 300"));
        assert_eq!(repo.load().unwrap().pending_deploy, state.pending_deploy);

        state.complete(310);
        repo.save(&state).unwrap();
        assert!(!repo.pending_path().exists());
        assert!(repo.load().unwrap().pending_deploy.is_none());
    }

    #[test]
    fn committed_state_file_alone_has_no_pending_deploy() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("deployment_state.json");
        let repo = JsonStateRepository::new(&path);

        let mut state = DeploymentState::new();
        state.begin(DeployKind::Reports, DeployClass::Reports, 400);
        repo.save(&state).unwrap();

        let checkout = tempdir().unwrap();
        let copy = checkout.path().join("deployment_state.json");
        fs::copy(&path, &copy).unwrap();
        assert!(JsonStateRepository::new(&copy)
            .load()
            .unwrap()
            .pending_deploy
            .is_none());
    }

    #[test]
    fn sidecar_already_in_history_is_ignored() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("deployment_state.json");
        let repo = JsonStateRepository::new(&path);

        let mut state = DeploymentState::new();
        state.begin(DeployKind::Homepage, DeployClass::Homepage, 500);
        repo.save(&state).unwrap();
        state.complete(505);
        // Main file rewritten, sidecar removal never happened
        write_json(&path, &to_json(&state)).unwrap();

        let loaded = repo.load().unwrap();
        assert!(loaded.pending_deploy.is_none());
        assert_eq!(loaded.deployment_history.len(), 1);
    }

    #[test]
    fn inline_pending_deploy_is_still_read() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("deployment_state.json");
        fs::write(
            &path,
            r#"{"pending_deploy": {"kind": "reports", "trigger": "auto", "started_at": 1700000000}}"#,
        )
        .unwrap();

        let pending = JsonStateRepository::new(&path).load().unwrap().pending_deploy.unwrap();
        assert_eq!(pending.kind, DeployKind::Reports);
        assert_eq!(pending.started_at, 1_700_000_000);
    }

    #[test]
    fn unparseable_sidecar_is_corrupted() {
        let dir = tempdir().unwrap();
        let repo = JsonStateRepository::new(dir.path().join("deployment_state.json"));
        fs::write(repo.pending_path(), "{").unwrap();

        match repo.load().unwrap_err() {
            StateError::Corrupted { path, .. } => assert_eq!(path, repo.pending_path()),
            other => panic!("expected corruption, got {:?}", other),
        }
    }

    #[test]
    fn legacy_state_file_is_accepted() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("deployment_state.json");
        fs::write(
            &path,
            r#"{
  "changes_since_last_report_deploy": 3,
  "last_homepage_deploy": 1700000000.75,
  "last_report_deploy": 0,
  "last_file_hashes": {
    "nyc_odcv_prospector.py": "5d41402abc4b2a76b9719d911017c592",
    "index.html": null
  },
  "deployment_history": []
}"#,
        )
        .unwrap();

        let state = JsonStateRepository::new(&path).load().unwrap();
        assert_eq!(state.changes_since_last_report_deploy, 3);
        assert_eq!(state.last_homepage_deploy, 1_700_000_000);
        assert_eq!(state.file_fingerprints.len(), 1);
        assert!(state.fingerprint("index.html").is_none());
    }

    #[test]
    fn unparseable_state_is_corrupted() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("deployment_state.json");
        fs::write(&path, "{ not json").unwrap();

        let err = JsonStateRepository::new(&path).load().unwrap_err();
        assert!(matches!(err, StateError::Corrupted { .. }));
    }
}
