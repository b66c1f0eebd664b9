//! Change detection service
//!
//! Fingerprints the tracked files and compares them against the table stored
//! in the deployment state, updating the table as it goes. All I/O goes
//! through the `FileSystem` port.

use std::path::{Component, Path, PathBuf};

use tracing::debug;

use crate::domain::entities::{ChangeReport, DeploymentState};
use crate::domain::ports::FileSystem;
use crate::domain::value_objects::{FirstObservation, ReportGlob};

/// What to track, relative to the project root
#[derive(Debug, Clone)]
pub struct DetectorSettings {
    pub code_file: PathBuf,
    pub homepage: PathBuf,
    pub reports_dir: PathBuf,
    pub report_glob: ReportGlob,
    pub sample_size: usize,
    pub first_observation: FirstObservation,
}

pub struct ChangeDetector<FS: FileSystem> {
    fs: FS,
    root: PathBuf,
    settings: DetectorSettings,
}

impl<FS: FileSystem> ChangeDetector<FS> {
    pub fn new(fs: FS, root: impl Into<PathBuf>, settings: DetectorSettings) -> Self {
        Self {
            fs,
            root: root.into(),
            settings,
        }
    }

    pub fn settings(&self) -> &DetectorSettings {
        &self.settings
    }

    pub fn code_key(&self) -> String {
        fingerprint_key(&self.settings.code_file)
    }

    pub fn homepage_key(&self) -> String {
        fingerprint_key(&self.settings.homepage)
    }

    /// Compare tracked files with `state.file_fingerprints`, recording new hashes.
    pub fn detect(&self, state: &mut DeploymentState) -> ChangeReport {
        let mut report = ChangeReport::new();

        let code_key = self.code_key();
        if self.compare_and_update(state, &code_key, &self.root.join(&self.settings.code_file)) {
            report.code_changed = true;
            report.record(&code_key);
        }

        let homepage_path = self.root.join(&self.settings.homepage);
        let homepage_key = self.homepage_key();
        if self.fs.exists(&homepage_path)
            && self.compare_and_update(state, &homepage_key, &homepage_path)
        {
            report.homepage_changed = true;
            report.record(&homepage_key);
        }

        for relative in self.report_sample(&homepage_path) {
            let key = fingerprint_key(&relative);
            if self.compare_and_update(state, &key, &self.root.join(&relative)) {
                report.reports_changed = true;
                report.record(&key);
            }
        }

        debug!(
            total = report.total_changes,
            code = report.code_changed,
            homepage = report.homepage_changed,
            reports = report.reports_changed,
            "change detection finished"
        );
        report
    }

    /// Re-record the homepage and sampled report fingerprints after a publish
    /// chain rewrote them (generation, cache-busting). Nothing is counted and
    /// the code fingerprint is left alone.
    pub fn rebaseline_artifacts(&self, state: &mut DeploymentState) {
        let homepage_path = self.root.join(&self.settings.homepage);
        let mut tracked = Vec::new();
        if self.fs.exists(&homepage_path) {
            tracked.push(self.settings.homepage.clone());
        }
        tracked.extend(self.report_sample(&homepage_path));

        for relative in tracked {
            let path = self.root.join(&relative);
            match self.fs.hash(&path) {
                Ok(hash) => {
                    state.set_fingerprint(fingerprint_key(&relative), hash);
                }
                Err(e) => debug!(path = %path.display(), error = %e, "artifact not re-fingerprinted"),
            }
        }
    }

    /// First `sample_size` matching report files by name, homepage excluded.
    /// Paths are relative to the root.
    fn report_sample(&self, homepage_path: &Path) -> Vec<PathBuf> {
        let dir = self.root.join(&self.settings.reports_dir);
        let files = match self.fs.list_files(&dir) {
            Ok(files) => files,
            Err(e) => {
                debug!(dir = %dir.display(), error = %e, "reports directory not readable");
                return Vec::new();
            }
        };

        files
            .into_iter()
            .filter(|path| path.as_path() != homepage_path)
            .filter(|path| {
                path.file_name()
                    .is_some_and(|name| self.settings.report_glob.matches(Path::new(name)))
            })
            .take(self.settings.sample_size)
            .map(|path| match path.strip_prefix(&self.root) {
                Ok(relative) => relative.to_path_buf(),
                Err(_) => path,
            })
            .collect()
    }

    fn compare_and_update(&self, state: &mut DeploymentState, key: &str, path: &Path) -> bool {
        let hash = match self.fs.hash(path) {
            Ok(hash) => hash,
            Err(e) => {
                debug!(path = %path.display(), error = %e, "tracked file skipped");
                return false;
            }
        };

        match state.set_fingerprint(key, hash.clone()) {
            Some(previous) => previous != hash,
            None => self.settings.first_observation.counts_as_change(),
        }
    }
}

/// Stable state-table key: `/`-separated path relative to the project root
pub fn fingerprint_key(relative: &Path) -> String {
    relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
