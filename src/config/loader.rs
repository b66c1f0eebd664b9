//! Configuration loading

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::value_objects::FirstObservation;
use crate::error::{DeployError, DeployResult};

use super::types::Config;

/// Project-level config file name, looked up in the project root
pub const PROJECT_CONFIG: &str = "deploy.toml";

/// Non-fatal configuration warning surfaced to CLI users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub key: String,
    pub file: PathBuf,
    pub line: Option<usize>,
    pub suggestion: Option<String>,
}

impl fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown config key '{}' in {}", self.key, self.file.display())?;
        if let Some(line) = self.line {
            write!(f, ":{}", line)?;
        }
        if let Some(suggestion) = &self.suggestion {
            write!(f, " (did you mean '{}'?)", suggestion)?;
        }
        Ok(())
    }
}

/// Result of the layered lookup
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: Config,
    /// File the config came from; `None` means built-in defaults
    pub source: Option<PathBuf>,
    pub warnings: Vec<ConfigWarning>,
}

/// Load configuration and collect non-fatal warnings (e.g. unknown keys).
pub fn load_with_warnings(path: &Path) -> DeployResult<(Config, Vec<ConfigWarning>)> {
    let content = fs::read_to_string(path)?;

    let mut unknown_paths: Vec<String> = Vec::new();
    let deserializer = toml::de::Deserializer::new(&content);

    let config: Config = serde_ignored::deserialize(deserializer, |p| {
        unknown_paths.push(p.to_string());
    })
    .map_err(|e| DeployError::InvalidConfig {
        file: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let warnings = unknown_paths
        .into_iter()
        .map(|path_str| {
            let key = path_str
                .split('.')
                .next_back()
                .unwrap_or(path_str.as_str())
                .to_string();
            ConfigWarning {
                key: key.clone(),
                file: path.to_path_buf(),
                line: find_line_number(&content, &key),
                suggestion: suggest_key(&key),
            }
        })
        .collect();

    Ok((config, warnings))
}

/// Resolve configuration for a project root.
///
/// Lookup order: the explicit file (must exist), `<root>/deploy.toml`,
/// the user config, then built-in defaults. Environment overrides are
/// applied last and the result is validated.
pub fn load_layered(root: &Path, explicit: Option<&Path>) -> DeployResult<LoadedConfig> {
    let source = match explicit {
        Some(path) if !path.is_file() => {
            return Err(DeployError::ConfigNotFound {
                path: path.to_path_buf(),
            })
        }
        Some(path) => Some(path.to_path_buf()),
        None => candidate_files(root).into_iter().find(|p| p.is_file()),
    };

    let (config, warnings) = match &source {
        Some(path) => {
            tracing::debug!(config = %path.display(), "loading configuration");
            load_with_warnings(path)?
        }
        None => (Config::default(), Vec::new()),
    };

    let config = with_env_overrides(config)?;
    let origin = source
        .clone()
        .unwrap_or_else(|| PathBuf::from("<defaults>"));
    config.validate(&origin)?;

    Ok(LoadedConfig {
        config,
        source,
        warnings,
    })
}

fn candidate_files(root: &Path) -> Vec<PathBuf> {
    let mut files = vec![root.join(PROJECT_CONFIG)];
    if let Some(dir) = dirs_config_dir() {
        files.push(dir.join("prospector").join(PROJECT_CONFIG));
    }
    files
}

/// Apply environment variable overrides (PROSPECTOR_* prefix)
pub fn with_env_overrides(config: Config) -> DeployResult<Config> {
    apply_overrides(config, |name| std::env::var(name).ok())
}

pub(crate) fn apply_overrides<F>(mut config: Config, lookup: F) -> DeployResult<Config>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(value) = lookup("PROSPECTOR_CHANGES_THRESHOLD") {
        config.policy.changes_threshold = parse_env("PROSPECTOR_CHANGES_THRESHOLD", &value)?;
    }
    if let Some(value) = lookup("PROSPECTOR_HOMEPAGE_COOLDOWN") {
        config.policy.homepage_cooldown = parse_env("PROSPECTOR_HOMEPAGE_COOLDOWN", &value)?;
    }
    if let Some(value) = lookup("PROSPECTOR_REPORT_COOLDOWN") {
        config.policy.report_cooldown = parse_env("PROSPECTOR_REPORT_COOLDOWN", &value)?;
    }
    if let Some(value) = lookup("PROSPECTOR_FIRST_OBSERVATION") {
        config.policy.first_observation = value
            .parse::<FirstObservation>()
            .map_err(|message| env_error("PROSPECTOR_FIRST_OBSERVATION", message))?;
    }
    if let Some(value) = lookup("PROSPECTOR_STATE_FILE") {
        if !value.is_empty() {
            config.paths.state_file = PathBuf::from(value);
        }
    }
    if let Some(value) = lookup("PROSPECTOR_LOCK_FILE") {
        if !value.is_empty() {
            config.paths.lock_file = PathBuf::from(value);
        }
    }
    Ok(config)
}

fn parse_env<T>(name: &str, value: &str) -> DeployResult<T>
where
    T: std::str::FromStr,
    T::Err: fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e: T::Err| env_error(name, format!("'{}': {}", value, e)))
}

fn env_error(name: &str, message: String) -> DeployError {
    DeployError::InvalidConfig {
        file: PathBuf::from(format!("${}", name)),
        message,
    }
}

/// Get XDG config directory
fn dirs_config_dir() -> Option<PathBuf> {
    std::env::var("XDG_CONFIG_HOME")
        .ok()
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .or_else(|| dirs::home_dir().map(|h| h.join(".config")))
}

fn find_line_number(content: &str, needle: &str) -> Option<usize> {
    content
        .lines()
        .position(|line| line.contains(needle))
        .map(|i| i + 1)
}

fn suggest_key(unknown: &str) -> Option<String> {
    const CANDIDATES: &[&str] = &[
        "policy",
        "changes_threshold",
        "homepage_cooldown",
        "report_cooldown",
        "report_sample_size",
        "first_observation",
        "paths",
        "code_file",
        "homepage",
        "reports_dir",
        "reports_glob",
        "state_file",
        "lock_file",
        "lock",
        "stale_after_secs",
        "publish",
        "homepage_command",
        "reports_command",
        "cache_bust_command",
        "stage_paths",
        "optional_stage_paths",
        "git",
        "remote",
        "branch",
        "commit_message",
        "watch",
        "debounce_ms",
    ];

    let mut best: Option<(&str, usize)> = None;
    for candidate in CANDIDATES {
        let dist = levenshtein(unknown, candidate);
        best = match best {
            None => Some((candidate, dist)),
            Some((_, best_dist)) if dist < best_dist => Some((candidate, dist)),
            Some(current) => Some(current),
        };
    }

    match best {
        Some((candidate, dist)) if dist <= 2 => Some(candidate.to_string()),
        _ => None,
    }
}

fn levenshtein(a: &str, b: &str) -> usize {
    if a == b {
        return 0;
    }

    let a_bytes = a.as_bytes();
    let b_bytes = b.as_bytes();

    let mut prev: Vec<usize> = (0..=b_bytes.len()).collect();
    let mut curr = vec![0usize; b_bytes.len() + 1];

    for (i, &ac) in a_bytes.iter().enumerate() {
        curr[0] = i + 1;
        for (j, &bc) in b_bytes.iter().enumerate() {
            let cost = if ac == bc { 0 } else { 1 };
            curr[j + 1] =
                std::cmp::min(std::cmp::min(prev[j + 1] + 1, curr[j] + 1), prev[j] + cost);
        }
        prev.clone_from_slice(&curr);
    }

    prev[b_bytes.len()]
}
