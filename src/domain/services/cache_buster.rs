//! Cache-busting rewriter
//!
//! Appends `?v=<token>` to stylesheet, script and image references in HTML
//! files so browsers refetch them after a deploy. An existing `?v=` token is
//! replaced rather than duplicated.

use std::borrow::Cow;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;
use tracing::{debug, warn};

use crate::domain::ports::FileSystem;
use crate::domain::value_objects::ReportGlob;

fn css_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"(href="[^"?]+\.css)(?:\?v=[^"]*)?""#).expect("valid css pattern")
    })
}

fn script_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"(src="[^"?]+\.js)(?:\?v=[^"]*)?""#).expect("valid script pattern")
    })
}

fn image_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"(src="[^"?]+\.(?:jpg|jpeg|png|gif|webp))(?:\?v=[^"]*)?""#)
            .expect("valid image pattern")
    })
}

/// Default token: UTC `%Y%m%d%H%M%S`
pub fn default_token() -> String {
    chrono::Utc::now().format("%Y%m%d%H%M%S").to_string()
}

/// Rewrite asset references in one HTML document
pub fn rewrite_html<'a>(html: &'a str, token: &str) -> Cow<'a, str> {
    let replacement = format!("${{1}}?v={}\"", token.replace('$', "$$"));
    let mut out = html.to_string();
    for pattern in [css_pattern(), script_pattern(), image_pattern()] {
        let rewritten = pattern.replace_all(&out, replacement.as_str()).into_owned();
        out = rewritten;
    }
    if out == html {
        Cow::Borrowed(html)
    } else {
        Cow::Owned(out)
    }
}

/// Outcome of a directory pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BustSummary {
    pub scanned: usize,
    /// Files whose content changed and were rewritten
    pub updated: Vec<PathBuf>,
    /// Per-file failures; the pass continues past them
    pub errors: Vec<(PathBuf, String)>,
}

impl BustSummary {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

pub struct CacheBuster<FS: FileSystem> {
    fs: FS,
    glob: ReportGlob,
}

impl<FS: FileSystem> CacheBuster<FS> {
    pub fn new(fs: FS, glob: ReportGlob) -> Self {
        Self { fs, glob }
    }

    /// Rewrite every matching file directly inside `dir`
    pub fn bust_directory(&self, dir: &Path, token: &str) -> BustSummary {
        let mut summary = BustSummary::default();

        let files = match self.fs.list_files(dir) {
            Ok(files) => files,
            Err(e) => {
                summary.errors.push((dir.to_path_buf(), e.to_string()));
                return summary;
            }
        };

        for path in files {
            let matches = path
                .file_name()
                .is_some_and(|name| self.glob.matches(Path::new(name)));
            if !matches {
                continue;
            }
            summary.scanned += 1;

            let content = match self.fs.read(&path) {
                Ok(content) => content,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "cache-busting skipped file");
                    summary.errors.push((path, e.to_string()));
                    continue;
                }
            };

            if let Cow::Owned(updated) = rewrite_html(&content, token) {
                match self.fs.write(&path, &updated) {
                    Ok(()) => {
                        debug!(path = %path.display(), "cache-busting applied");
                        summary.updated.push(path);
                    }
                    Err(e) => {
                        warn!(path = %path.display(), error = %e, "cache-busting write failed");
                        summary.errors.push((path, e.to_string()));
                    }
                }
            }
        }

        summary
    }
}
