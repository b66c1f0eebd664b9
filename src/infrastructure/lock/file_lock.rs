//! File Deploy Lock
//!
//! Exclusive advisory lock (`fs2`) on a lock file, default `deployment.lock`.
//! The file carries a JSON holder record. The operating system drops the lock
//! when the holder dies, so a crashed holder's file is simply reclaimed.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::domain::entities::LockHolder;
use crate::domain::ports::{DeployLock, HeldLock, LockAttempt, LockError, LockGuard};
use crate::domain::value_objects::DeployClass;

/// Reopen attempts when the path was unlinked between open and lock
const MAX_OPEN_ATTEMPTS: usize = 3;

#[derive(Debug, Serialize, Deserialize)]
struct JsonHolder {
    pid: u32,
    hostname: String,
    acquired_at: i64,
    #[serde(default)]
    class: Option<DeployClass>,
}

impl From<JsonHolder> for LockHolder {
    fn from(h: JsonHolder) -> Self {
        LockHolder {
            pid: h.pid,
            hostname: h.hostname,
            acquired_at: h.acquired_at,
            class: h.class,
        }
    }
}

pub struct FileDeployLock {
    path: PathBuf,
}

impl FileDeployLock {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn access_error(&self, err: io::Error) -> LockError {
        LockError::AccessError {
            path: self.path.clone(),
            message: err.to_string(),
        }
    }

    fn open(&self) -> io::Result<File> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&self.path)
    }

    /// Holder record as written in the file, regardless of liveness
    fn read_record(&self) -> Option<LockHolder> {
        let content = fs::read_to_string(&self.path).ok()?;
        if content.trim().is_empty() {
            return None;
        }
        match serde_json::from_str::<JsonHolder>(&content) {
            Ok(holder) => Some(holder.into()),
            Err(e) => {
                debug!(path = %self.path.display(), error = %e, "unreadable lock holder record");
                None
            }
        }
    }

    fn write_record(&self, file: &mut File, class: DeployClass) -> io::Result<()> {
        let holder = JsonHolder {
            pid: std::process::id(),
            hostname: hostname(),
            acquired_at: chrono::Utc::now().timestamp(),
            class: Some(class),
        };
        let json = serde_json::to_string(&holder).map_err(io::Error::other)?;
        file.set_len(0)?;
        file.seek(SeekFrom::Start(0))?;
        file.write_all(json.as_bytes())?;
        file.write_all(b"\n")?;
        file.sync_all()
    }
}

impl DeployLock for FileDeployLock {
    fn try_acquire(&self, class: DeployClass) -> Result<LockAttempt, LockError> {
        for _ in 0..MAX_OPEN_ATTEMPTS {
            let mut file = self.open().map_err(|e| self.access_error(e))?;

            match file.try_lock_exclusive() {
                Ok(()) => {}
                Err(e) if is_contended(&e) => {
                    return Ok(LockAttempt::Contended {
                        holder: self.read_record(),
                    });
                }
                Err(e) => return Err(self.access_error(e)),
            }

            // A releaser may have unlinked the path after we opened it
            if !refers_to(&file, &self.path) {
                let _ = file.unlock();
                debug!(path = %self.path.display(), "lock file replaced while acquiring, retrying");
                continue;
            }

            if let Some(leftover) = self.read_record() {
                warn!(
                    holder = %leftover.describe(),
                    "reclaiming deployment lock left by a previous process"
                );
            }

            if let Err(e) = self.write_record(&mut file, class) {
                let _ = file.unlock();
                return Err(self.access_error(e));
            }

            return Ok(LockAttempt::Acquired(LockGuard::new(Box::new(
                FileLockHandle {
                    file: Some(file),
                    path: self.path.clone(),
                },
            ))));
        }

        Ok(LockAttempt::Contended {
            holder: self.read_record(),
        })
    }

    /// The recorded holder, unless it is provably gone (same host, dead PID)
    fn current_holder(&self) -> Option<LockHolder> {
        let holder = self.read_record()?;
        if holder.hostname == hostname() && !is_pid_alive(holder.pid) {
            return None;
        }
        Some(holder)
    }
}

struct FileLockHandle {
    file: Option<File>,
    path: PathBuf,
}

impl HeldLock for FileLockHandle {
    fn release(&mut self) {
        let Some(file) = self.file.take() else {
            return;
        };
        // Unlink before unlocking so nobody can lock the old inode afterwards
        if let Err(e) = fs::remove_file(&self.path) {
            debug!(path = %self.path.display(), error = %e, "failed to remove lock file");
        }
        if let Err(e) = file.unlock() {
            debug!(path = %self.path.display(), error = %e, "failed to unlock");
        }
    }
}

fn is_contended(err: &io::Error) -> bool {
    err.raw_os_error().is_some()
        && err.raw_os_error() == fs2::lock_contended_error().raw_os_error()
}

#[cfg(unix)]
fn refers_to(file: &File, path: &Path) -> bool {
    use std::os::unix::fs::MetadataExt;
    match (file.metadata(), fs::metadata(path)) {
        (Ok(open), Ok(on_disk)) => open.dev() == on_disk.dev() && open.ino() == on_disk.ino(),
        _ => false,
    }
}

#[cfg(not(unix))]
fn refers_to(_file: &File, path: &Path) -> bool {
    path.exists()
}

/// Host name from the environment, or "unknown"
fn hostname() -> String {
    std::env::var("HOSTNAME")
        .or_else(|_| std::env::var("HOST"))
        .unwrap_or_else(|_| "unknown".into())
}

#[cfg(target_os = "linux")]
fn is_pid_alive(pid: u32) -> bool {
    Path::new(&format!("/proc/{pid}")).exists()
}

#[cfg(not(target_os = "linux"))]
fn is_pid_alive(_pid: u32) -> bool {
    true
}
