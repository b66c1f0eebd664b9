//! Lock holder entity
//!
//! Identity of the process holding the deployment lock, written into the
//! lock file so contention messages and `status` can name it.

use crate::domain::value_objects::DeployClass;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockHolder {
    pub pid: u32,
    pub hostname: String,
    /// Epoch seconds
    pub acquired_at: i64,
    pub class: Option<DeployClass>,
}

impl LockHolder {
    /// Seconds the lock has been held as of `now`
    pub fn held_for(&self, now: i64) -> u64 {
        u64::try_from(now.saturating_sub(self.acquired_at)).unwrap_or(0)
    }

    /// Whether the holder has kept the lock longer than `stale_after` seconds
    pub fn is_stale(&self, now: i64, stale_after: u64) -> bool {
        self.held_for(now) > stale_after
    }

    pub fn describe(&self) -> String {
        match self.class {
            Some(class) => format!("PID {} on {} ({})", self.pid, self.hostname, class),
            None => format!("PID {} on {}", self.pid, self.hostname),
        }
    }
}
