//! DeployLock port
//!
//! Non-blocking, process-wide mutual exclusion for deployments.

use std::fmt;
use std::path::PathBuf;

use crate::domain::entities::LockHolder;
use crate::domain::value_objects::DeployClass;

pub trait DeployLock {
    /// Try to take the lock without blocking.
    fn try_acquire(&self, class: DeployClass) -> Result<LockAttempt, LockError>;

    /// Read the current holder record, if any. Never blocks.
    fn current_holder(&self) -> Option<LockHolder>;
}

pub enum LockAttempt {
    Acquired(LockGuard),
    /// Someone else holds the lock
    Contended { holder: Option<LockHolder> },
}

impl fmt::Debug for LockAttempt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LockAttempt::Acquired(_) => f.write_str("Acquired"),
            LockAttempt::Contended { holder } => {
                f.debug_struct("Contended").field("holder", holder).finish()
            }
        }
    }
}

/// A held lock implementation. `release` must be idempotent and must not fail loudly.
pub trait HeldLock {
    fn release(&mut self);
}

/// Scoped lock handle. Dropping it releases the lock.
pub struct LockGuard {
    inner: Option<Box<dyn HeldLock>>,
}

impl LockGuard {
    pub fn new(held: Box<dyn HeldLock>) -> Self {
        Self { inner: Some(held) }
    }

    /// Release now instead of at end of scope
    pub fn release(mut self) {
        self.release_inner();
    }

    pub fn is_held(&self) -> bool {
        self.inner.is_some()
    }

    fn release_inner(&mut self) {
        if let Some(mut held) = self.inner.take() {
            held.release();
        }
    }
}

impl Drop for LockGuard {
    fn drop(&mut self) {
        self.release_inner();
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum LockError {
    #[error("Failed to access lock {path}: {message}")]
    AccessError { path: PathBuf, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct CountingLock {
        releases: Arc<AtomicUsize>,
        released: bool,
    }

    impl HeldLock for CountingLock {
        fn release(&mut self) {
            if !self.released {
                self.released = true;
                self.releases.fetch_add(1, Ordering::SeqCst);
            }
        }
    }

    fn guard() -> (LockGuard, Arc<AtomicUsize>) {
        let releases = Arc::new(AtomicUsize::new(0));
        let guard = LockGuard::new(Box::new(CountingLock {
            releases: releases.clone(),
            released: false,
        }));
        (guard, releases)
    }

    #[test]
    fn drop_releases_once() {
        let (guard, releases) = guard();
        assert!(guard.is_held());
        drop(guard);
        assert_eq!(releases.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn explicit_release_does_not_double_release_on_drop() {
        let (guard, releases) = guard();
        guard.release();
        assert_eq!(releases.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn releasing_nothing_is_noop() {
        let none: Option<LockGuard> = None;
        drop(none);
    }
}
