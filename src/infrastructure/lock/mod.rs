//! Deployment lock implementations

mod file_lock;

pub use file_lock::FileDeployLock;
