//! Domain Ports (Interfaces)
//!
//! These traits define the boundaries of the domain layer.
//! Infrastructure layer provides concrete implementations.

pub mod clock;
pub mod command_runner;
pub mod deploy_events;
pub mod deploy_lock;
pub mod file_system;
pub mod publisher;
pub mod state_repository;

pub use clock::Clock;
pub use command_runner::{CommandOutput, CommandRunner, CommandSpec};
pub use deploy_events::{DeployEvent, DeployEventSink, NoopEventSink};
pub use deploy_lock::{DeployLock, HeldLock, LockAttempt, LockError, LockGuard};
pub use file_system::{FileSystem, FsError, FsResult};
pub use publisher::{PublishReport, PublishStep, Publisher, StepOutcome, StepReport};
pub use state_repository::{StateError, StateRepository};
