//! Application Layer
//!
//! Use cases that orchestrate the business flow.
//! This layer:
//! - Depends on Domain layer (entities, services, ports)
//! - Does NOT contain business rules (those are in Domain)
//! - Coordinates between Infrastructure and Domain
//!
//! ## Use Cases
//!
//! - `DeployUseCase` - One coordinator run (lock, detect, decide, publish, persist)
//! - `StatusUseCase` - Read-only state and lock summary
//! - `WatchUseCase` - File watching that triggers coordinator runs

pub mod deploy;
pub mod status;
pub mod watch;

pub use deploy::{DeployOptions, DeployUseCase, RunOutcome, RunReport};
pub use status::{StatusReport, StatusUseCase};
pub use watch::{classify_batch, WatchEvent, WatchOptions, WatchUseCase, WatcherState};
