//! Deploy Module
//!
//! Orchestrates one coordinator invocation.
//!
//! ## Structure
//!
//! - `options` - Invocation options (`DeployOptions`)
//! - `result` - Outcome types (`RunOutcome`, `RunReport`)
//! - `use_case` - Core use case logic (`DeployUseCase`)
//!
//! ## Usage
//!
//! ```ignore
//! use prospector_deploy::application::deploy::{DeployOptions, DeployUseCase};
//!
//! let use_case = DeployUseCase::new(state_repo, lock, detector, policy, publisher, clock);
//! let outcome = use_case.run(&DeployOptions::new(DeployClass::Auto))?;
//! ```

mod options;
mod result;
mod use_case;

pub use options::DeployOptions;
pub use result::{RunOutcome, RunReport};
pub use use_case::DeployUseCase;
