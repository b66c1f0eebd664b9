//! Domain Entities
//!
//! - `DeploymentState` - The durable coordinator record
//! - `ChangeReport` - Result of one change-detection pass
//! - `LockHolder` - Identity recorded in the deployment lock

mod change_report;
mod deployment_state;
mod lock_holder;

pub use change_report::ChangeReport;
pub use deployment_state::{DeployOutcome, DeploymentRecord, DeploymentState, PendingDeploy};
pub use lock_holder::LockHolder;
