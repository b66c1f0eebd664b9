//! Domain Policies
//!
//! Business rules that govern deployment decisions.
//! These are pure functions that operate on domain entities.

mod deploy_policy;

pub use deploy_policy::{
    cooldown_remaining, Decision, DeployAction, DeployPolicy, NoOpReason, PolicySettings,
    ReportTrigger,
};
