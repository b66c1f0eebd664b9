//! Publish action implementations
//!
//! - `SystemCommandRunner` - subprocess execution
//! - `CommandPublisher` - the homepage and full-report chains

mod chains;
mod command;

pub use chains::{CommandPublisher, PublishSettings};
pub use command::SystemCommandRunner;
