//! Infrastructure Layer
//!
//! Concrete implementations of domain ports.
//! This layer handles all I/O operations.
//!
//! ## Structure
//!
//! - `fs/` - Local file system
//! - `repositories/` - JSON state repository
//! - `lock/` - File-based deployment lock
//! - `publish/` - Subprocess runner and publish chains
//! - `events/` - Event sinks

pub mod clock;
pub mod events;
pub mod fs;
pub mod lock;
pub mod publish;
pub mod repositories;

// Re-export for convenience
pub use clock::SystemClock;
pub use events::JsonEventSink;
pub use fs::LocalFs;
pub use lock::FileDeployLock;
pub use publish::{CommandPublisher, PublishSettings, SystemCommandRunner};
pub use repositories::JsonStateRepository;
