//! Watch Use Case
//!
//! Turns file changes into coordinator runs. It orchestrates:
//! - File system monitoring (via `notify` crate)
//! - Debouncing (2s default)
//! - Classification of a change batch into a deployment class
//!
//! ## Usage
//!
//! ```ignore
//! let use_case = WatchUseCase::new(options);
//! use_case.start(running, |event| { ... }, |class| coordinator.run(...))?;
//! ```

mod event;
mod use_case;

#[cfg(test)]
mod tests;

pub use event::{classify_batch, WatchEvent, WatchOptions, WatcherState, DEBOUNCE_MS};
pub use use_case::WatchUseCase;
