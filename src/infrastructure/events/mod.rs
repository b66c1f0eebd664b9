//! Event Sink Implementations
//!
//! Provides concrete implementations of DeployEventSink:
//! - JsonEventSink: NDJSON output for cron/CI
//! - ConsoleEventSink (in `ui`): human-readable progress

mod json;

pub use json::JsonEventSink;
