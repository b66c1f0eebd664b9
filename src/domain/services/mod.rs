//! Domain Services
//!
//! Business logic that operates on domain entities through ports.

mod cache_buster;
mod change_detector;

pub use cache_buster::{default_token, rewrite_html, BustSummary, CacheBuster};
pub use change_detector::{fingerprint_key, ChangeDetector, DetectorSettings};
