//! Domain Layer
//!
//! The coordinator's business logic, free of direct I/O.
//!
//! ## Structure
//!
//! - `entities/` - Deployment state, change reports, lock holders
//! - `value_objects/` - Deploy classes, content hashes, report globs
//! - `services/` - Change detection
//! - `policies/` - The deployment decision table
//! - `ports/` - Interface definitions for infrastructure
//!
//! ## Design Principles
//!
//! 1. **No I/O** - This layer never touches the file system or processes directly
//! 2. **Pure Functions** - The policy is a plain function of its inputs
//! 3. **Ports & Adapters** - All I/O goes through trait-defined ports

pub mod entities;
pub mod policies;
pub mod ports;
pub mod services;
pub mod value_objects;
