//! # cellguard-config
//!
//! Configuration system for cellguard. Reads from `cellguard.toml`, then applies
//! environment variable overrides, then validates.
//!
//! There is no hot-reload: the clearance table is frozen for the process lifetime.

pub mod loader;
pub mod schema;

pub use loader::ConfigLoader;
pub use schema::CellGuardConfig;
pub use schema::{ConfigWarning, WarningSeverity};
