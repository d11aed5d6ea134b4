//! # cellguard-cli
//!
//! Command-line interface for the cellguard override controller.
//!
//! ## Commands
//!
//! - `cellguard auth` — Run the two-factor handshake against the configured registry
//! - `cellguard simulate` — Scripted audit: badge-in, presence pulses, watchdog timeout
//! - `cellguard config` — Show the effective configuration
//! - `cellguard doctor` — Report configuration warnings
//! - `cellguard completions` — Generate shell completions

pub mod commands;
pub mod dashboard;

pub use commands::Cli;
