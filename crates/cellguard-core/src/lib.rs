//! # cellguard-core
//!
//! Core types and primitives for the cellguard override controller.
//! This crate defines the shared vocabulary used by every other crate in the workspace:
//! clearance tiers, access states, monotonic timestamps, clocks, transition events,
//! and the unified error type.

pub mod clock;
pub mod error;
pub mod event;
pub mod types;

pub use clock::{Clock, ClockSource, ManualClock, MonotonicClock};
pub use error::{AuthError, CellGuardError, Result};
pub use event::{AccessEvent, EventBus};
pub use types::*;
