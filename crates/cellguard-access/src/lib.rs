//! # cellguard-access
//!
//! The override authorization core. A frozen clearance registry feeds a
//! two-factor handshake gate; a presence watchdog bounds how long an
//! authenticated override survives without a confirmed operator; the access
//! controller combines both into the SAFE / OVERRIDE / TIMEOUT state machine.

pub mod controller;
pub mod handshake;
pub mod intent;
pub mod registry;
pub mod snapshot;
pub mod watchdog;

pub use controller::{AccessController, PulseOutcome, Session};
pub use handshake::{Grant, HandshakeGate};
pub use intent::IntentMatcher;
pub use registry::ClearanceRegistry;
pub use snapshot::AccessSnapshot;
pub use watchdog::Watchdog;
