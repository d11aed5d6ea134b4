use parking_lot::RwLock;
use std::str::FromStr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;

use crate::error::{CellGuardError, Result};
use crate::types::Timestamp;

/// Source of monotonic time for the presence source and front ends.
///
/// The access core never reads a clock itself; callers sample one and pass
/// the resulting [`Timestamp`] into every transition.
pub trait Clock: Send + Sync {
    fn now(&self) -> Timestamp;
}

/// Wall-independent clock backed by [`Instant`], anchored at construction.
#[derive(Debug, Clone)]
pub struct MonotonicClock {
    epoch: Instant,
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            epoch: Instant::now(),
        }
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> Timestamp {
        Timestamp::from_duration(self.epoch.elapsed())
    }
}

/// Clock that only moves when told to. Used by tests and the scripted simulation.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Arc<RwLock<Timestamp>>,
}

impl ManualClock {
    pub fn new(start: Timestamp) -> Self {
        Self {
            now: Arc::new(RwLock::new(start)),
        }
    }

    pub fn set(&self, at: Timestamp) {
        *self.now.write() = at;
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.write();
        *now = *now + by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        *self.now.read()
    }
}

/// Configured clock backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockSource {
    Monotonic,
    Manual,
}

impl FromStr for ClockSource {
    type Err = CellGuardError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "monotonic" => Ok(Self::Monotonic),
            "manual" => Ok(Self::Manual),
            other => Err(CellGuardError::ClockUnavailable(format!(
                "unknown clock source '{other}'"
            ))),
        }
    }
}

impl ClockSource {
    pub const VALID: [&'static str; 2] = ["monotonic", "manual"];

    /// Resolve a configured source name into a running clock.
    /// An unknown source is a fatal configuration error.
    pub fn open(name: &str) -> Result<Arc<dyn Clock>> {
        let source: ClockSource = name.parse()?;
        debug!(?source, "clock source selected");
        Ok(match source {
            Self::Monotonic => Arc::new(MonotonicClock::new()),
            Self::Manual => Arc::new(ManualClock::default()),
        })
    }
}
