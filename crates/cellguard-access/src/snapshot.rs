use cellguard_core::{AccessState, ClearanceProfile, SessionId, Tier, Timestamp};
use serde::Serialize;
use std::time::Duration;

use crate::controller::Session;

/// Read-only telemetry packet assembled for dashboards.
#[derive(Debug, Clone, Serialize)]
pub struct AccessSnapshot {
    pub state: AccessState,
    pub tier: Option<Tier>,
    pub profile: Option<ClearanceProfile>,
    pub identity: Option<String>,
    pub session_id: Option<SessionId>,
    /// Instant the override was granted, on the caller's clock.
    pub granted_at: Option<Timestamp>,
    /// Seconds before the watchdog trips; 0 outside OVERRIDE.
    pub time_left_secs: f64,
    pub timeout_secs: f64,
}

impl AccessSnapshot {
    pub(crate) fn elevated(session: &Session, remaining: Duration, threshold: Duration) -> Self {
        Self {
            state: AccessState::Override,
            tier: Some(session.tier),
            profile: Some(session.tier.profile()),
            identity: Some(session.identity.clone()),
            session_id: Some(session.id),
            granted_at: Some(session.granted_at),
            time_left_secs: remaining.as_secs_f64(),
            timeout_secs: threshold.as_secs_f64(),
        }
    }

    pub(crate) fn standby(state: AccessState, threshold: Duration) -> Self {
        Self {
            state,
            tier: None,
            profile: None,
            identity: None,
            session_id: None,
            granted_at: None,
            time_left_secs: 0.0,
            timeout_secs: threshold.as_secs_f64(),
        }
    }

    /// Share of the watchdog window still left, in `0.0..=1.0`.
    pub fn fraction_left(&self) -> f64 {
        if self.timeout_secs <= 0.0 {
            return 0.0;
        }
        (self.time_left_secs / self.timeout_secs).clamp(0.0, 1.0)
    }
}
