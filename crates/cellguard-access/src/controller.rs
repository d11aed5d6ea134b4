use cellguard_config::CellGuardConfig;
use cellguard_core::{
    AccessEvent, AccessState, AuthError, CellGuardError, EventBus, Result, SessionId, Tier,
    Timestamp, normalize_identity,
};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tracing::{error, info};
use uuid::Uuid;

use crate::handshake::HandshakeGate;
use crate::registry::ClearanceRegistry;
use crate::snapshot::AccessSnapshot;
use crate::watchdog::Watchdog;

/// An active override: who holds it, at which tier, since when.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub id: SessionId,
    pub identity: String,
    pub tier: Tier,
    pub granted_at: Timestamp,
}

/// Controller posture. The tier lives inside `Override`, so SAFE and TIMEOUT
/// cannot carry one.
#[derive(Debug, Clone)]
enum Posture {
    Safe,
    Override(Session),
    Timeout,
}

impl Posture {
    fn state(&self) -> AccessState {
        match self {
            Self::Safe => AccessState::Safe,
            Self::Override(_) => AccessState::Override,
            Self::Timeout => AccessState::Timeout,
        }
    }
}

#[derive(Debug)]
struct ControllerState {
    posture: Posture,
    watchdog: Watchdog,
}

/// Result of feeding one presence sample to the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PulseOutcome {
    /// No override is active; the sample was ignored.
    Standby,
    /// Override still held; `remaining` until the watchdog trips.
    Active { remaining: Duration },
    /// The watchdog tripped on this sample and the override was revoked.
    Expired { elapsed: Duration },
}

/// Owns the access state and the presence watchdog.
///
/// Cloning yields another handle to the same controller. Every operation takes
/// the one lock for its whole read-modify-write, so calls from different
/// handles never interleave.
#[derive(Clone)]
pub struct AccessController {
    gate: HandshakeGate,
    threshold: Duration,
    state: Arc<Mutex<ControllerState>>,
    events: EventBus,
}

impl AccessController {
    pub fn new(gate: HandshakeGate, threshold: Duration) -> Self {
        Self {
            gate,
            threshold,
            state: Arc::new(Mutex::new(ControllerState {
                posture: Posture::Safe,
                watchdog: Watchdog::new(),
            })),
            events: EventBus::default(),
        }
    }

    /// Build the registry, gate, and watchdog threshold from a loaded config.
    pub fn from_config(config: &CellGuardConfig) -> Result<Self> {
        let threshold = config.watchdog.timeout().ok_or_else(|| {
            CellGuardError::ConfigValidation {
                field: "watchdog.timeout_secs".into(),
                reason: format!("{} is not a positive duration", config.watchdog.timeout_secs),
            }
        })?;
        let registry = ClearanceRegistry::from_entries(config.tier_table())?;
        info!(
            identities = registry.len(),
            timeout_secs = threshold.as_secs_f64(),
            "access controller ready"
        );
        Ok(Self::new(HandshakeGate::new(Arc::new(registry)), threshold))
    }

    /// Run the handshake and, on success, enter (or stay in) OVERRIDE with the
    /// resolved tier and a freshly reset watchdog.
    ///
    /// On failure the state is left exactly as it was, including an existing
    /// override session.
    pub fn request_override(
        &self,
        identity: &str,
        secondary_factor_confirmed: bool,
        now: Timestamp,
    ) -> std::result::Result<Tier, AuthError> {
        let mut guard = self.state.lock();
        let state = &mut *guard;
        let previous = state.posture.state();

        let grant = match self.gate.handshake(identity, secondary_factor_confirmed) {
            Ok(grant) => grant,
            Err(reason) => {
                self.events.publish(AccessEvent::OverrideDenied {
                    identity: normalize_identity(identity).unwrap_or_default(),
                    reason,
                    state: previous,
                    at: now,
                });
                return Err(reason);
            }
        };

        let session = Session {
            id: Uuid::new_v4(),
            identity: grant.identity,
            tier: grant.tier,
            granted_at: now,
        };
        info!(
            identity = %session.identity,
            tier = %session.tier,
            %previous,
            at = %now,
            "override granted"
        );

        state.watchdog = Watchdog::armed_at(now);
        self.events.publish(AccessEvent::OverrideGranted {
            session_id: session.id,
            identity: session.identity.clone(),
            tier: session.tier,
            previous,
            at: now,
        });
        state.posture = Posture::Override(session);
        Ok(grant.tier)
    }

    /// Feed one presence sample. Only meaningful in OVERRIDE; elsewhere it is ignored.
    pub fn presence_tick(&self, confirmed: bool, now: Timestamp) -> PulseOutcome {
        let mut guard = self.state.lock();
        let state = &mut *guard;
        let Posture::Override(session) = &state.posture else {
            return PulseOutcome::Standby;
        };

        if confirmed {
            state.watchdog.on_presence(true, now);
            return PulseOutcome::Active {
                remaining: self.threshold,
            };
        }

        if !state.watchdog.is_expired(now, self.threshold) {
            return PulseOutcome::Active {
                remaining: state.watchdog.remaining(now, self.threshold),
            };
        }

        let elapsed = state.watchdog.elapsed_since_presence(now);
        error!(
            identity = %session.identity,
            elapsed_secs = elapsed.as_secs_f64(),
            "watchdog expired: operator absent, override revoked"
        );
        let event = AccessEvent::WatchdogExpired {
            session_id: session.id,
            identity: session.identity.clone(),
            elapsed_ms: u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
            at: now,
        };
        state.posture = Posture::Timeout;
        state.watchdog.clear();
        self.events.publish(event);
        PulseOutcome::Expired { elapsed }
    }

    /// Manually end an override. Returns `false` (and does nothing) outside OVERRIDE.
    pub fn release(&self) -> bool {
        let mut guard = self.state.lock();
        let state = &mut *guard;
        let session = match std::mem::replace(&mut state.posture, Posture::Safe) {
            Posture::Override(session) => session,
            other => {
                state.posture = other;
                return false;
            }
        };
        state.watchdog.clear();
        info!(identity = %session.identity, "override released");
        self.events.publish(AccessEvent::OverrideReleased {
            session_id: session.id,
            identity: session.identity,
        });
        true
    }

    pub fn current_state(&self) -> AccessState {
        self.state.lock().posture.state()
    }

    pub fn current_tier(&self) -> Option<Tier> {
        match &self.state.lock().posture {
            Posture::Override(session) => Some(session.tier),
            _ => None,
        }
    }

    pub fn session(&self) -> Option<Session> {
        match &self.state.lock().posture {
            Posture::Override(session) => Some(session.clone()),
            _ => None,
        }
    }

    /// Watchdog threshold this controller was built with.
    pub fn threshold(&self) -> Duration {
        self.threshold
    }

    pub fn gate(&self) -> &HandshakeGate {
        &self.gate
    }

    /// Point-in-time telemetry for dashboards.
    pub fn snapshot(&self, now: Timestamp) -> AccessSnapshot {
        let state = self.state.lock();
        match &state.posture {
            Posture::Override(session) => AccessSnapshot::elevated(
                session,
                state.watchdog.remaining(now, self.threshold),
                self.threshold,
            ),
            posture => AccessSnapshot::standby(posture.state(), self.threshold),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AccessEvent> {
        self.events.subscribe()
    }
}
