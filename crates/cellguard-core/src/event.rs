use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::sync::Arc;
use tokio::sync::broadcast;

use crate::error::AuthError;
use crate::types::{AccessState, Tier, Timestamp};

/// Transitions published by the access controller for display and telemetry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AccessEvent {
    OverrideGranted {
        session_id: Uuid,
        identity: String,
        tier: Tier,
        previous: AccessState,
        at: Timestamp,
    },
    OverrideDenied {
        identity: String,
        reason: AuthError,
        state: AccessState,
        at: Timestamp,
    },
    OverrideReleased {
        session_id: Uuid,
        identity: String,
    },
    WatchdogExpired {
        session_id: Uuid,
        identity: String,
        elapsed_ms: u64,
        at: Timestamp,
    },
}

impl AccessEvent {
    /// State the controller is in after this event.
    pub fn resulting_state(&self) -> AccessState {
        match self {
            Self::OverrideGranted { .. } => AccessState::Override,
            Self::OverrideDenied { state, .. } => *state,
            Self::OverrideReleased { .. } => AccessState::Safe,
            Self::WatchdogExpired { .. } => AccessState::Timeout,
        }
    }
}

/// A broadcast-based bus for access transition events.
#[derive(Clone)]
pub struct EventBus {
    sender: Arc<broadcast::Sender<AccessEvent>>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender: Arc::new(sender),
        }
    }

    pub fn publish(&self, event: AccessEvent) {
        // Ignore send errors (no subscribers).
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AccessEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(256)
    }
}
