use cellguard_core::{AuthError, Tier, normalize_identity};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::registry::ClearanceRegistry;

/// A successful handshake: the canonical identity and the tier it resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grant {
    pub identity: String,
    pub tier: Tier,
}

/// The two-factor gate in front of the override.
///
/// Pure evaluation: the gate never touches controller state, so it can be
/// exercised on its own.
#[derive(Debug, Clone)]
pub struct HandshakeGate {
    registry: Arc<ClearanceRegistry>,
}

impl HandshakeGate {
    pub fn new(registry: Arc<ClearanceRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &ClearanceRegistry {
        &self.registry
    }

    /// Resolve the identity's tier, provided the secondary factor is confirmed.
    pub fn authenticate(
        &self,
        identity: &str,
        secondary_factor_confirmed: bool,
    ) -> Result<Tier, AuthError> {
        self.handshake(identity, secondary_factor_confirmed)
            .map(|grant| grant.tier)
    }

    /// Like [`authenticate`](Self::authenticate), also returning the canonical identity.
    ///
    /// The identity is checked first: an unknown badge reports `IdentityNotFound`
    /// whatever the secondary factor says.
    pub fn handshake(
        &self,
        identity: &str,
        secondary_factor_confirmed: bool,
    ) -> Result<Grant, AuthError> {
        let Some(canonical) = normalize_identity(identity) else {
            warn!("handshake denied: blank identity");
            return Err(AuthError::IdentityNotFound);
        };

        let Some(tier) = self.registry.lookup(&canonical) else {
            warn!(identity = %canonical, "handshake denied: identity not registered");
            return Err(AuthError::IdentityNotFound);
        };

        if !secondary_factor_confirmed {
            warn!(identity = %canonical, "handshake denied: secondary factor not confirmed");
            return Err(AuthError::SecondaryFactorMissing);
        }

        debug!(identity = %canonical, %tier, "handshake passed");
        Ok(Grant {
            identity: canonical,
            tier,
        })
    }
}
