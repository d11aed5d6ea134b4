use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Outcome of a rejected handshake. Both variants are normal, non-fatal results:
/// the controller state is left unchanged and the caller decides what to do next.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthError {
    /// The identity token is empty, malformed, or not in the clearance registry.
    #[error("identity not found in clearance registry")]
    IdentityNotFound,

    /// The identity is registered but the voice/intent channel did not confirm.
    #[error("secondary factor not confirmed")]
    SecondaryFactorMissing,
}

/// Unified error type for the cellguard workspace.
#[derive(Error, Debug)]
pub enum CellGuardError {
    // ── Authentication ─────────────────────────────────────────
    #[error("authentication failed: {0}")]
    Auth(#[from] AuthError),

    // ── Clock ──────────────────────────────────────────────────
    #[error("clock unavailable: {0}")]
    ClockUnavailable(String),

    // ── Registry ───────────────────────────────────────────────
    #[error("identity registered twice with conflicting tiers: {0}")]
    DuplicateIdentity(String),

    // ── Config errors ──────────────────────────────────────────
    #[error("config error: {0}")]
    Config(String),

    #[error("config validation failed: {field}: {reason}")]
    ConfigValidation { field: String, reason: String },

    // ── Generic wrappers ───────────────────────────────────────
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl CellGuardError {
    /// Fatal errors abort startup; everything else is reported and survived.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::ClockUnavailable(_)
                | Self::DuplicateIdentity(_)
                | Self::Config(_)
                | Self::ConfigValidation { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, CellGuardError>;
