use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Add;
use std::time::Duration;
use uuid::Uuid;

/// Unique identifier for an override session.
pub type SessionId = Uuid;

/// Canonical form of an identity token: surrounding whitespace trimmed, upper-cased.
/// Returns `None` for empty or all-whitespace input.
pub fn normalize_identity(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.to_uppercase())
}

/// Three clearance tiers, ordered by trust:
///
/// - **Tier 1 (Standard)**: reduced speed envelope, stock stiffness.
/// - **Tier 2 (Maintenance)**: most of the speed envelope, boosted stiffness.
/// - **Tier 3 (Admin)**: full speed envelope, maximum stiffness boost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Tier {
    #[serde(rename = "TIER_1")]
    Tier1 = 1,
    #[serde(rename = "TIER_2")]
    Tier2 = 2,
    #[serde(rename = "TIER_3")]
    Tier3 = 3,
}

impl Tier {
    /// Numeric form used in config files. Anything outside 1..=3 is not a tier.
    pub fn from_u8(v: u8) -> Option<Self> {
        match v {
            1 => Some(Self::Tier1),
            2 => Some(Self::Tier2),
            3 => Some(Self::Tier3),
            _ => None,
        }
    }

    pub fn as_u8(&self) -> u8 {
        *self as u8
    }

    /// Operating envelope granted while this tier holds the override.
    pub fn profile(&self) -> ClearanceProfile {
        match self {
            Self::Tier1 => ClearanceProfile {
                name: "Standard",
                tier: *self,
                speed_limit_scale: 0.5,
                stiffness_boost: 1.0,
            },
            Self::Tier2 => ClearanceProfile {
                name: "Maintenance",
                tier: *self,
                speed_limit_scale: 0.8,
                stiffness_boost: 1.5,
            },
            Self::Tier3 => ClearanceProfile {
                name: "Admin",
                tier: *self,
                speed_limit_scale: 1.0,
                stiffness_boost: 2.0,
            },
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TIER_{} ({})", self.as_u8(), self.profile().name)
    }
}

/// Contingency clearance table used when no registry is configured: one operator per tier.
pub const DEFAULT_CLEARANCES: [(&str, Tier); 3] = [
    ("OP-7721", Tier::Tier1),
    ("MAINT-900", Tier::Tier2),
    ("ARCH-001", Tier::Tier3),
];

/// Spoken phrases accepted as the secondary factor when none are configured.
pub const DEFAULT_INTENTS: [&str; 3] = ["start maintenance", "admin override", "system check"];

/// Capabilities bounded by a clearance tier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ClearanceProfile {
    pub name: &'static str,
    pub tier: Tier,
    /// Fraction of the cell's rated joint speed available in override.
    pub speed_limit_scale: f32,
    /// Multiplier applied to the compliance controller's stiffness.
    pub stiffness_boost: f32,
}

/// Externally visible posture of the workcell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccessState {
    /// Standard guard interlocks active. Initial state.
    Safe,
    /// Manual override granted to an authenticated operator.
    Override,
    /// Override revoked by the presence watchdog.
    Timeout,
}

impl AccessState {
    pub fn is_elevated(&self) -> bool {
        matches!(self, Self::Override)
    }
}

impl fmt::Display for AccessState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Safe => "SAFE",
            Self::Override => "OVERRIDE",
            Self::Timeout => "TIMEOUT",
        })
    }
}

/// A monotonic instant, expressed as an offset from an arbitrary process epoch.
///
/// Timestamps are supplied by the caller (see [`crate::Clock`]), never read
/// internally, so every timing decision is reproducible in tests.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Timestamp(Duration);

impl Timestamp {
    pub const EPOCH: Timestamp = Timestamp(Duration::ZERO);

    pub const fn from_duration(offset: Duration) -> Self {
        Self(offset)
    }

    /// Negative or non-finite values clamp to the epoch.
    pub fn from_secs_f64(secs: f64) -> Self {
        Self(Duration::try_from_secs_f64(secs).unwrap_or(Duration::ZERO))
    }

    pub const fn from_millis(millis: u64) -> Self {
        Self(Duration::from_millis(millis))
    }

    pub const fn as_duration(&self) -> Duration {
        self.0
    }

    pub fn as_secs_f64(&self) -> f64 {
        self.0.as_secs_f64()
    }

    /// Time elapsed since `earlier`, zero if `earlier` is in the future.
    pub fn saturating_since(&self, earlier: Timestamp) -> Duration {
        self.0.saturating_sub(earlier.0)
    }
}

impl Add<Duration> for Timestamp {
    type Output = Timestamp;

    fn add(self, rhs: Duration) -> Self::Output {
        Timestamp(self.0.saturating_add(rhs))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T+{:.3}s", self.as_secs_f64())
    }
}
