use cellguard_core::{ClockSource, DEFAULT_CLEARANCES, DEFAULT_INTENTS, Tier, normalize_identity};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

/// Root configuration, maps to `cellguard.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CellGuardConfig {
    pub watchdog: WatchdogConfig,
    pub handshake: HandshakeConfig,
    /// Identity token → clearance tier (1, 2 or 3). Frozen once loaded.
    pub registry: BTreeMap<String, u8>,
    pub clock: ClockConfig,
    pub logging: LoggingConfig,
}

// ── Watchdog ───────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchdogConfig {
    /// Seconds of lapsed presence after which an override is revoked.
    /// The override survives a query at exactly this many seconds.
    pub timeout_secs: f64,
}

impl Default for WatchdogConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 300.0,
        }
    }
}

impl WatchdogConfig {
    /// Timeout as a `Duration`. `None` when the configured value is not a usable duration.
    pub fn timeout(&self) -> Option<Duration> {
        if self.timeout_secs <= 0.0 {
            return None;
        }
        Duration::try_from_secs_f64(self.timeout_secs).ok()
    }
}

// ── Handshake ──────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HandshakeConfig {
    /// Spoken phrases accepted as the secondary factor (compared trimmed, case-insensitive).
    pub intents: Vec<String>,
}

impl Default for HandshakeConfig {
    fn default() -> Self {
        Self {
            intents: DEFAULT_INTENTS.iter().map(|i| i.to_string()).collect(),
        }
    }
}

// ── Clock ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClockConfig {
    /// Clock backend: "monotonic" (default) or "manual".
    pub source: String,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            source: "monotonic".into(),
        }
    }
}

// ── Logging ────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: "trace", "debug", "info", "warn", "error".
    pub level: String,
    /// Output format: "pretty", "json", "compact".
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: "pretty".into(),
        }
    }
}

// ── Default for root ───────────────────────────────────────────

impl Default for CellGuardConfig {
    fn default() -> Self {
        Self {
            watchdog: WatchdogConfig::default(),
            handshake: HandshakeConfig::default(),
            registry: default_registry(),
            clock: ClockConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

fn default_registry() -> BTreeMap<String, u8> {
    DEFAULT_CLEARANCES
        .iter()
        .map(|(id, tier)| (id.to_string(), tier.as_u8()))
        .collect()
}

impl CellGuardConfig {
    /// Registry entries with valid tiers, in key order. Entries with an
    /// out-of-range tier are skipped; `validate()` reports them.
    pub fn tier_table(&self) -> Vec<(String, Tier)> {
        self.registry
            .iter()
            .filter_map(|(id, tier)| Tier::from_u8(*tier).map(|t| (id.clone(), t)))
            .collect()
    }
}

// ── Validation ─────────────────────────────────────────────────

/// A single config validation issue.
#[derive(Debug)]
pub struct ConfigWarning {
    pub field: String,
    pub message: String,
    pub severity: WarningSeverity,
    pub hint: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningSeverity {
    Error,
    Warning,
    Info,
}

impl std::fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let icon = match self.severity {
            WarningSeverity::Error => "❌",
            WarningSeverity::Warning => "⚠️ ",
            WarningSeverity::Info => "💡",
        };
        write!(f, "{} {}: {}", icon, self.field, self.message)?;
        if let Some(ref h) = self.hint {
            write!(f, "\n   ↳ {}", h)?;
        }
        Ok(())
    }
}

impl CellGuardConfig {
    /// Validate the config and return a list of warnings/errors.
    /// Returns `Err` with all messages joined if any severity is Error.
    pub fn validate(&self) -> Result<Vec<ConfigWarning>, String> {
        let mut warnings = Vec::new();

        // ── Watchdog timeout ───
        if self.watchdog.timeout().is_none() {
            warnings.push(ConfigWarning {
                field: "watchdog.timeout_secs".into(),
                message: format!("timeout {} is not a positive duration", self.watchdog.timeout_secs),
                severity: WarningSeverity::Error,
                hint: Some("Set to e.g. 300.0 (five minutes)".into()),
            });
        } else if self.watchdog.timeout_secs > 3600.0 {
            warnings.push(ConfigWarning {
                field: "watchdog.timeout_secs".into(),
                message: format!(
                    "timeout is {:.0}s — an absent operator keeps the override for over an hour",
                    self.watchdog.timeout_secs
                ),
                severity: WarningSeverity::Warning,
                hint: Some("Presence lapses are normally caught within minutes".into()),
            });
        }

        // ── Registry ───
        if self.registry.is_empty() {
            warnings.push(ConfigWarning {
                field: "registry".into(),
                message: "clearance registry is empty — no operator can enter override".into(),
                severity: WarningSeverity::Warning,
                hint: Some("Add entries like \"ARCH-001\" = 3".into()),
            });
        }

        let mut seen: HashMap<String, (&str, u8)> = HashMap::new();
        for (id, tier) in &self.registry {
            if Tier::from_u8(*tier).is_none() {
                warnings.push(ConfigWarning {
                    field: format!("registry.{}", id),
                    message: format!("tier {} is invalid", tier),
                    severity: WarningSeverity::Error,
                    hint: Some("Valid tiers: 1 (standard), 2 (maintenance), 3 (admin)".into()),
                });
            }

            let Some(key) = normalize_identity(id) else {
                warnings.push(ConfigWarning {
                    field: "registry".into(),
                    message: "identity is empty".into(),
                    severity: WarningSeverity::Error,
                    hint: None,
                });
                continue;
            };

            match seen.get(&key) {
                Some((first, first_tier)) if *first_tier != *tier => {
                    warnings.push(ConfigWarning {
                        field: format!("registry.{}", id),
                        message: format!(
                            "'{}' and '{}' are the same identity with different tiers",
                            first, id
                        ),
                        severity: WarningSeverity::Error,
                        hint: Some("Identities are compared case-insensitively".into()),
                    });
                }
                Some((first, _)) => {
                    warnings.push(ConfigWarning {
                        field: format!("registry.{}", id),
                        message: format!("duplicate of '{}'", first),
                        severity: WarningSeverity::Info,
                        hint: None,
                    });
                }
                None => {
                    seen.insert(key, (id.as_str(), *tier));
                }
            }
        }

        // ── Handshake intents ───
        if self.handshake.intents.iter().all(|i| i.trim().is_empty()) {
            warnings.push(ConfigWarning {
                field: "handshake.intents".into(),
                message: "no voice intents configured — spoken confirmation can never succeed".into(),
                severity: WarningSeverity::Warning,
                hint: Some("Add e.g. \"admin override\"".into()),
            });
        }

        // ── Clock ───
        if self.clock.source.parse::<ClockSource>().is_err() {
            warnings.push(ConfigWarning {
                field: "clock.source".into(),
                message: format!("unknown clock source '{}'", self.clock.source),
                severity: WarningSeverity::Error,
                hint: Some(format!("Valid values: {}", ClockSource::VALID.join(", "))),
            });
        }

        // ── Logging format ───
        let valid_formats = ["pretty", "json", "compact"];
        if !valid_formats.contains(&self.logging.format.as_str()) {
            warnings.push(ConfigWarning {
                field: "logging.format".into(),
                message: format!("unknown log format '{}'", self.logging.format),
                severity: WarningSeverity::Warning,
                hint: Some(format!("Valid values: {}", valid_formats.join(", "))),
            });
        }

        // ── Logging level ───
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            warnings.push(ConfigWarning {
                field: "logging.level".into(),
                message: format!("unknown log level '{}'", self.logging.level),
                severity: WarningSeverity::Warning,
                hint: Some(format!("Valid values: {}", valid_levels.join(", "))),
            });
        }

        // Check for hard errors
        let errors: Vec<String> = warnings
            .iter()
            .filter(|w| w.severity == WarningSeverity::Error)
            .map(|w| format!("{}: {}", w.field, w.message))
            .collect();

        if !errors.is_empty() {
            return Err(format!("Configuration errors:\n  • {}", errors.join("\n  • ")));
        }

        Ok(warnings)
    }
}
