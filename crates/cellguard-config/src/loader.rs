use cellguard_core::{CellGuardError, ClockSource, Result};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::schema::CellGuardConfig;

/// Loads the cellguard configuration once at startup.
pub struct ConfigLoader {
    config: CellGuardConfig,
    config_path: PathBuf,
}

impl ConfigLoader {
    /// Resolve the config path: explicit path > CELLGUARD_CONFIG env > ~/.cellguard/cellguard.toml
    pub fn resolve_path(explicit: Option<&Path>) -> PathBuf {
        if let Some(p) = explicit {
            return p.to_path_buf();
        }
        if let Ok(p) = std::env::var("CELLGUARD_CONFIG") {
            return PathBuf::from(p);
        }
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".cellguard")
            .join("cellguard.toml")
    }

    /// Load the config from disk, falling back to defaults when the file is absent.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = Self::resolve_path(path);
        let config = if config_path.exists() {
            info!(?config_path, "loading configuration");
            let raw = std::fs::read_to_string(&config_path)?;
            Self::parse(&raw, &config_path)?
        } else {
            warn!(?config_path, "config file not found, using defaults");
            CellGuardConfig::default()
        };

        let config = Self::apply_overrides(config, |key| std::env::var(key).ok());
        Self::check(&config)?;

        Ok(Self {
            config,
            config_path,
        })
    }

    /// Build a loader from an in-memory TOML document (no env overrides).
    pub fn from_toml(raw: &str) -> Result<Self> {
        let config_path = PathBuf::from("<inline>");
        let config = Self::parse(raw, &config_path)?;
        Self::check(&config)?;
        Ok(Self {
            config,
            config_path,
        })
    }

    /// Get a snapshot of the loaded config.
    pub fn get(&self) -> CellGuardConfig {
        self.config.clone()
    }

    /// Path the config was (or would have been) read from.
    pub fn path(&self) -> &Path {
        &self.config_path
    }

    fn parse(raw: &str, origin: &Path) -> Result<CellGuardConfig> {
        toml::from_str::<CellGuardConfig>(raw).map_err(|e| {
            CellGuardError::Config(format!("failed to parse {}: {}", origin.display(), e))
        })
    }

    /// Validate config: log warnings, fail on errors. An unknown clock source
    /// fails first, as `ClockUnavailable`.
    fn check(config: &CellGuardConfig) -> Result<()> {
        config.clock.source.parse::<ClockSource>()?;
        match config.validate() {
            Ok(warnings) => {
                for w in &warnings {
                    warn!("{}", w);
                }
                Ok(())
            }
            Err(e) => Err(CellGuardError::Config(e)),
        }
    }

    /// Apply overrides (CELLGUARD_WATCHDOG_TIMEOUT, CELLGUARD_LOG_LEVEL, CELLGUARD_CLOCK)
    /// read through `lookup`. Unparseable numeric values are ignored with a warning.
    pub fn apply_overrides<F>(mut config: CellGuardConfig, lookup: F) -> CellGuardConfig
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("CELLGUARD_WATCHDOG_TIMEOUT") {
            match v.trim().parse::<f64>() {
                Ok(secs) => config.watchdog.timeout_secs = secs,
                Err(_) => warn!(value = %v, "ignoring non-numeric CELLGUARD_WATCHDOG_TIMEOUT"),
            }
        }
        if let Some(v) = lookup("CELLGUARD_LOG_LEVEL") {
            config.logging.level = v;
        }
        if let Some(v) = lookup("CELLGUARD_CLOCK") {
            config.clock.source = v;
        }
        config
    }
}
