#[cfg(test)]
mod tests {
    use cellguard_config::ConfigLoader;
    use cellguard_config::schema::*;
    use cellguard_core::{CellGuardError, DEFAULT_CLEARANCES, Tier};
    use std::collections::HashMap;
    use std::io::Write;
    use std::time::Duration;

    // ── Default tests ──────────────────────────────────────────

    #[test]
    fn test_cellguard_config_defaults() {
        let config = CellGuardConfig::default();
        assert_eq!(config.watchdog.timeout_secs, 300.0);
        assert_eq!(config.watchdog.timeout(), Some(Duration::from_secs(300)));
        assert_eq!(config.clock.source, "monotonic");
        assert_eq!(config.handshake.intents.len(), 3);
        assert!(config.handshake.intents.contains(&"admin override".to_string()));
    }

    #[test]
    fn test_default_registry() {
        let config = CellGuardConfig::default();
        let table = config.tier_table();
        assert_eq!(table.len(), 3);
        assert!(table.contains(&("ARCH-001".to_string(), Tier::Tier3)));
        assert!(table.contains(&("MAINT-900".to_string(), Tier::Tier2)));
        assert!(table.contains(&("OP-7721".to_string(), Tier::Tier1)));
    }

    #[test]
    fn test_logging_config_defaults() {
        let config = LoggingConfig::default();
        assert_eq!(config.level, "info");
        assert_eq!(config.format, "pretty");
    }

    #[test]
    fn test_defaults_validate_cleanly() {
        let warnings = CellGuardConfig::default().validate().unwrap();
        assert!(warnings.is_empty(), "unexpected warnings: {warnings:?}");
    }

    // ── TOML tests ─────────────────────────────────────────────

    #[test]
    fn test_config_toml_roundtrip() {
        let config = CellGuardConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let restored: CellGuardConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(restored.watchdog.timeout_secs, config.watchdog.timeout_secs);
        assert_eq!(restored.registry, config.registry);
    }

    #[test]
    fn test_partial_toml_applies_defaults() {
        let toml_str = r#"
[watchdog]
timeout_secs = 10.0
"#;
        let config: CellGuardConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.watchdog.timeout_secs, 10.0);
        // Defaults should fill in
        assert_eq!(config.registry.len(), 3);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_registry_section_replaces_defaults() {
        let toml_str = r#"
[registry]
"CELL-42" = 2
"#;
        let config: CellGuardConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.tier_table(), vec![("CELL-42".to_string(), Tier::Tier2)]);
    }

    // ── Validation tests ───────────────────────────────────────

    #[test]
    fn test_validate_rejects_nonpositive_timeout() {
        let mut config = CellGuardConfig::default();
        config.watchdog.timeout_secs = 0.0;
        let err = config.validate().unwrap_err();
        assert!(err.contains("watchdog.timeout_secs"));

        config.watchdog.timeout_secs = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_warns_on_long_timeout() {
        let mut config = CellGuardConfig::default();
        config.watchdog.timeout_secs = 7200.0;
        let warnings = config.validate().unwrap();
        assert!(warnings.iter().any(|w| w.field == "watchdog.timeout_secs"
            && w.severity == WarningSeverity::Warning));
    }

    #[test]
    fn test_validate_rejects_invalid_tier() {
        let mut config = CellGuardConfig::default();
        config.registry.insert("BAD-1".into(), 7);
        let err = config.validate().unwrap_err();
        assert!(err.contains("registry.BAD-1"));
        // Invalid tiers never reach the tier table
        assert!(config.tier_table().iter().all(|(id, _)| id != "BAD-1"));
    }

    #[test]
    fn test_validate_rejects_case_collision_with_different_tiers() {
        let mut config = CellGuardConfig::default();
        config.registry.insert("arch-001".into(), 1);
        let err = config.validate().unwrap_err();
        assert!(err.contains("same identity"));
    }

    #[test]
    fn test_validate_tolerates_case_duplicate_with_same_tier() {
        let mut config = CellGuardConfig::default();
        config.registry.insert("arch-001".into(), 3);
        let warnings = config.validate().unwrap();
        assert!(warnings.iter().any(|w| w.severity == WarningSeverity::Info));
    }

    #[test]
    fn test_validate_rejects_blank_identity() {
        let mut config = CellGuardConfig::default();
        config.registry.insert("   ".into(), 1);
        let err = config.validate().unwrap_err();
        assert!(err.contains("identity is empty"));
    }

    #[test]
    fn test_validate_rejects_unknown_clock() {
        let mut config = CellGuardConfig::default();
        config.clock.source = "sundial".into();
        let err = config.validate().unwrap_err();
        assert!(err.contains("clock.source"));
    }

    #[test]
    fn test_validate_warns_on_empty_registry_and_intents() {
        let mut config = CellGuardConfig::default();
        config.registry.clear();
        config.handshake.intents.clear();
        let warnings = config.validate().unwrap();
        assert!(warnings.iter().any(|w| w.field == "registry"));
        assert!(warnings.iter().any(|w| w.field == "handshake.intents"));
    }

    #[test]
    fn test_warning_display_includes_hint() {
        let w = ConfigWarning {
            field: "logging.format".into(),
            message: "unknown log format 'xml'".into(),
            severity: WarningSeverity::Warning,
            hint: Some("Valid values: pretty, json, compact".into()),
        };
        let s = w.to_string();
        assert!(s.contains("logging.format"));
        assert!(s.contains("↳ Valid values"));
    }

    // ── Overrides ──────────────────────────────────────────────

    #[test]
    fn test_apply_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("CELLGUARD_WATCHDOG_TIMEOUT", "12.5"),
            ("CELLGUARD_LOG_LEVEL", "debug"),
            ("CELLGUARD_CLOCK", "manual"),
        ]);
        let config = ConfigLoader::apply_overrides(CellGuardConfig::default(), |k| {
            env.get(k).map(|v| v.to_string())
        });
        assert_eq!(config.watchdog.timeout_secs, 12.5);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.clock.source, "manual");
    }

    #[test]
    fn test_apply_overrides_ignores_bad_number() {
        let config = ConfigLoader::apply_overrides(CellGuardConfig::default(), |k| {
            (k == "CELLGUARD_WATCHDOG_TIMEOUT").then(|| "five minutes".to_string())
        });
        assert_eq!(config.watchdog.timeout_secs, 300.0);
    }

    // ── ConfigLoader tests ─────────────────────────────────────

    #[test]
    fn test_config_loader_with_file() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("cellguard.toml");
        let mut f = std::fs::File::create(&config_path).unwrap();
        writeln!(
            f,
            r#"
[watchdog]
timeout_secs = 10.0

[handshake]
intents = ["resume cell"]

[registry]
"TECH-1" = 2
"#
        )
        .unwrap();

        let loader = ConfigLoader::load(Some(config_path.as_path())).unwrap();
        let config = loader.get();
        assert_eq!(loader.path(), config_path.as_path());
        assert_eq!(config.handshake.intents, vec!["resume cell".to_string()]);
        assert_eq!(config.tier_table(), vec![("TECH-1".to_string(), Tier::Tier2)]);
    }

    #[test]
    fn test_config_loader_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("absent.toml");
        let loader = ConfigLoader::load(Some(config_path.as_path())).unwrap();
        assert_eq!(loader.get().registry.len(), 3);
    }

    #[test]
    fn test_config_loader_rejects_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("cellguard.toml");
        std::fs::write(&config_path, "[watchdog\ntimeout_secs = ").unwrap();
        let err = match ConfigLoader::load(Some(config_path.as_path())) {
            Ok(_) => panic!("expected parse failure"),
            Err(e) => e,
        };
        assert!(err.to_string().contains("failed to parse"));
        assert!(err.is_fatal());
    }

    #[test]
    fn test_from_toml_rejects_invalid() {
        let result = ConfigLoader::from_toml(
            r#"
[registry]
"ARCH-001" = 3
"arch-001" = 2
"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_from_toml_unknown_clock_is_clock_unavailable() {
        let err = match ConfigLoader::from_toml("[clock]\nsource = \"sundial\"\n") {
            Ok(_) => panic!("expected clock failure"),
            Err(e) => e,
        };
        assert!(matches!(err, CellGuardError::ClockUnavailable(_)));
        assert!(err.is_fatal());
        assert!(err.to_string().contains("sundial"));
    }

    #[test]
    fn test_config_loader_unknown_clock_in_file() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("cellguard.toml");
        std::fs::write(&config_path, "[clock]\nsource = \"wall\"\n").unwrap();
        let err = match ConfigLoader::load(Some(config_path.as_path())) {
            Ok(_) => panic!("expected clock failure"),
            Err(e) => e,
        };
        assert!(matches!(err, CellGuardError::ClockUnavailable(_)));
    }

    #[test]
    fn test_from_toml_accepts_manual_clock() {
        let loader = ConfigLoader::from_toml("[clock]\nsource = \"Manual\"\n").unwrap();
        assert_eq!(loader.get().clock.source, "Manual");
    }

    #[test]
    fn test_default_registry_matches_contingency_table() {
        let config = CellGuardConfig::default();
        assert_eq!(config.registry.len(), DEFAULT_CLEARANCES.len());
        for (id, tier) in DEFAULT_CLEARANCES {
            assert_eq!(config.registry.get(id), Some(&tier.as_u8()));
        }
    }

    // ── JSON roundtrip ─────────────────────────────────────────

    #[test]
    fn test_config_json_roundtrip() {
        let config = CellGuardConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let restored: CellGuardConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.handshake.intents, config.handshake.intents);
    }
}
