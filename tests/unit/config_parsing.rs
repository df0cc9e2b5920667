//! Unit tests for TOML configuration parsing.

use stepper_sync::config::{parse_config, MicrostepResolution, SystemConfig};

/// Test parsing a complete configuration.
#[test]
fn test_parse_full_config() {
    let toml_str = r#"
[case]
speed_hz = 300.0
microsteps = 16
direction = true
steps_per_revolution = 400

[disc]
speed_hz = 1200.0
microsteps = 2
autostart = false

[sync]
pause_ms = 1500
confirm_steps = 12
debounce_ms = 5
"#;

    let config = parse_config(toml_str).expect("Failed to parse TOML");

    assert_eq!(config.case.speed, 300.0);
    assert_eq!(config.case.resolution, MicrostepResolution::Sixteenth);
    assert!(config.case.direction);
    assert!(config.case.autostart);
    assert_eq!(config.case.steps_per_revolution, 400);

    assert_eq!(config.disc.speed, 1200.0);
    assert_eq!(config.disc.resolution, MicrostepResolution::Half);
    assert!(!config.disc.direction);
    assert!(!config.disc.autostart);

    assert_eq!(config.sync.pause_duration_ms, 1500);
    assert_eq!(config.sync.confirm_step_count, 12);
    assert_eq!(config.sync.debounce_ms, 5);
}

/// Missing sections take factory defaults.
#[test]
fn test_missing_sections_use_defaults() {
    let config = parse_config("[sync]\npause_ms = 500\n").expect("Failed to parse TOML");

    assert_eq!(config.case, SystemConfig::default().case);
    assert_eq!(config.disc, SystemConfig::default().disc);
    assert_eq!(config.sync.pause_duration_ms, 500);
    assert_eq!(config.sync.confirm_step_count, 100);
}

/// Each supported microstep value parses to its resolution.
#[test]
fn test_all_microstep_values() {
    for resolution in MicrostepResolution::ALL {
        let toml_str = format!("[case]\nspeed_hz = 100.0\nmicrosteps = {}\n", resolution.value());
        let config = parse_config(&toml_str).expect("Failed to parse TOML");
        assert_eq!(config.case.resolution, resolution);
    }
}

/// Serializing and parsing again keeps every field.
#[test]
fn test_serialized_config_parses_back() {
    let mut config = SystemConfig::default();
    config.disc.speed = 640.0;
    config.sync.confirm_step_count = 7;

    let text = toml::to_string(&config).expect("Failed to serialize");
    assert_eq!(parse_config(&text).expect("Failed to parse TOML"), config);
}
