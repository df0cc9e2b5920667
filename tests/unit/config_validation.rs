//! Unit tests for configuration validation.

use stepper_sync::config::{parse_config, validate_config, SystemConfig};
use stepper_sync::error::{ConfigError, Error};

/// The factory defaults are valid.
#[test]
fn test_default_config_passes_validation() {
    assert!(validate_config(&SystemConfig::default()).is_ok());
}

/// Unsupported microstep values are rejected while parsing.
#[test]
fn test_unsupported_microsteps_rejected() {
    for value in [0, 3, 32] {
        let toml_str = format!("[disc]\nspeed_hz = 100.0\nmicrosteps = {value}\n");
        let result = parse_config(&toml_str);
        assert!(
            matches!(result, Err(Error::Config(ConfigError::ParseError(_)))),
            "microsteps = {value} should be rejected"
        );
    }
}

/// Negative speeds fail validation.
#[test]
fn test_negative_speed_rejected() {
    let result = parse_config("[case]\nspeed_hz = -10.0\nmicrosteps = 4\n");
    assert!(matches!(result, Err(Error::Config(ConfigError::InvalidSpeed(_)))));
}

/// A zero debounce window fails validation.
#[test]
fn test_zero_debounce_rejected() {
    let mut config = SystemConfig::default();
    config.sync.debounce_ms = 0;
    assert_eq!(
        validate_config(&config),
        Err(Error::Config(ConfigError::InvalidDebounce(0)))
    );
}

/// Zero speed is a valid "do not step" default.
#[test]
fn test_zero_speed_accepted() {
    let config = parse_config("[case]\nspeed_hz = 0.0\nmicrosteps = 1\n").expect("valid");
    assert_eq!(config.case.speed, 0.0);
}
