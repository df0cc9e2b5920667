//! Configuration loading from files (std only).

use std::fs;
use std::path::Path;

use crate::error::{ConfigError, Error, Result};

use super::SystemConfig;

/// Load configuration from a TOML file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
///
/// # Example
///
/// ```rust,ignore
/// use stepper_sync::load_config;
///
/// let config = load_config("machine.toml")?;
/// ```
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<SystemConfig> {
    let content = fs::read_to_string(path.as_ref()).map_err(|e| {
        Error::Config(ConfigError::IoError(truncated(&e.to_string())))
    })?;

    parse_config(&content)
}

/// Parse configuration from a TOML string.
///
/// Missing sections fall back to factory defaults.
///
/// # Errors
///
/// Returns an error if the TOML is invalid or fails validation.
pub fn parse_config(content: &str) -> Result<SystemConfig> {
    let config: SystemConfig = toml::from_str(content).map_err(|e| {
        let msg = truncated(e.message());
        Error::Config(ConfigError::ParseError(msg))
    })?;

    super::validation::validate_config(&config)?;

    Ok(config)
}

fn truncated(message: &str) -> heapless::String<128> {
    let mut out = heapless::String::new();
    for c in message.chars() {
        if out.push(c).is_err() {
            break;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MicrostepResolution;

    #[test]
    fn test_parse_empty_config_uses_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config, SystemConfig::default());
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[case]
speed_hz = 400.0
microsteps = 16
direction = true

[disc]
speed_hz = 100.0
microsteps = 2
autostart = false

[sync]
pause_ms = 1000
confirm_steps = 3
debounce_ms = 5
"#;

        let config = parse_config(toml).unwrap();
        assert_eq!(config.case.resolution, MicrostepResolution::Sixteenth);
        assert!(config.case.direction);
        assert!(!config.disc.autostart);
        assert_eq!(config.sync.confirm_step_count, 3);
        assert_eq!(config.sync.pause_duration_ms, 1000);
    }

    #[test]
    fn test_parse_rejects_unsupported_resolution() {
        let toml = r#"
[case]
speed_hz = 400.0
microsteps = 3
"#;

        assert!(matches!(
            parse_config(toml),
            Err(Error::Config(ConfigError::ParseError(_)))
        ));
    }

    #[test]
    fn test_load_missing_file() {
        assert!(matches!(
            load_config("/nonexistent/machine.toml"),
            Err(Error::Config(ConfigError::IoError(_)))
        ));
    }
}
