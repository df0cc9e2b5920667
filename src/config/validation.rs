//! Configuration validation.

use crate::error::{ConfigError, Error, Result};

use super::{ChannelConfig, SyncConfig, SystemConfig};

/// Validate a system configuration.
///
/// Checks:
/// - Default speeds are finite and non-negative
/// - The debounce window is non-zero
///
/// Microstep resolutions are already checked during deserialization.
pub fn validate_config(config: &SystemConfig) -> Result<()> {
    validate_channel(&config.case)?;
    validate_channel(&config.disc)?;
    validate_sync(&config.sync)?;
    Ok(())
}

fn validate_channel(config: &ChannelConfig) -> Result<()> {
    if !config.speed.is_finite() || config.speed < 0.0 {
        return Err(Error::Config(ConfigError::InvalidSpeed(config.speed)));
    }
    Ok(())
}

fn validate_sync(config: &SyncConfig) -> Result<()> {
    if config.debounce_ms == 0 {
        return Err(Error::Config(ConfigError::InvalidDebounce(config.debounce_ms)));
    }
    Ok(())
}
