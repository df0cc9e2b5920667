//! Per-motor default configuration from TOML.

use serde::{Deserialize, Serialize};

use super::units::MicrostepResolution;

/// Startup defaults for one motor channel.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct ChannelConfig {
    /// Step frequency in Hz (0 = no stepping).
    #[serde(rename = "speed_hz")]
    pub speed: f32,

    /// Microstep resolution (1, 2, 4, 8, 16).
    #[serde(rename = "microsteps")]
    pub resolution: MicrostepResolution,

    /// Level driven on the DIR line.
    #[serde(default)]
    pub direction: bool,

    /// Start stepping immediately after power-on.
    #[serde(default = "default_autostart")]
    pub autostart: bool,

    /// Full steps per motor revolution, used for RPM reporting.
    #[serde(default = "default_steps_per_revolution")]
    pub steps_per_revolution: u16,
}

fn default_autostart() -> bool {
    true
}

fn default_steps_per_revolution() -> u16 {
    200
}

impl ChannelConfig {
    /// Factory defaults for the case motor.
    pub const fn case_default() -> Self {
        Self {
            speed: 250.0,
            resolution: MicrostepResolution::Quarter,
            direction: false,
            autostart: true,
            steps_per_revolution: 200,
        }
    }

    /// Factory defaults for the disc motor.
    pub const fn disc_default() -> Self {
        Self {
            speed: 750.0,
            resolution: MicrostepResolution::Eighth,
            direction: false,
            autostart: true,
            steps_per_revolution: 200,
        }
    }
}
