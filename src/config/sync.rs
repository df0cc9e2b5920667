//! Sensor synchronization defaults from TOML.

use serde::{Deserialize, Serialize};

/// Pause-at-marker parameters for the sensor-linked channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct SyncConfig {
    /// Length of the held step interval after confirmation, in milliseconds.
    #[serde(rename = "pause_ms", default = "default_pause_ms")]
    pub pause_duration_ms: u32,

    /// Steps issued after a rising edge before pausing.
    #[serde(rename = "confirm_steps", default = "default_confirm_steps")]
    pub confirm_step_count: u32,

    /// Minimum time between two accepted rising edges, in milliseconds.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u32,
}

fn default_pause_ms() -> u32 {
    SyncConfig::DEFAULT.pause_duration_ms
}

fn default_confirm_steps() -> u32 {
    SyncConfig::DEFAULT.confirm_step_count
}

fn default_debounce_ms() -> u32 {
    SyncConfig::DEFAULT.debounce_ms
}

impl SyncConfig {
    /// Factory defaults.
    pub const DEFAULT: Self = Self {
        pause_duration_ms: 3000,
        confirm_step_count: 100,
        debounce_ms: 10,
    };

    /// Pause duration in microseconds, saturating.
    pub fn pause_duration_us(&self) -> u32 {
        self.pause_duration_ms.saturating_mul(1000)
    }

    /// Debounce window in microseconds, saturating.
    pub fn debounce_us(&self) -> u32 {
        self.debounce_ms.saturating_mul(1000)
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}
