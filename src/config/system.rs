//! System configuration - root configuration structure.

use serde::{Deserialize, Serialize};

use super::channel::ChannelConfig;
use super::sync::SyncConfig;
use super::units::MotorId;

/// Root configuration structure from TOML.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct SystemConfig {
    /// Case motor defaults.
    #[serde(default = "ChannelConfig::case_default")]
    pub case: ChannelConfig,

    /// Disc motor defaults.
    #[serde(default = "ChannelConfig::disc_default")]
    pub disc: ChannelConfig,

    /// Sensor synchronization defaults.
    #[serde(default)]
    pub sync: SyncConfig,
}

impl SystemConfig {
    /// Get a channel configuration by motor id.
    pub fn channel(&self, id: MotorId) -> &ChannelConfig {
        match id {
            MotorId::Case => &self.case,
            MotorId::Disc => &self.disc,
        }
    }

    /// Get a mutable channel configuration by motor id.
    pub fn channel_mut(&mut self, id: MotorId) -> &mut ChannelConfig {
        match id {
            MotorId::Case => &mut self.case,
            MotorId::Disc => &mut self.disc,
        }
    }
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            case: ChannelConfig::case_default(),
            disc: ChannelConfig::disc_default(),
            sync: SyncConfig::DEFAULT,
        }
    }
}
