//! Key-value persistence adapter.
//!
//! The core never owns a storage format. It reads and writes its defaults
//! through [`ConfigStore`], which a board crate implements on top of flash,
//! EEPROM or NVS. [`MemoryStore`] is a heapless implementation for hosts and
//! tests.

use heapless::{FnvIndexMap, String};

use crate::error::{ConfigError, Error, Result};

use super::units::{MicrostepResolution, MotorId};
use super::{ChannelConfig, SystemConfig};

/// Keys used by [`load_from_store`] and [`persist_to_store`].
pub mod keys {
    /// Set until defaults have been written once.
    pub const RESET_FLAG: &str = "reset";
    /// Pause duration in milliseconds.
    pub const PAUSE_MS: &str = "pause_ms";
    /// Confirmation step count.
    pub const CONFIRM_STEPS: &str = "confirm_steps";
    /// Debounce window in milliseconds.
    pub const DEBOUNCE_MS: &str = "debounce_ms";
    /// Case motor speed (f32 bits).
    pub const CASE_SPEED: &str = "case_hz";
    /// Case motor direction.
    pub const CASE_DIR: &str = "case_dir";
    /// Case motor microstep resolution.
    pub const CASE_RES: &str = "case_res";
    /// Disc motor speed (f32 bits).
    pub const DISC_SPEED: &str = "disc_hz";
    /// Disc motor direction.
    pub const DISC_DIR: &str = "disc_dir";
    /// Disc motor microstep resolution.
    pub const DISC_RES: &str = "disc_res";
}

/// Simple typed key-value accessors.
pub trait ConfigStore {
    /// Read an unsigned value, or `default` if the key is absent.
    fn get_u32(&self, key: &str, default: u32) -> u32;

    /// Write an unsigned value.
    fn put_u32(&mut self, key: &str, value: u32) -> Result<()>;

    /// Read a boolean, or `default` if the key is absent.
    fn get_bool(&self, key: &str, default: bool) -> bool;

    /// Write a boolean.
    fn put_bool(&mut self, key: &str, value: bool) -> Result<()>;

    /// Whether the key exists.
    fn contains(&self, key: &str) -> bool;

    /// Read a float stored as its bit pattern.
    fn get_f32(&self, key: &str, default: f32) -> f32 {
        f32::from_bits(self.get_u32(key, default.to_bits()))
    }

    /// Write a float as its bit pattern.
    fn put_f32(&mut self, key: &str, value: f32) -> Result<()> {
        self.put_u32(key, value.to_bits())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stored {
    U32(u32),
    Bool(bool),
}

/// In-memory store with a fixed key capacity.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: FnvIndexMap<String<16>, Stored, 16>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store holds no keys.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Remove every key.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    fn get(&self, key: &str) -> Option<Stored> {
        self.entries
            .iter()
            .find(|(k, _)| k.as_str() == key)
            .map(|(_, v)| *v)
    }

    fn put(&mut self, key: &str, value: Stored) -> Result<()> {
        let key = String::try_from(key).map_err(|_| Error::Config(ConfigError::StoreFull))?;
        self.entries
            .insert(key, value)
            .map(|_| ())
            .map_err(|_| Error::Config(ConfigError::StoreFull))
    }
}

impl ConfigStore for MemoryStore {
    fn get_u32(&self, key: &str, default: u32) -> u32 {
        match self.get(key) {
            Some(Stored::U32(v)) => v,
            _ => default,
        }
    }

    fn put_u32(&mut self, key: &str, value: u32) -> Result<()> {
        self.put(key, Stored::U32(value))
    }

    fn get_bool(&self, key: &str, default: bool) -> bool {
        match self.get(key) {
            Some(Stored::Bool(v)) => v,
            _ => default,
        }
    }

    fn put_bool(&mut self, key: &str, value: bool) -> Result<()> {
        self.put(key, Stored::Bool(value))
    }

    fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }
}

const fn channel_keys(id: MotorId) -> (&'static str, &'static str, &'static str) {
    match id {
        MotorId::Case => (keys::CASE_SPEED, keys::CASE_DIR, keys::CASE_RES),
        MotorId::Disc => (keys::DISC_SPEED, keys::DISC_DIR, keys::DISC_RES),
    }
}

/// Write every persisted value of `config` to the store.
pub fn persist_to_store<S: ConfigStore>(store: &mut S, config: &SystemConfig) -> Result<()> {
    for id in [MotorId::Case, MotorId::Disc] {
        let channel = config.channel(id);
        let (speed, dir, res) = channel_keys(id);
        store.put_f32(speed, channel.speed)?;
        store.put_bool(dir, channel.direction)?;
        store.put_u32(res, channel.resolution.value() as u32)?;
    }
    store.put_u32(keys::PAUSE_MS, config.sync.pause_duration_ms)?;
    store.put_u32(keys::CONFIRM_STEPS, config.sync.confirm_step_count)?;
    store.put_u32(keys::DEBOUNCE_MS, config.sync.debounce_ms)?;
    Ok(())
}

/// Read the persisted configuration, seeding the store on first boot.
///
/// When the reset flag is absent or set, `defaults` are written and the flag
/// is cleared. Values that fail validation fall back to `defaults` field by
/// field.
pub fn load_from_store<S: ConfigStore>(
    store: &mut S,
    defaults: &SystemConfig,
) -> Result<SystemConfig> {
    if store.get_bool(keys::RESET_FLAG, true) {
        info!("config store: writing defaults");
        persist_to_store(store, defaults)?;
        store.put_bool(keys::RESET_FLAG, false)?;
        return Ok(*defaults);
    }

    let mut config = *defaults;
    for id in [MotorId::Case, MotorId::Disc] {
        let fallback = defaults.channel(id);
        let (speed, dir, res) = channel_keys(id);
        let stored_speed = store.get_f32(speed, fallback.speed);
        let stored_res = store.get_u32(res, fallback.resolution.value() as u32);

        let channel: &mut ChannelConfig = config.channel_mut(id);
        channel.speed = if stored_speed.is_finite() && stored_speed >= 0.0 {
            stored_speed
        } else {
            warn!("config store: bad speed for {}, using default", id.as_str());
            fallback.speed
        };
        channel.direction = store.get_bool(dir, fallback.direction);
        channel.resolution = u8::try_from(stored_res)
            .ok()
            .and_then(MicrostepResolution::new)
            .unwrap_or(fallback.resolution);
    }

    config.sync.pause_duration_ms = store.get_u32(keys::PAUSE_MS, defaults.sync.pause_duration_ms);
    config.sync.confirm_step_count =
        store.get_u32(keys::CONFIRM_STEPS, defaults.sync.confirm_step_count);
    let debounce = store.get_u32(keys::DEBOUNCE_MS, defaults.sync.debounce_ms);
    config.sync.debounce_ms = if debounce == 0 {
        defaults.sync.debounce_ms
    } else {
        debounce
    };

    Ok(config)
}
