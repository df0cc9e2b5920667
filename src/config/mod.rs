//! Configuration module for stepper-sync.
//!
//! Provides startup defaults for both motor channels and the sensor
//! synchronization, loaded from TOML files (with `std` feature), from a
//! key-value store, or built in code.

mod channel;
#[cfg(feature = "std")]
mod loader;
pub mod store;
mod sync;
mod system;
pub mod units;
mod validation;

pub use channel::ChannelConfig;
pub use store::{load_from_store, persist_to_store, ConfigStore, MemoryStore};
pub use sync::SyncConfig;
pub use system::SystemConfig;
pub use validation::validate_config;

#[cfg(feature = "std")]
pub use loader::{load_config, parse_config};

// Re-export unit types at config level
pub use units::{MicrostepResolution, MotorId};
