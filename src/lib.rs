//! # stepper-sync
//!
//! Two-motor A4988 step pulse engine with a sensor-synchronized state machine,
//! built on embedded-hal 1.0.
//!
//! ## Features
//!
//! - **Constant-cadence pulse trains**: frequency in Hz, no ramping
//! - **embedded-hal 1.0**: `OutputPin` for STEP/DIR/EN/SLP/RST/MS1-3,
//!   `InputPin` for the position sensor, `DelayNs` for all timing
//! - **Sensor sync**: confirm, pause and re-arm on a debounced rising edge
//! - **Lock-free command side**: settings are atomics, applied by the stepping
//!   activity within one cycle
//! - **no_std compatible**: core library works without standard library
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use stepper_sync::{
//!     CommandPort, MotionSupervisor, MotorChannelBuilder, MotorId, PlainActivity,
//!     SyncController, SyncSettings, SyncedActivity, ChannelState, SystemConfig,
//! };
//!
//! static CASE: ChannelState = ChannelState::new();
//! static DISC: ChannelState = ChannelState::new();
//! static SYNC: SyncSettings = SyncSettings::new();
//!
//! let config: SystemConfig = stepper_sync::load_config("stepper.toml")?;
//! SYNC.apply(&config.sync);
//!
//! let case = MotorChannelBuilder::new(MotorId::Case)
//!     .state(&CASE)
//!     .step_pin(case_step)
//!     .driver_pins(case_pins)
//!     .delay(case_delay)
//!     .from_config(&config)
//!     .build()?;
//! let disc = MotorChannelBuilder::new(MotorId::Disc)
//!     .state(&DISC)
//!     .step_pin(disc_step)
//!     .driver_pins(disc_pins)
//!     .delay(disc_delay)
//!     .from_config(&config)
//!     .build()?;
//!
//! let mut supervisor = MotionSupervisor::new(
//!     PlainActivity::new(case),
//!     SyncedActivity::new(disc, SyncController::new(sensor, &SYNC)),
//! );
//! supervisor.begin()?;
//!
//! // Hand this to the serial / HMI handlers.
//! let port = CommandPort::new(&CASE, &DISC, &SYNC);
//! port.set_sync_parameters(1000, 3);
//! ```
//!
//! ## Feature Flags
//!
//! - `std` (default): TOML file loading and the threaded supervisor runner
//! - `alloc`: Enables heap allocation for no_std with allocator
//! - `defmt`: Enables defmt logging for embedded targets

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]
// Allow large error types - necessary for no_std with heapless strings
#![allow(clippy::result_large_err)]

#[cfg(feature = "alloc")]
extern crate alloc;

// Must come first so the logging macros are visible to every module.
#[macro_use]
mod fmt;

// Core modules
pub mod config;
pub mod error;
pub mod motion;
pub mod motor;
pub mod sync;

// Re-exports for ergonomic API
pub use config::{validate_config, ChannelConfig, SyncConfig, SystemConfig};
pub use error::{Error, Result};
pub use motion::{Activity, CommandPort, MotionSupervisor, PlainActivity, SyncedActivity};
pub use motor::{
    ChannelHandle, ChannelState, DriverControl, DriverPins, MotorChannel, MotorChannelBuilder,
    MotorStatus, PulseClock, Tick,
};
pub use sync::{
    EdgeDetector, EdgeEvent, EdgeLatch, SyncController, SyncPhase, SyncReport, SyncSettings,
    SyncStatus,
};

// Configuration loading (std only)
#[cfg(feature = "std")]
pub use config::{load_config, parse_config};

// Unit types
pub use config::units::{MicrostepResolution, MotorId};
