//! Sensor synchronization for the disc motor.
//!
//! A debounced rising edge on the position sensor starts an episode: a fixed
//! number of confirmation steps at the normal cadence, then one pulse whose
//! following interval is stretched to the pause duration, then normal stepping
//! until the sensor reads LOW again.

mod controller;
mod edge;
mod settings;

pub use controller::{SyncController, SyncPhase, SyncStatus};
pub use edge::{EdgeDetector, EdgeEvent, EdgeLatch};
pub use settings::{SyncReport, SyncSettings};
