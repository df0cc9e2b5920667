//! Motor module for stepper-sync.
//!
//! Provides the A4988 driver sequencing, the step pulse clock, and the motor
//! channel that combines them around a shared, atomically updated state.

mod builder;
mod channel;
mod driver;
mod pulse;
mod shared;
#[cfg(test)]
pub(crate) mod testing;

pub use builder::MotorChannelBuilder;
pub use channel::MotorChannel;
pub use driver::{DriverControl, DriverPins, RESET_HOLD_US};
pub use pulse::{PulseClock, Tick, IDLE_SLICE_US, MIN_INTERVAL_US, PULSE_WIDTH_US};
pub use shared::{ChannelHandle, ChannelState, MotorStatus};
