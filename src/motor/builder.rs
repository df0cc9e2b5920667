//! Builder pattern for MotorChannel.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use crate::config::units::MotorId;
use crate::config::{ChannelConfig, SystemConfig};
use crate::error::{ConfigError, Error, Result};

use super::channel::MotorChannel;
use super::driver::{DriverControl, DriverPins};
use super::pulse::PulseClock;
use super::shared::ChannelState;

fn missing(what: &str) -> Error {
    Error::Config(ConfigError::ParseError(
        heapless::String::try_from(what).unwrap_or_default(),
    ))
}

/// Builder for creating MotorChannel instances.
pub struct MotorChannelBuilder<'a, STEP, PIN, DELAY>
where
    STEP: OutputPin,
    PIN: OutputPin,
    DELAY: DelayNs,
{
    id: MotorId,
    state: Option<&'a ChannelState>,
    step_pin: Option<STEP>,
    driver_pins: Option<DriverPins<PIN>>,
    delay: Option<DELAY>,
    config: Option<ChannelConfig>,
    linked_to_sensor: bool,
}

impl<'a, STEP, PIN, DELAY> MotorChannelBuilder<'a, STEP, PIN, DELAY>
where
    STEP: OutputPin,
    PIN: OutputPin,
    DELAY: DelayNs,
{
    /// Create a new builder for motor `id`.
    pub fn new(id: MotorId) -> Self {
        Self {
            id,
            state: None,
            step_pin: None,
            driver_pins: None,
            delay: None,
            config: None,
            linked_to_sensor: false,
        }
    }

    /// Set the shared state the channel and its handles use.
    pub fn state(mut self, state: &'a ChannelState) -> Self {
        self.state = Some(state);
        self
    }

    /// Set the STEP pin.
    pub fn step_pin(mut self, pin: STEP) -> Self {
        self.step_pin = Some(pin);
        self
    }

    /// Set the driver control lines.
    pub fn driver_pins(mut self, pins: DriverPins<PIN>) -> Self {
        self.driver_pins = Some(pins);
        self
    }

    /// Set the delay provider.
    pub fn delay(mut self, delay: DELAY) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Mark the channel as driven by a sync controller.
    pub fn linked_to_sensor(mut self, linked: bool) -> Self {
        self.linked_to_sensor = linked;
        self
    }

    /// Seed the shared state from a ChannelConfig on build.
    pub fn from_channel_config(mut self, config: &ChannelConfig) -> Self {
        self.config = Some(*config);
        self
    }

    /// Seed from the system configuration section matching this motor.
    ///
    /// The disc motor is linked to the sensor, the case motor is not.
    pub fn from_config(self, config: &SystemConfig) -> Self {
        let id = self.id;
        self.from_channel_config(config.channel(id))
            .linked_to_sensor(id == MotorId::Disc)
    }

    /// Build the MotorChannel.
    ///
    /// # Errors
    ///
    /// Returns an error if required fields are missing or the seeded
    /// configuration is out of range.
    pub fn build(self) -> Result<MotorChannel<'a, STEP, PIN, DELAY>> {
        let state = self.state.ok_or_else(|| missing("state is required"))?;
        let step_pin = self.step_pin.ok_or_else(|| missing("step_pin is required"))?;
        let pins = self.driver_pins.ok_or_else(|| missing("driver_pins is required"))?;
        let delay = self.delay.ok_or_else(|| missing("delay is required"))?;

        if let Some(config) = self.config {
            let handle = super::ChannelHandle::new(self.id, state);
            handle.set_frequency(config.speed)?;
            handle.set_resolution(config.resolution.value())?;
            handle.set_direction(config.direction);
            if config.autostart {
                handle.start();
            }
        }

        Ok(MotorChannel::new(
            self.id,
            state,
            DriverControl::new(pins),
            PulseClock::new(step_pin, delay),
            self.linked_to_sensor,
        ))
    }
}
