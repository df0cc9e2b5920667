//! One motor channel: pulse clock plus driver control.
//!
//! The channel is owned by the activity that steps it. Settings live in a
//! shared [`ChannelState`]; the channel's own setters write that state and
//! apply it to the pins immediately, while changes made through a
//! [`ChannelHandle`](super::ChannelHandle) are applied by [`refresh`]
//! at the start of the next cycle.
//!
//! [`refresh`]: MotorChannel::refresh

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use crate::config::units::{MicrostepResolution, MotorId};
use crate::error::Result;

use super::driver::DriverControl;
use super::pulse::{PulseClock, Tick};
use super::shared::{ChannelHandle, ChannelState, MotorStatus};

/// What the pins currently reflect.
#[derive(Debug, Clone, Copy, Default)]
struct Applied {
    enabled: Option<bool>,
    resolution: Option<MicrostepResolution>,
    direction: Option<bool>,
    starts: u32,
    resets: u32,
}

/// A stepper motor channel.
///
/// Generic over:
/// - `STEP`: STEP pin type (must implement `OutputPin`)
/// - `PIN`: control line type for DIR/ENABLE/SLEEP/RESET/MS1-3
/// - `DELAY`: Delay provider (must implement `DelayNs`)
pub struct MotorChannel<'a, STEP, PIN, DELAY>
where
    STEP: OutputPin,
    PIN: OutputPin,
    DELAY: DelayNs,
{
    id: MotorId,
    state: &'a ChannelState,
    driver: DriverControl<PIN>,
    clock: PulseClock<STEP, DELAY>,
    applied: Applied,
    /// A restart seen by one of the channel's own setters, not yet reported.
    pending_restart: bool,
    linked_to_sensor: bool,
}

impl<'a, STEP, PIN, DELAY> MotorChannel<'a, STEP, PIN, DELAY>
where
    STEP: OutputPin,
    PIN: OutputPin,
    DELAY: DelayNs,
{
    /// Assemble a channel. Call [`begin`](Self::begin) before stepping.
    pub fn new(
        id: MotorId,
        state: &'a ChannelState,
        driver: DriverControl<PIN>,
        clock: PulseClock<STEP, DELAY>,
        linked_to_sensor: bool,
    ) -> Self {
        Self {
            id,
            state,
            driver,
            clock,
            applied: Applied::default(),
            pending_restart: false,
            linked_to_sensor,
        }
    }

    /// Run the driver's power-on sequence and write every setting.
    pub fn begin(&mut self) -> Result<()> {
        self.driver.begin(self.clock.delay_mut())?;
        self.applied = Applied {
            enabled: Some(false),
            resets: self.state.resets(),
            starts: self.state.starts(),
            ..Applied::default()
        };
        self.refresh()?;
        info!("{}: driver ready", self.id.as_str());
        Ok(())
    }

    /// Bring the pins in line with the shared state.
    ///
    /// Returns `true` when the channel was started again since the previous
    /// call (a stop/start cycle happened in between), including restarts
    /// applied by the channel's own setters.
    ///
    /// A restart of a running driver disables it before the select, DIR and
    /// RESET lines change, then enables it again.
    pub fn refresh(&mut self) -> Result<bool> {
        let enabled = self.state.is_enabled();
        let resolution = self.state.resolution();
        let direction = self.state.direction();
        let starts = self.state.starts();
        let resets = self.state.resets();
        let restarted = self.applied.starts != starts;

        let running = self.applied.enabled == Some(true);
        if (!enabled && self.applied.enabled != Some(false)) || (restarted && running) {
            self.driver.stop()?;
            info!("{}: stopped", self.id.as_str());
        }
        if self.applied.resolution != Some(resolution) {
            self.driver.apply_resolution(resolution)?;
        }
        if self.applied.direction != Some(direction) {
            self.driver.set_direction(direction)?;
        }
        if self.applied.resets != resets {
            self.driver.reset_pulse(self.clock.delay_mut())?;
        }

        if enabled && (self.applied.enabled != Some(true) || restarted) {
            self.driver.start()?;
            info!("{}: started", self.id.as_str());
        }

        self.applied = Applied {
            enabled: Some(enabled),
            resolution: Some(resolution),
            direction: Some(direction),
            starts,
            resets,
        };
        Ok(restarted || core::mem::take(&mut self.pending_restart))
    }

    fn apply_own_change(&mut self) -> Result<()> {
        let restarted = self.refresh()?;
        self.pending_restart |= restarted;
        Ok(())
    }

    /// Run one cycle of the continuous pulse train.
    ///
    /// Idles without pulsing while stopped or at 0 Hz.
    pub fn tick(&mut self) -> Result<Tick> {
        if !self.is_enabled() {
            return self.clock.tick(None);
        }
        self.clock.tick(self.state.interval_us())
    }

    /// Run one stepping cycle at `interval_us` regardless of the configured
    /// cadence. The caller is responsible for checking the channel is active.
    pub fn step_for(&mut self, interval_us: u32) -> Result<Tick> {
        self.clock.tick(Some(interval_us))
    }

    /// Sleep one idle slice without pulsing.
    pub fn idle(&mut self) -> Result<Tick> {
        self.clock.tick(None)
    }

    /// Issue a single immediate pulse, outside the cadence.
    pub fn step(&mut self) -> Result<()> {
        self.clock.pulse()
    }

    /// Suspend the owning activity on the channel's time base.
    pub fn wait_us(&mut self, us: u32) {
        self.clock.wait_us(us);
    }

    /// Set the step frequency and apply it. 0 stops pulsing but leaves the
    /// enable line alone.
    pub fn set_frequency(&mut self, hz: f32) -> Result<()> {
        self.handle().set_frequency(hz)
    }

    /// Set and apply the microstep resolution.
    pub fn set_resolution(&mut self, value: u8) -> Result<MicrostepResolution> {
        let resolution = self.handle().set_resolution(value)?;
        self.apply_own_change()?;
        Ok(resolution)
    }

    /// Set and apply the DIR line.
    pub fn set_direction(&mut self, direction: bool) -> Result<()> {
        self.handle().set_direction(direction);
        self.apply_own_change()
    }

    /// Enable the driver.
    pub fn start(&mut self) -> Result<()> {
        self.handle().start();
        self.apply_own_change()
    }

    /// Disable the driver. Calling it on a stopped channel changes nothing.
    pub fn stop(&mut self) -> Result<()> {
        self.handle().stop();
        self.apply_own_change()
    }

    /// Pulse the driver's reset line now.
    pub fn reset(&mut self) -> Result<()> {
        self.handle().request_reset();
        self.apply_own_change()
    }

    /// Command-side handle sharing this channel's state.
    pub fn handle(&self) -> ChannelHandle<'a> {
        ChannelHandle::new(self.id, self.state)
    }

    /// Motor identity.
    #[inline]
    pub fn id(&self) -> MotorId {
        self.id
    }

    /// Whether a sync controller drives this channel.
    #[inline]
    pub fn is_linked_to_sensor(&self) -> bool {
        self.linked_to_sensor
    }

    /// Configured frequency in Hz.
    #[inline]
    pub fn frequency(&self) -> f32 {
        self.state.frequency()
    }

    /// Configured step interval in microseconds, `None` at 0 Hz.
    #[inline]
    pub fn interval_us(&self) -> Option<u32> {
        self.state.interval_us()
    }

    /// Configured microstep resolution.
    #[inline]
    pub fn resolution(&self) -> MicrostepResolution {
        self.state.resolution()
    }

    /// Configured DIR level.
    #[inline]
    pub fn direction(&self) -> bool {
        self.state.direction()
    }

    /// Whether the driver is enabled.
    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.state.is_enabled()
    }

    /// Enabled and at a non-zero frequency.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.state.is_active()
    }

    /// Status snapshot.
    pub fn status(&self) -> MotorStatus {
        self.handle().status()
    }

    /// The activity's time base in microseconds.
    #[inline]
    pub fn elapsed_us(&self) -> u64 {
        self.clock.elapsed_us()
    }

    /// Pulses emitted so far.
    #[inline]
    pub fn pulse_count(&self) -> u64 {
        self.clock.pulse_count()
    }

    /// Tear down into driver and clock.
    pub fn release(self) -> (DriverControl<PIN>, PulseClock<STEP, DELAY>) {
        (self.driver, self.clock)
    }
}
