//! Sensor-synchronized stepping state machine.
//!
//! One [`SyncController::cycle`] call is one iteration of the sensor-linked
//! channel's activity: it refreshes the channel, samples the sensor when the
//! current phase needs it, performs at most one transition, and runs exactly
//! one step cycle (or one idle slice).
//!
//! ```text
//!  WATCHING --rising edge--> CONFIRMING --last step--> PAUSED
//!     ^                                                   |
//!     |                                              held pulse
//!     +------------ sensor LOW ---- HOLDING_HIGH <--------+
//! ```
//!
//! A sensor stuck HIGH leaves the machine in HOLDING_HIGH after one episode,
//! stepping continuously and never pausing again. A sensor stuck LOW keeps it
//! in WATCHING, which behaves like a plain channel. The detector starts from
//! LOW, so a sensor already HIGH at power-on or when the channel is restarted
//! counts as a fresh rising edge and begins an episode on the first cycle.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};

use crate::error::{Result, SensorError};
use crate::motor::{MotorChannel, Tick, PULSE_WIDTH_US};

use super::edge::{EdgeDetector, EdgeEvent, EdgeLatch};
use super::settings::{SyncReport, SyncSettings};

/// Phase of the sync state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SyncPhase {
    /// Stepping normally, waiting for a rising edge.
    Watching,
    /// Running the bounded confirmation steps.
    Confirming,
    /// Emitting the single held pulse.
    Paused,
    /// Stepping normally, waiting for the sensor to read LOW.
    HoldingHigh,
}

/// Snapshot for status queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SyncStatus {
    /// Current phase.
    pub phase: SyncPhase,
    /// Confirmation steps left in the current episode.
    pub confirm_steps_remaining: u32,
    /// Interval restored after the last held pulse.
    pub saved_interval_us: Option<u32>,
    /// Completed pause episodes since creation.
    pub episodes: u32,
}

/// State machine bound to the sensor-linked channel.
pub struct SyncController<'a, S>
where
    S: InputPin,
{
    sensor: S,
    settings: &'a SyncSettings,
    latch: Option<&'a EdgeLatch>,
    report: Option<&'a SyncReport>,
    detector: EdgeDetector,
    phase: SyncPhase,
    confirm_remaining: u32,
    /// Pause length captured when the current episode started.
    pause_us: u32,
    saved_interval_us: Option<u32>,
    episodes: u32,
}

impl<'a, S> SyncController<'a, S>
where
    S: InputPin,
{
    /// Create a controller in WATCHING.
    pub fn new(sensor: S, settings: &'a SyncSettings) -> Self {
        Self {
            sensor,
            settings,
            latch: None,
            report: None,
            detector: EdgeDetector::new(settings.debounce_us()),
            phase: SyncPhase::Watching,
            confirm_remaining: 0,
            pause_us: settings.pause_us(),
            saved_interval_us: None,
            episodes: 0,
        }
    }

    /// Also accept edges recorded by an interrupt handler while WATCHING.
    pub fn with_edge_latch(mut self, latch: &'a EdgeLatch) -> Self {
        self.latch = Some(latch);
        self
    }

    /// Publish the status after every cycle for command-side queries.
    pub fn with_report(mut self, report: &'a SyncReport) -> Self {
        report.publish(&self.status());
        self.report = Some(report);
        self
    }

    /// Current phase.
    #[inline]
    pub fn phase(&self) -> SyncPhase {
        self.phase
    }

    /// Status snapshot.
    pub fn status(&self) -> SyncStatus {
        SyncStatus {
            phase: self.phase,
            confirm_steps_remaining: self.confirm_remaining,
            saved_interval_us: self.saved_interval_us,
            episodes: self.episodes,
        }
    }

    /// Back to WATCHING with a clean detector.
    pub fn reset(&mut self) {
        self.phase = SyncPhase::Watching;
        self.confirm_remaining = 0;
        self.detector.set_debounce_us(self.settings.debounce_us());
        self.detector.reset();
        if let Some(latch) = self.latch {
            latch.take();
        }
    }

    /// Run one iteration on `channel`.
    ///
    /// While the channel is stopped or at 0 Hz the phase is frozen and the
    /// activity idles; a stop followed by a start resets to WATCHING.
    pub fn cycle<STEP, PIN, DELAY>(
        &mut self,
        channel: &mut MotorChannel<'_, STEP, PIN, DELAY>,
    ) -> Result<Tick>
    where
        STEP: OutputPin,
        PIN: OutputPin,
        DELAY: DelayNs,
    {
        if channel.refresh()? {
            debug!("sync: channel restarted, re-arming");
            self.reset();
        }
        // One read of the cadence per cycle; a concurrent stop or 0 Hz takes
        // effect on the next cycle.
        let Some(interval_us) = channel.interval_us().filter(|_| channel.is_enabled()) else {
            return channel.idle();
        };

        match self.phase {
            SyncPhase::Watching => {
                let level = self.read_sensor()?;
                let latched = self.latch.map_or(false, |latch| latch.take());
                let now = channel.elapsed_us();
                if self.detector.poll(level || latched, now) == EdgeEvent::RisingEdge {
                    self.begin_episode();
                }
            }
            SyncPhase::HoldingHigh => {
                if !self.read_sensor()? {
                    self.reset();
                    debug!("sync: sensor clear, watching");
                }
            }
            SyncPhase::Confirming | SyncPhase::Paused => {}
        }

        let tick = match self.phase {
            SyncPhase::Confirming => self.confirm_step(channel, interval_us),
            SyncPhase::Paused => self.held_pulse(channel, interval_us),
            SyncPhase::Watching | SyncPhase::HoldingHigh => channel.step_for(interval_us),
        };
        if let Some(report) = self.report {
            report.publish(&self.status());
        }
        tick
    }

    fn read_sensor(&mut self) -> Result<bool> {
        self.sensor
            .is_high()
            .map_err(|_| SensorError::ReadFailed.into())
    }

    fn begin_episode(&mut self) {
        self.confirm_remaining = self.settings.confirm_steps();
        self.pause_us = self.settings.pause_us();
        self.phase = if self.confirm_remaining == 0 {
            SyncPhase::Paused
        } else {
            SyncPhase::Confirming
        };
        info!("sync: rising edge, confirming {} steps", self.confirm_remaining);
    }

    fn confirm_step<STEP, PIN, DELAY>(
        &mut self,
        channel: &mut MotorChannel<'_, STEP, PIN, DELAY>,
        interval_us: u32,
    ) -> Result<Tick>
    where
        STEP: OutputPin,
        PIN: OutputPin,
        DELAY: DelayNs,
    {
        channel.step()?;
        channel.wait_us(interval_us.saturating_sub(PULSE_WIDTH_US));

        self.confirm_remaining = self.confirm_remaining.saturating_sub(1);
        if self.confirm_remaining == 0 {
            self.phase = SyncPhase::Paused;
        }
        Ok(Tick::Stepped { interval_us })
    }

    fn held_pulse<STEP, PIN, DELAY>(
        &mut self,
        channel: &mut MotorChannel<'_, STEP, PIN, DELAY>,
        interval_us: u32,
    ) -> Result<Tick>
    where
        STEP: OutputPin,
        PIN: OutputPin,
        DELAY: DelayNs,
    {
        let tick = channel.step_for(self.pause_us)?;
        self.saved_interval_us = Some(interval_us);
        self.phase = SyncPhase::HoldingHigh;
        self.episodes = self.episodes.wrapping_add(1);
        info!("sync: pause done, holding until sensor clears");
        Ok(tick)
    }

    /// Release the sensor input.
    pub fn release(self) -> S {
        self.sensor
    }
}
