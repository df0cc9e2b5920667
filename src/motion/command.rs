//! Command-side entry points used by the serial and HMI handlers.

use crate::config::{validate_config, MicrostepResolution, MotorId, SystemConfig};
use crate::error::{MotorError, Result};
use crate::motor::{ChannelHandle, ChannelState, MotorStatus};
use crate::sync::{SyncReport, SyncSettings, SyncStatus};

/// Write access to both channels and the sync parameters.
///
/// Every call returns immediately; the owning activities pick the changes up
/// at the start of their next cycle. Copies are cheap and may be handed to
/// several protocol handlers, as long as only one of them writes at a time.
#[derive(Debug, Clone, Copy)]
pub struct CommandPort<'a> {
    case: ChannelHandle<'a>,
    disc: ChannelHandle<'a>,
    sync: &'a SyncSettings,
    report: Option<&'a SyncReport>,
}

impl<'a> CommandPort<'a> {
    /// Bind to the shared state of both channels.
    pub fn new(case: &'a ChannelState, disc: &'a ChannelState, sync: &'a SyncSettings) -> Self {
        Self {
            case: ChannelHandle::new(MotorId::Case, case),
            disc: ChannelHandle::new(MotorId::Disc, disc),
            sync,
            report: None,
        }
    }

    /// Read sync status from `report`.
    pub fn with_sync_report(mut self, report: &'a SyncReport) -> Self {
        self.report = Some(report);
        self
    }

    /// Handle for one channel.
    pub fn channel(&self, id: MotorId) -> ChannelHandle<'a> {
        match id {
            MotorId::Case => self.case,
            MotorId::Disc => self.disc,
        }
    }

    /// Reconfigure a motor and restart it.
    ///
    /// Both values are checked before anything changes. On success the
    /// driver is stopped, reprogrammed, reset and started again, which also
    /// re-arms the sync controller of the disc motor.
    ///
    /// # Errors
    ///
    /// `MotorError::InvalidFrequency` or `MotorError::InvalidResolution`;
    /// the previous settings are kept.
    pub fn set_motor_parameters(
        &self,
        id: MotorId,
        speed_hz: f32,
        resolution: u8,
        direction: bool,
    ) -> Result<()> {
        if !speed_hz.is_finite() || speed_hz < 0.0 {
            warn!("{}: rejected speed", id.as_str());
            return Err(MotorError::InvalidFrequency(speed_hz).into());
        }
        if MicrostepResolution::new(resolution).is_none() {
            warn!("{}: rejected microstep resolution {}", id.as_str(), resolution);
            return Err(MotorError::InvalidResolution(resolution).into());
        }

        let channel = self.channel(id);
        channel.stop();
        channel.set_frequency(speed_hz)?;
        channel.set_resolution(resolution)?;
        channel.set_direction(direction);
        channel.request_reset();
        channel.start();
        info!("{}: reconfigured", id.as_str());
        Ok(())
    }

    /// Enable a motor. Idempotent.
    pub fn start(&self, id: MotorId) {
        self.channel(id).start();
    }

    /// Disable a motor. Idempotent.
    pub fn stop(&self, id: MotorId) {
        self.channel(id).stop();
    }

    /// Enable both motors.
    pub fn start_all(&self) {
        self.case.start();
        self.disc.start();
        info!("system started");
    }

    /// Disable both motors.
    pub fn stop_all(&self) {
        self.case.stop();
        self.disc.stop();
        info!("system stopped");
    }

    /// Change the pause duration and confirmation step count.
    ///
    /// Takes effect at the next rising edge; an episode already running keeps
    /// the values it started with.
    pub fn set_sync_parameters(&self, pause_duration_ms: u32, confirm_step_count: u32) {
        self.sync.set_pause_ms(pause_duration_ms);
        self.sync.set_confirm_steps(confirm_step_count);
        info!(
            "sync: pause {} ms, {} confirm steps",
            pause_duration_ms,
            confirm_step_count
        );
    }

    /// Speed, resolution, direction and enable state of a motor.
    pub fn get_status(&self, id: MotorId) -> MotorStatus {
        self.channel(id).status()
    }

    /// Last published sync status, if a report is attached.
    pub fn get_sync_status(&self) -> Option<SyncStatus> {
        self.report.map(SyncReport::status)
    }

    /// Shared sync parameters.
    pub fn sync_settings(&self) -> &'a SyncSettings {
        self.sync
    }

    /// Push a whole configuration, e.g. the one loaded at startup.
    ///
    /// Channels with `autostart` are started, the others stopped.
    pub fn apply_config(&self, config: &SystemConfig) -> Result<()> {
        validate_config(config)?;
        for id in [MotorId::Case, MotorId::Disc] {
            let settings = config.channel(id);
            let channel = self.channel(id);
            channel.set_frequency(settings.speed)?;
            channel.set_resolution(settings.resolution.value())?;
            channel.set_direction(settings.direction);
            if settings.autostart {
                channel.start();
            } else {
                channel.stop();
            }
        }
        self.sync.apply(&config.sync);
        Ok(())
    }

    /// `base` with the live speed, resolution, direction and sync values
    /// written over it, ready for [`persist_to_store`].
    ///
    /// [`persist_to_store`]: crate::config::persist_to_store
    pub fn current_config(&self, base: &SystemConfig) -> SystemConfig {
        let mut config = *base;
        for id in [MotorId::Case, MotorId::Disc] {
            let status = self.get_status(id);
            let channel = config.channel_mut(id);
            channel.speed = status.speed_hz;
            channel.resolution = status.resolution;
            channel.direction = status.direction;
        }
        config.sync.pause_duration_ms = self.sync.pause_ms();
        config.sync.confirm_step_count = self.sync.confirm_steps();
        config.sync.debounce_ms = self.sync.debounce_us() / 1000;
        config
    }
}
