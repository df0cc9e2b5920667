//! Channel state shared between the command side and the stepping activity.
//!
//! The command side (serial/HMI handlers, through [`ChannelHandle`]) is the
//! only writer. The activity that owns the pins only reads, and applies
//! whatever changed at the top of its next cycle. Every field is a single
//! atomic word, so reads never tear even when the writer runs in an
//! interrupt or on another core.

use core::sync::atomic::{AtomicBool, AtomicU32, AtomicU8, Ordering};

use crate::config::units::{interval_micros, rpm, MicrostepResolution, MotorId};
use crate::error::{MotorError, Result};

use super::pulse::MIN_INTERVAL_US;

/// Atomic settings of one motor channel.
///
/// Usually placed in a `static` so both sides can borrow it for `'static`.
#[derive(Debug)]
pub struct ChannelState {
    frequency_bits: AtomicU32,
    /// Derived from the frequency, 0 means no stepping.
    interval_us: AtomicU32,
    enabled: AtomicBool,
    resolution: AtomicU8,
    direction: AtomicBool,
    /// Bumped on every disabled -> enabled transition.
    starts: AtomicU32,
    /// Bumped on every driver reset request.
    resets: AtomicU32,
}

impl ChannelState {
    /// Stopped, 0 Hz, full step, direction low.
    pub const fn new() -> Self {
        Self {
            frequency_bits: AtomicU32::new(0),
            interval_us: AtomicU32::new(0),
            enabled: AtomicBool::new(false),
            resolution: AtomicU8::new(MicrostepResolution::Full as u8),
            direction: AtomicBool::new(false),
            starts: AtomicU32::new(0),
            resets: AtomicU32::new(0),
        }
    }

    /// Configured step frequency in Hz.
    pub fn frequency(&self) -> f32 {
        f32::from_bits(self.frequency_bits.load(Ordering::Acquire))
    }

    /// Step interval in microseconds, `None` when the frequency is 0.
    pub fn interval_us(&self) -> Option<u32> {
        match self.interval_us.load(Ordering::Acquire) {
            0 => None,
            us => Some(us),
        }
    }

    /// Whether the driver should be enabled.
    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Acquire)
    }

    /// Enabled and stepping at a non-zero frequency.
    pub fn is_active(&self) -> bool {
        self.is_enabled() && self.interval_us().is_some()
    }

    /// Configured microstep resolution.
    pub fn resolution(&self) -> MicrostepResolution {
        MicrostepResolution::new(self.resolution.load(Ordering::Acquire)).unwrap_or_default()
    }

    /// Configured DIR line level.
    pub fn direction(&self) -> bool {
        self.direction.load(Ordering::Acquire)
    }

    pub(crate) fn starts(&self) -> u32 {
        self.starts.load(Ordering::Acquire)
    }

    pub(crate) fn resets(&self) -> u32 {
        self.resets.load(Ordering::Acquire)
    }

    pub(crate) fn store_frequency(&self, hz: f32) -> Result<()> {
        if !hz.is_finite() || hz < 0.0 {
            return Err(MotorError::InvalidFrequency(hz).into());
        }
        let interval = interval_micros(hz, MIN_INTERVAL_US).unwrap_or(0);
        // Interval first: the activity only ever reads the interval.
        self.interval_us.store(interval, Ordering::Release);
        self.frequency_bits.store(hz.to_bits(), Ordering::Release);
        Ok(())
    }

    pub(crate) fn store_resolution(&self, value: u8) -> Result<MicrostepResolution> {
        let resolution =
            MicrostepResolution::new(value).ok_or(MotorError::InvalidResolution(value))?;
        self.resolution.store(resolution.value(), Ordering::Release);
        Ok(resolution)
    }

    pub(crate) fn store_direction(&self, direction: bool) {
        self.direction.store(direction, Ordering::Release);
    }

    pub(crate) fn store_enabled(&self, enabled: bool) {
        let was_enabled = self.enabled.load(Ordering::Acquire);
        if enabled && !was_enabled {
            // Single writer, so load + store cannot lose an increment.
            let starts = self.starts.load(Ordering::Acquire);
            self.starts.store(starts.wrapping_add(1), Ordering::Release);
        }
        self.enabled.store(enabled, Ordering::Release);
    }

    pub(crate) fn request_reset(&self) {
        let resets = self.resets.load(Ordering::Acquire);
        self.resets.store(resets.wrapping_add(1), Ordering::Release);
    }
}

impl Default for ChannelState {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot returned by status queries.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MotorStatus {
    /// Which motor.
    pub id: MotorId,
    /// Step frequency in Hz.
    pub speed_hz: f32,
    /// Microstep resolution.
    pub resolution: MicrostepResolution,
    /// DIR line level.
    pub direction: bool,
    /// Driver enabled.
    pub enabled: bool,
}

impl MotorStatus {
    /// Output shaft speed for a motor with `steps_per_revolution` full steps.
    pub fn rpm(&self, steps_per_revolution: u16) -> f32 {
        rpm(self.speed_hz, self.resolution, steps_per_revolution)
    }
}

/// Command-side view of a channel.
///
/// Changes are validated here and become visible on the pins within one
/// cycle of the owning activity.
#[derive(Debug, Clone, Copy)]
pub struct ChannelHandle<'a> {
    id: MotorId,
    state: &'a ChannelState,
}

impl<'a> ChannelHandle<'a> {
    /// Create a handle for `id` backed by `state`.
    pub const fn new(id: MotorId, state: &'a ChannelState) -> Self {
        Self { id, state }
    }

    /// Which motor this handle controls.
    pub fn id(&self) -> MotorId {
        self.id
    }

    /// Set the step frequency. 0 stops pulsing without touching the enable line.
    pub fn set_frequency(&self, hz: f32) -> Result<()> {
        self.state.store_frequency(hz).map_err(|e| {
            warn!("{}: rejected frequency {}", self.id.as_str(), hz);
            e
        })
    }

    /// Set the microstep resolution; unsupported values keep the previous one.
    pub fn set_resolution(&self, value: u8) -> Result<MicrostepResolution> {
        self.state.store_resolution(value).map_err(|e| {
            warn!("{}: rejected resolution {}", self.id.as_str(), value);
            e
        })
    }

    /// Set the DIR line level.
    pub fn set_direction(&self, direction: bool) {
        self.state.store_direction(direction);
    }

    /// Enable the driver.
    pub fn start(&self) {
        self.state.store_enabled(true);
    }

    /// Disable the driver. Idempotent.
    pub fn stop(&self) {
        self.state.store_enabled(false);
    }

    /// Ask the activity to pulse the driver's reset line.
    pub fn request_reset(&self) {
        self.state.request_reset();
    }

    /// Current status snapshot.
    pub fn status(&self) -> MotorStatus {
        MotorStatus {
            id: self.id,
            speed_hz: self.state.frequency(),
            resolution: self.state.resolution(),
            direction: self.state.direction(),
            enabled: self.state.is_enabled(),
        }
    }

    /// Backing state.
    pub fn state(&self) -> &'a ChannelState {
        self.state
    }
}
