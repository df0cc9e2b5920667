//! A4988 control line sequencing.
//!
//! Generic over a single embedded-hal 1.0 `OutputPin` type for all control
//! lines; HALs that give each GPIO its own type can be used through their
//! type-erased pin (`Output<'d>`, `AnyPin`, ...).

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use crate::config::units::MicrostepResolution;
use crate::error::{MotorError, Result};

/// Minimum time the RESET line is held low, in microseconds.
pub const RESET_HOLD_US: u32 = 100;

/// The non-step control lines of one driver chip.
#[derive(Debug)]
pub struct DriverPins<PIN> {
    /// DIR input.
    pub dir: PIN,
    /// ENABLE input (active low).
    pub enable: PIN,
    /// SLEEP input (active low).
    pub sleep: PIN,
    /// RESET input (active low).
    pub reset: PIN,
    /// MS1 microstep select.
    pub ms1: PIN,
    /// MS2 microstep select.
    pub ms2: PIN,
    /// MS3 microstep select.
    pub ms3: PIN,
}

/// Stateless pin sequencing for an A4988 driver.
///
/// Caches the last levels written so that getters do not need to read pins
/// back, but every setter always writes the hardware.
#[derive(Debug)]
pub struct DriverControl<PIN>
where
    PIN: OutputPin,
{
    pins: DriverPins<PIN>,
    enabled: bool,
    resolution: Option<MicrostepResolution>,
    direction: Option<bool>,
}

fn drive<P: OutputPin>(pin: &mut P, high: bool) -> Result<()> {
    if high {
        pin.set_high().map_err(|_| MotorError::PinError)?;
    } else {
        pin.set_low().map_err(|_| MotorError::PinError)?;
    }
    Ok(())
}

impl<PIN> DriverControl<PIN>
where
    PIN: OutputPin,
{
    /// Wrap the control lines. No pin is touched until a method is called.
    pub fn new(pins: DriverPins<PIN>) -> Self {
        Self {
            pins,
            enabled: false,
            resolution: None,
            direction: None,
        }
    }

    /// Power-on sequence: disable outputs, wake the chip, pulse reset.
    pub fn begin<D: DelayNs>(&mut self, delay: &mut D) -> Result<()> {
        self.stop()?;
        self.set_sleep(false)?;
        self.reset_pulse(delay)
    }

    /// Drive ENABLE to its active (low) level.
    pub fn start(&mut self) -> Result<()> {
        drive(&mut self.pins.enable, false)?;
        self.enabled = true;
        Ok(())
    }

    /// Drive ENABLE to its inactive (high) level; the motor freewheels.
    pub fn stop(&mut self) -> Result<()> {
        drive(&mut self.pins.enable, true)?;
        self.enabled = false;
        Ok(())
    }

    /// Hold RESET low for [`RESET_HOLD_US`], then release it.
    pub fn reset_pulse<D: DelayNs>(&mut self, delay: &mut D) -> Result<()> {
        drive(&mut self.pins.reset, false)?;
        delay.delay_us(RESET_HOLD_US);
        drive(&mut self.pins.reset, true)?;
        debug!("driver reset");
        Ok(())
    }

    /// Drive SLEEP; `true` puts the chip in low-power sleep.
    pub fn set_sleep(&mut self, asleep: bool) -> Result<()> {
        drive(&mut self.pins.sleep, !asleep)
    }

    /// Select a microstep resolution from its raw divisor.
    ///
    /// Values outside {1, 2, 4, 8, 16} are rejected and no line is written.
    pub fn set_microstep_resolution(&mut self, value: u8) -> Result<MicrostepResolution> {
        let Some(resolution) = MicrostepResolution::new(value) else {
            warn!("invalid microstep resolution {}", value);
            return Err(MotorError::InvalidResolution(value).into());
        };
        self.apply_resolution(resolution)?;
        Ok(resolution)
    }

    /// Write the MS1-3 levels for `resolution`.
    pub fn apply_resolution(&mut self, resolution: MicrostepResolution) -> Result<()> {
        let [ms1, ms2, ms3] = resolution.select_lines();
        drive(&mut self.pins.ms1, ms1)?;
        drive(&mut self.pins.ms2, ms2)?;
        drive(&mut self.pins.ms3, ms3)?;
        self.resolution = Some(resolution);
        Ok(())
    }

    /// Drive the DIR line.
    pub fn set_direction(&mut self, direction: bool) -> Result<()> {
        drive(&mut self.pins.dir, direction)?;
        self.direction = Some(direction);
        Ok(())
    }

    /// Whether ENABLE was last driven active.
    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Last resolution written, if any.
    #[inline]
    pub fn resolution(&self) -> Option<MicrostepResolution> {
        self.resolution
    }

    /// Last direction written, if any.
    #[inline]
    pub fn direction(&self) -> Option<bool> {
        self.direction
    }

    /// Release the pins.
    pub fn release(self) -> DriverPins<PIN> {
        self.pins
    }
}
