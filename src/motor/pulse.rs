//! Step pulse generation.
//!
//! One [`PulseClock`] owns the STEP line of one channel together with the
//! delay provider that paces it. Every suspension of the owning activity goes
//! through here, so the clock also keeps the activity's elapsed time.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use crate::error::{MotorError, Result};

/// STEP high time in microseconds (A4988 needs >= 1 µs).
pub const PULSE_WIDTH_US: u32 = 2;

/// Sleep slice used when the channel is stopped or at 0 Hz.
pub const IDLE_SLICE_US: u32 = 1_000;

/// Shortest step interval the clock will honor.
pub const MIN_INTERVAL_US: u32 = 2 * PULSE_WIDTH_US;

/// Outcome of one clock cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Tick {
    /// No pulse; the activity slept for [`IDLE_SLICE_US`].
    Idle,
    /// One pulse, and the cycle lasted `interval_us`.
    Stepped {
        /// Effective interval of this cycle.
        interval_us: u32,
    },
}

impl Tick {
    /// Whether a pulse was emitted.
    #[inline]
    pub fn stepped(self) -> bool {
        matches!(self, Tick::Stepped { .. })
    }
}

/// Constant-cadence pulse emitter for one STEP line.
#[derive(Debug)]
pub struct PulseClock<STEP, DELAY>
where
    STEP: OutputPin,
    DELAY: DelayNs,
{
    step_pin: STEP,
    delay: DELAY,
    elapsed_us: u64,
    pulses: u64,
}

impl<STEP, DELAY> PulseClock<STEP, DELAY>
where
    STEP: OutputPin,
    DELAY: DelayNs,
{
    /// Create a clock. The STEP line is expected to rest low.
    pub fn new(step_pin: STEP, delay: DELAY) -> Self {
        Self {
            step_pin,
            delay,
            elapsed_us: 0,
            pulses: 0,
        }
    }

    /// Emit exactly one pulse: STEP high, hold [`PULSE_WIDTH_US`], STEP low.
    pub fn pulse(&mut self) -> Result<()> {
        self.step_pin.set_high().map_err(|_| MotorError::PinError)?;
        self.delay.delay_us(PULSE_WIDTH_US);
        self.step_pin.set_low().map_err(|_| MotorError::PinError)?;
        self.elapsed_us += PULSE_WIDTH_US as u64;
        self.pulses += 1;
        Ok(())
    }

    /// Suspend the calling activity.
    pub fn wait_us(&mut self, us: u32) {
        if us > 0 {
            self.delay.delay_us(us);
            self.elapsed_us += us as u64;
        }
    }

    /// Run one cycle.
    ///
    /// With no interval, sleeps one idle slice without pulsing. Otherwise
    /// pulses and sleeps for the rest of the interval.
    pub fn tick(&mut self, interval_us: Option<u32>) -> Result<Tick> {
        let Some(interval_us) = interval_us else {
            self.wait_us(IDLE_SLICE_US);
            return Ok(Tick::Idle);
        };
        let interval_us = interval_us.max(MIN_INTERVAL_US);
        self.pulse()?;
        self.wait_us(interval_us.saturating_sub(PULSE_WIDTH_US));
        Ok(Tick::Stepped { interval_us })
    }

    /// Microseconds this clock has spent suspended or pulsing.
    ///
    /// This is the activity's own time base.
    #[inline]
    pub fn elapsed_us(&self) -> u64 {
        self.elapsed_us
    }

    /// Number of pulses emitted so far.
    #[inline]
    pub fn pulse_count(&self) -> u64 {
        self.pulses
    }

    /// Access the delay provider, e.g. for driver reset timing.
    ///
    /// Delays issued through this reference are not counted in
    /// [`elapsed_us`](Self::elapsed_us).
    #[inline]
    pub fn delay_mut(&mut self) -> &mut DELAY {
        &mut self.delay
    }

    /// Release the STEP pin and delay.
    pub fn release(self) -> (STEP, DELAY) {
        (self.step_pin, self.delay)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal_mock::eh1::delay::NoopDelay;
    use embedded_hal_mock::eh1::digital::{
        Mock as PinMock, State as PinState, Transaction as PinTransaction,
    };

    #[test]
    fn test_single_pulse_edges() {
        let step = PinMock::new(&[
            PinTransaction::set(PinState::High),
            PinTransaction::set(PinState::Low),
        ]);
        let mut clock = PulseClock::new(step, NoopDelay::new());

        clock.pulse().unwrap();
        assert_eq!(clock.pulse_count(), 1);
        assert_eq!(clock.elapsed_us(), PULSE_WIDTH_US as u64);

        let (mut step, _) = clock.release();
        step.done();
    }

    #[test]
    fn test_tick_accounts_full_interval() {
        let step = PinMock::new(&[
            PinTransaction::set(PinState::High),
            PinTransaction::set(PinState::Low),
        ]);
        let mut clock = PulseClock::new(step, NoopDelay::new());

        let tick = clock.tick(Some(10_000)).unwrap();
        assert_eq!(tick, Tick::Stepped { interval_us: 10_000 });
        assert_eq!(clock.elapsed_us(), 10_000);

        let (mut step, _) = clock.release();
        step.done();
    }

    #[test]
    fn test_idle_tick_does_not_pulse() {
        let mut clock = PulseClock::new(PinMock::new(&[]), NoopDelay::new());

        for _ in 0..5 {
            assert_eq!(clock.tick(None).unwrap(), Tick::Idle);
        }
        assert_eq!(clock.pulse_count(), 0);
        assert_eq!(clock.elapsed_us(), 5 * IDLE_SLICE_US as u64);

        let (mut step, _) = clock.release();
        step.done();
    }

    #[test]
    fn test_interval_floor() {
        let step = PinMock::new(&[
            PinTransaction::set(PinState::High),
            PinTransaction::set(PinState::Low),
        ]);
        let mut clock = PulseClock::new(step, NoopDelay::new());

        let tick = clock.tick(Some(1)).unwrap();
        assert_eq!(tick, Tick::Stepped { interval_us: MIN_INTERVAL_US });

        let (mut step, _) = clock.release();
        step.done();
    }
}
