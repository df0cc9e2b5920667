//! Test helpers shared by the motor, sync and motion unit tests.

use embedded_hal::digital::{ErrorType, InputPin, OutputPin};

use super::driver::{DriverControl, DriverPins};

/// Infallible pin that ignores writes.
#[derive(Debug, Default)]
pub(crate) struct NullPin;

impl ErrorType for NullPin {
    type Error = core::convert::Infallible;
}

impl OutputPin for NullPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

pub(crate) fn null_pins() -> DriverPins<NullPin> {
    DriverPins {
        dir: NullPin,
        enable: NullPin,
        sleep: NullPin,
        reset: NullPin,
        ms1: NullPin,
        ms2: NullPin,
        ms3: NullPin,
    }
}

pub(crate) fn null_driver() -> DriverControl<NullPin> {
    DriverControl::new(null_pins())
}

/// Sensor input that always reads LOW.
#[derive(Debug, Default)]
pub(crate) struct LowSensor;

impl ErrorType for LowSensor {
    type Error = core::convert::Infallible;
}

impl InputPin for LowSensor {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(false)
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(true)
    }
}

/// Sensor input whose every read fails.
#[derive(Debug, Default)]
pub(crate) struct BrokenSensor;

impl ErrorType for BrokenSensor {
    type Error = embedded_hal::digital::ErrorKind;
}

impl InputPin for BrokenSensor {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Err(embedded_hal::digital::ErrorKind::Other)
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Err(embedded_hal::digital::ErrorKind::Other)
    }
}
