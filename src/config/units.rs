//! Unit and identity types shared by configuration and motor control.
//!
//! Keeps the A4988 microstep table and the motor identities in one place so
//! that configuration, the driver and the command port agree on them.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Logical identity of a motor channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[serde(rename_all = "snake_case")]
pub enum MotorId {
    /// Case motor, free-running.
    Case,
    /// Disc motor, synchronized to the position sensor.
    Disc,
}

impl MotorId {
    /// Stable lowercase name, used for logging and config sections.
    pub const fn as_str(self) -> &'static str {
        match self {
            MotorId::Case => "case",
            MotorId::Disc => "disc",
        }
    }
}

/// A4988 microstep resolution (1, 2, 4, 8, 16).
///
/// The discriminant is the divisor, so `as u8` yields the user-facing value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum MicrostepResolution {
    /// Full step.
    #[default]
    Full = 1,
    /// Half step.
    Half = 2,
    /// Quarter step.
    Quarter = 4,
    /// Eighth step.
    Eighth = 8,
    /// Sixteenth step.
    Sixteenth = 16,
}

impl MicrostepResolution {
    /// All supported resolutions, coarsest first.
    pub const ALL: [Self; 5] = [
        Self::Full,
        Self::Half,
        Self::Quarter,
        Self::Eighth,
        Self::Sixteenth,
    ];

    /// Create from a raw divisor, rejecting anything outside the table.
    pub fn new(value: u8) -> Option<Self> {
        Self::ALL.iter().copied().find(|r| r.value() == value)
    }

    /// Raw divisor.
    #[inline]
    pub const fn value(self) -> u8 {
        self as u8
    }

    /// MS1, MS2, MS3 line levels for this resolution.
    pub const fn select_lines(self) -> [bool; 3] {
        match self {
            Self::Full => [false, false, false],
            Self::Half => [true, false, false],
            Self::Quarter => [false, true, false],
            Self::Eighth => [true, true, false],
            Self::Sixteenth => [true, true, true],
        }
    }
}

impl TryFrom<u8> for MicrostepResolution {
    type Error = ConfigError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value).ok_or(ConfigError::InvalidResolution(value as u16))
    }
}

impl From<MicrostepResolution> for u8 {
    fn from(r: MicrostepResolution) -> Self {
        r.value()
    }
}

impl<'de> Deserialize<'de> for MicrostepResolution {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use core::fmt::Write;
        let value = u16::deserialize(deserializer)?;
        u8::try_from(value)
            .ok()
            .and_then(MicrostepResolution::new)
            .ok_or_else(|| {
                let mut buf = heapless::String::<128>::new();
                let _ = write!(buf, "{}", ConfigError::InvalidResolution(value));
                serde::de::Error::custom(buf.as_str())
            })
    }
}

impl Serialize for MicrostepResolution {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_u8(self.value())
    }
}

/// Convert a step frequency to a step interval in microseconds.
///
/// Returns `None` for zero, negative or non-finite input, meaning "no
/// stepping". Positive results are rounded to the nearest microsecond and
/// never fall below `floor_us`.
pub fn interval_micros(frequency_hz: f32, floor_us: u32) -> Option<u32> {
    if !frequency_hz.is_finite() || frequency_hz <= 0.0 {
        return None;
    }
    let raw = libm::roundf(1_000_000.0 / frequency_hz);
    let interval = if raw >= u32::MAX as f32 {
        u32::MAX
    } else {
        raw as u32
    };
    Some(interval.max(floor_us))
}

/// Output shaft speed in revolutions per minute.
///
/// `steps_per_revolution` is the motor's full-step count (200 for 1.8°).
pub fn rpm(frequency_hz: f32, resolution: MicrostepResolution, steps_per_revolution: u16) -> f32 {
    let microsteps_per_rev = resolution.value() as f32 * steps_per_revolution as f32;
    if microsteps_per_rev <= 0.0 {
        return 0.0;
    }
    frequency_hz * 60.0 / microsteps_per_rev
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolution_valid_values() {
        for r in MicrostepResolution::ALL {
            assert_eq!(MicrostepResolution::new(r.value()), Some(r));
        }
    }

    #[test]
    fn test_resolution_invalid_values() {
        assert!(MicrostepResolution::new(0).is_none());
        assert!(MicrostepResolution::new(3).is_none());
        assert!(MicrostepResolution::new(32).is_none());
        assert_eq!(
            MicrostepResolution::try_from(3),
            Err(ConfigError::InvalidResolution(3))
        );
    }

    #[test]
    fn test_select_lines_table() {
        assert_eq!(MicrostepResolution::Full.select_lines(), [false, false, false]);
        assert_eq!(MicrostepResolution::Quarter.select_lines(), [false, true, false]);
        assert_eq!(MicrostepResolution::Sixteenth.select_lines(), [true, true, true]);
    }

    #[test]
    fn test_interval_conversion() {
        assert_eq!(interval_micros(100.0, 4), Some(10_000));
        assert_eq!(interval_micros(3.0, 4), Some(333_333));
        assert_eq!(interval_micros(0.0, 4), None);
        assert_eq!(interval_micros(-5.0, 4), None);
        assert_eq!(interval_micros(f32::NAN, 4), None);
        // 1 MHz would be 1 µs, floored
        assert_eq!(interval_micros(1_000_000.0, 4), Some(4));
    }

    #[test]
    fn test_rpm() {
        // 750 Hz at 1/8 step on a 200 step motor: 750 * 60 / 1600
        let value = rpm(750.0, MicrostepResolution::Eighth, 200);
        assert!((value - 28.125).abs() < 0.001);
    }
}
