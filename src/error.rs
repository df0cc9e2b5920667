//! Error types for stepper-sync.
//!
//! Provides unified error handling across configuration, motor control and
//! sensor sampling. None of these are fatal: callers are expected to keep the
//! previous state and carry on.

use core::fmt;

/// Result type alias using the library's Error type.
pub type Result<T> = core::result::Result<T, Error>;

/// Unified error type for all stepper-sync operations.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Configuration parsing, validation or persistence error
    Config(ConfigError),
    /// Motor driver or channel error
    Motor(MotorError),
    /// Position sensor error
    Sensor(SensorError),
}

/// Configuration-related errors.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Failed to parse TOML configuration
    ParseError(heapless::String<128>),
    /// Unsupported microstep resolution (must be 1, 2, 4, 8 or 16)
    InvalidResolution(u16),
    /// Invalid default speed (must be finite and >= 0)
    InvalidSpeed(f32),
    /// Invalid debounce window (must be > 0)
    InvalidDebounce(u32),
    /// Key-value store rejected a write
    StoreFull,
    /// File I/O error (std only)
    #[cfg(feature = "std")]
    IoError(heapless::String<128>),
}

/// Motor operation errors.
#[derive(Debug, Clone, PartialEq)]
pub enum MotorError {
    /// Pin operation failed
    PinError,
    /// Unsupported microstep resolution, previous resolution kept
    InvalidResolution(u8),
    /// Negative or non-finite frequency, previous frequency kept
    InvalidFrequency(f32),
}

/// Position sensor errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// Reading the sensor input failed
    ReadFailed,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Config(e) => write!(f, "Configuration error: {}", e),
            Error::Motor(e) => write!(f, "Motor error: {}", e),
            Error::Sensor(e) => write!(f, "Sensor error: {}", e),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            ConfigError::InvalidResolution(v) => {
                write!(f, "Invalid microstep resolution: {}. Valid values: 1, 2, 4, 8, 16", v)
            }
            ConfigError::InvalidSpeed(v) => write!(f, "Invalid speed: {} Hz. Must be >= 0", v),
            ConfigError::InvalidDebounce(v) => {
                write!(f, "Invalid debounce window: {} ms. Must be > 0", v)
            }
            ConfigError::StoreFull => write!(f, "Configuration store is full"),
            #[cfg(feature = "std")]
            ConfigError::IoError(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl fmt::Display for MotorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MotorError::PinError => write!(f, "GPIO pin operation failed"),
            MotorError::InvalidResolution(r) => {
                write!(f, "Unsupported microstep resolution {}", r)
            }
            MotorError::InvalidFrequency(hz) => write!(f, "Invalid step frequency {} Hz", hz),
        }
    }
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SensorError::ReadFailed => write!(f, "Failed to read sensor input"),
        }
    }
}

// Conversion impls
impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Error::Config(e)
    }
}

impl From<MotorError> for Error {
    fn from(e: MotorError) -> Self {
        Error::Motor(e)
    }
}

impl From<SensorError> for Error {
    fn from(e: SensorError) -> Self {
        Error::Sensor(e)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

#[cfg(feature = "std")]
impl std::error::Error for MotorError {}

#[cfg(feature = "std")]
impl std::error::Error for SensorError {}
