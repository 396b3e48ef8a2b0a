//! Unified error types for the greenhouse controller.
//!
//! A single `Error` enum that every port failure converts into, keeping the
//! task loops' error handling uniform. All variants are `Copy` so they can be
//! passed through the diagnostics surface and event sink without allocation.
//!
//! Every error classifies itself as transient (skip the cycle, try again on
//! the next one) or fatal (the task cannot continue).

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

/// Every fallible operation in the controller funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The environment could not be read.
    Sensor(SensorError),
    /// A roof or relay command failed or was rejected.
    Actuator(ActuatorError),
    /// A notification could not be delivered.
    Notify(NotifyError),
    /// The data log could not be written or read back.
    DataLog(DataLogError),
    /// The sunset source failed.
    Weather(WeatherError),
    /// Configuration is invalid or could not be loaded.
    Config(&'static str),
}

impl Error {
    /// Transient faults are recorded and the cycle is skipped; only fatal
    /// faults end a task.
    pub const fn is_transient(&self) -> bool {
        !matches!(self, Self::Config(_))
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sensor(e) => write!(f, "sensor: {e}"),
            Self::Actuator(e) => write!(f, "actuator: {e}"),
            Self::Notify(e) => write!(f, "notify: {e}"),
            Self::DataLog(e) => write!(f, "data log: {e}"),
            Self::Weather(e) => write!(f, "weather: {e}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Sensor errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// Bus transaction failed or timed out.
    ReadFailed,
    /// Reading is outside the physically plausible range.
    OutOfRange,
    /// The sensor is not responding at all.
    Unavailable,
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReadFailed => write!(f, "read failed"),
            Self::OutOfRange => write!(f, "reading out of range"),
            Self::Unavailable => write!(f, "sensor unavailable"),
        }
    }
}

impl std::error::Error for SensorError {}

impl From<SensorError> for Error {
    fn from(e: SensorError) -> Self {
        Self::Sensor(e)
    }
}

// ---------------------------------------------------------------------------
// Actuator errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorError {
    /// The requested roof move is not a single step between adjacent
    /// valid positions. The roof is left where it was.
    InvalidTransition { from: u8, to: u8 },
    /// PWM duty-cycle write failed.
    PwmWriteFailed,
    /// GPIO set failed.
    GpioWriteFailed,
}

impl fmt::Display for ActuatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidTransition { from, to } => {
                write!(f, "invalid roof transition {from}% -> {to}%")
            }
            Self::PwmWriteFailed => write!(f, "PWM write failed"),
            Self::GpioWriteFailed => write!(f, "GPIO write failed"),
        }
    }
}

impl std::error::Error for ActuatorError {}

impl From<ActuatorError> for Error {
    fn from(e: ActuatorError) -> Self {
        Self::Actuator(e)
    }
}

// ---------------------------------------------------------------------------
// Notification errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyError {
    /// The notification service could not be reached.
    Unreachable,
    /// The service refused the message.
    Rejected,
}

impl fmt::Display for NotifyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unreachable => write!(f, "service unreachable"),
            Self::Rejected => write!(f, "message rejected"),
        }
    }
}

impl std::error::Error for NotifyError {}

impl From<NotifyError> for Error {
    fn from(e: NotifyError) -> Self {
        Self::Notify(e)
    }
}

// ---------------------------------------------------------------------------
// Data log errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataLogError {
    /// Writing or flushing the log failed.
    WriteFailed,
    /// Reading the log back failed.
    ReadFailed,
    /// The requested column is not in the header.
    UnknownColumn,
}

impl fmt::Display for DataLogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WriteFailed => write!(f, "write failed"),
            Self::ReadFailed => write!(f, "read failed"),
            Self::UnknownColumn => write!(f, "unknown column"),
        }
    }
}

impl std::error::Error for DataLogError {}

impl From<DataLogError> for Error {
    fn from(e: DataLogError) -> Self {
        Self::DataLog(e)
    }
}

// ---------------------------------------------------------------------------
// Weather (sunset source) errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeatherError {
    /// The weather service could not be reached.
    Unreachable,
    /// The response could not be parsed.
    BadResponse,
}

impl fmt::Display for WeatherError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unreachable => write!(f, "service unreachable"),
            Self::BadResponse => write!(f, "malformed response"),
        }
    }
}

impl std::error::Error for WeatherError {}

impl From<WeatherError> for Error {
    fn from(e: WeatherError) -> Self {
        Self::Weather(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
