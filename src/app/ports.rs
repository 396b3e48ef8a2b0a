//! Port traits: the hexagonal boundary between the controller and the
//! outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ EventOrchestrator (domain)
//! ```
//!
//! Driven adapters (sensors, actuators, data log, notifier, weather, clock,
//! event sinks) implement these traits. The
//! [`EventOrchestrator`](super::orchestrator::EventOrchestrator) consumes
//! them through a [`Platform`] bundle, so the domain core never touches
//! hardware or the network directly.
//!
//! All port errors are typed; callers handle every variant explicitly.

use core::future::Future;
use core::time::Duration;

use time::{Date, OffsetDateTime};

use crate::config::GreenhouseConfig;
use crate::control::{DayForecast, EnvironmentReading, SampleRecord};
use crate::error::{ActuatorError, DataLogError, NotifyError, SensorError, WeatherError};

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port: the domain calls this to obtain environment data.
pub trait SensorPort {
    /// Read every sensor once.
    fn read(&mut self) -> Result<EnvironmentReading, SensorError>;

    /// Light-only read for the classifier.
    fn read_lux(&mut self) -> Result<f32, SensorError> {
        self.read().map(|r| r.lux)
    }
}

// ───────────────────────────────────────────────────────────────
// Actuator port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port: the domain calls this to command actuators.
pub trait ActuatorPort {
    /// Move the roof one step between adjacent valid positions.
    ///
    /// Any other pair is rejected with
    /// [`ActuatorError::InvalidTransition`] and the roof does not move.
    fn move_roof(&mut self, from: u8, to: u8) -> Result<(), ActuatorError>;

    /// Switch the fan relay.
    fn set_fan(&mut self, on: bool) -> Result<(), ActuatorError>;

    /// Switch the heat pad relay.
    fn set_heat_pad(&mut self, on: bool) -> Result<(), ActuatorError>;
}

// ───────────────────────────────────────────────────────────────
// Data log port (driven adapter: domain → storage)
// ───────────────────────────────────────────────────────────────

/// Append-only sample log.
pub trait DataLogPort {
    /// Append one record. May be buffered until [`flush`](Self::flush).
    fn append(&mut self, record: &SampleRecord) -> Result<(), DataLogError>;

    /// Make every appended record durable.
    fn flush(&mut self) -> Result<(), DataLogError>;

    /// Read back one numeric column, oldest first.
    fn column(&self, name: &str) -> Result<Vec<f32>, DataLogError>;
}

// ───────────────────────────────────────────────────────────────
// Notifier port (driven adapter: domain → push notifications)
// ───────────────────────────────────────────────────────────────

/// Fire-and-forget text notification. Failures are logged by the caller
/// and never retried.
pub trait NotifierPort {
    fn send(&mut self, message: &str) -> Result<(), NotifyError>;
}

// ───────────────────────────────────────────────────────────────
// Weather port (driven adapter: network → domain)
// ───────────────────────────────────────────────────────────────

/// Daily forecast source.
pub trait WeatherPort {
    /// Sunset instant for the given local date and the forecast
    /// temperature at the following sunrise, from one fetch.
    fn forecast(&mut self, date: Date) -> Result<DayForecast, WeatherError>;
}

// ───────────────────────────────────────────────────────────────
// Clock port
// ───────────────────────────────────────────────────────────────

/// Local wall-clock time and delays. The only place tasks suspend besides
/// signal waits.
pub trait ClockPort {
    /// Current local time, carrying the local UTC offset.
    fn now(&self) -> OffsetDateTime;

    /// Suspend the calling task for `duration`.
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()>;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port. Adapters decide where they go (serial log, display,
/// telemetry uplink).
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Configuration port (driven adapter: domain ↔ persistent config)
// ───────────────────────────────────────────────────────────────

/// Loads and persists the greenhouse configuration.
///
/// Implementations MUST validate values before persisting and on load.
/// Invalid ranges are rejected with [`ConfigError::ValidationFailed`],
/// not silently clamped.
pub trait ConfigPort {
    /// Load configuration. Returns [`GreenhouseConfig::default()`] if no
    /// stored config exists.
    fn load(&self) -> Result<GreenhouseConfig, ConfigError>;

    /// Validate and persist configuration.
    fn save(&self, config: &GreenhouseConfig) -> Result<(), ConfigError>;
}

// ───────────────────────────────────────────────────────────────
// Platform bundle
// ───────────────────────────────────────────────────────────────

/// Every adapter the orchestrator needs, as associated types.
///
/// Keeps the orchestrator's signature to a single generic parameter.
pub trait Platform {
    type Sensors: SensorPort;
    type Actuators: ActuatorPort;
    type DataLog: DataLogPort;
    type Notifier: NotifierPort;
    type Weather: WeatherPort;
    type Clock: ClockPort;
    type Events: EventSink;
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`ConfigPort`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// No config found in storage (first run).
    NotFound,
    /// Stored config failed deserialization.
    Corrupted,
    /// A config field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
    /// Generic I/O error from the storage backend.
    IoError,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotFound => write!(f, "config not found"),
            Self::Corrupted => write!(f, "config corrupted"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<ConfigError> for crate::error::Error {
    fn from(e: ConfigError) -> Self {
        match e {
            ConfigError::NotFound => Self::Config("config not found"),
            ConfigError::Corrupted => Self::Config("config corrupted"),
            ConfigError::ValidationFailed(msg) => Self::Config(msg),
            ConfigError::IoError => Self::Config("config I/O error"),
        }
    }
}
