//! Outbound application events.
//!
//! The [`EventOrchestrator`](super::orchestrator::EventOrchestrator) emits
//! these through the [`EventSink`](super::ports::EventSink) port. Adapters
//! on the other side decide what to do with them: log to the console,
//! refresh a display, publish telemetry.

use time::{Date, OffsetDateTime};

use crate::control::{ActuatorState, EnvironmentReading};
use crate::error::Error;

/// Structured events emitted by the controller core.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// The orchestrator has started its tasks.
    Started,

    /// A sample was captured and logged.
    Sampled(EnvironmentReading),

    /// An actuation cycle committed new outputs.
    Actuated(ActuatorSummary),

    /// `is_night` or `cover_on` changed.
    NightCoverChanged { is_night: bool, cover_on: bool },

    /// A new sunset instant is known.
    SunsetUpdated(OffsetDateTime),

    /// A high-temperature alert went out.
    HighTempAlert { temp_inside: f32 },

    /// A cold-night warning went out for tomorrow's sunrise.
    ColdNightWarning { temp_at_sunrise: f32 },

    /// The goodnight notification went out for this date.
    Goodnight(Date),

    /// A task cycle failed; the task carries on.
    TaskFault { task: &'static str, error: Error },

    /// A task recovered after one or more failed cycles.
    TaskRecovered { task: &'static str },
}

/// The outputs of one actuation cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActuatorSummary {
    pub roof_open: u8,
    pub fan_on: bool,
    pub heat_pad_on: bool,
    pub cover_on: bool,
    /// Inside temperature the cycle acted on, if it read one.
    pub temp_inside: Option<f32>,
}

impl ActuatorSummary {
    pub fn new(state: &ActuatorState, cover_on: bool, temp_inside: Option<f32>) -> Self {
        Self {
            roof_open: state.roof_open,
            fan_on: state.fan_on,
            heat_pad_on: state.heat_pad_on,
            cover_on,
            temp_inside,
        }
    }
}
