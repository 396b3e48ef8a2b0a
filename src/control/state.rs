//! Shared value types passed between the tasks.

use time::OffsetDateTime;

/// One capture of the environment. No unit conversion is applied; values
/// are what the sensors reported.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnvironmentReading {
    /// Inside air temperature (°C).
    pub temp_inside: f32,
    /// Inside relative humidity (%).
    pub rh_inside: f32,
    /// Outside air temperature (°C).
    pub temp_outside: f32,
    /// Ambient light (lux).
    pub lux: f32,
    /// Soil moisture (raw sensor units).
    pub moisture: f32,
}

impl EnvironmentReading {
    /// The controller only acts on finite inside readings.
    pub fn is_usable(&self) -> bool {
        self.temp_inside.is_finite() && self.rh_inside.is_finite()
    }
}

/// Roof, fan and heat pad outputs plus the history the next cycle needs.
///
/// Written only by the actuation task.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActuatorState {
    /// Roof opening in percent, always a multiple of the roof step.
    pub roof_open: u8,
    pub fan_on: bool,
    pub heat_pad_on: bool,
    /// Last committed roof position, the base of the next stepwise move.
    pub prev_roof: u8,
    pub prev_temp: Option<f32>,
    pub prev_rh: Option<f32>,
    /// When any output last changed.
    pub last_change_time: Option<OffsetDateTime>,
}

impl ActuatorState {
    /// Startup state: roof closed, fan and heat pad off, no history.
    pub const fn closed() -> Self {
        Self {
            roof_open: 0,
            fan_on: false,
            heat_pad_on: false,
            prev_roof: 0,
            prev_temp: None,
            prev_rh: None,
            last_change_time: None,
        }
    }

    /// Whether the three physical outputs differ between `self` and `other`.
    pub fn outputs_differ(&self, other: &Self) -> bool {
        self.roof_open != other.roof_open
            || self.fan_on != other.fan_on
            || self.heat_pad_on != other.heat_pad_on
    }
}

impl Default for ActuatorState {
    fn default() -> Self {
        Self::closed()
    }
}

/// Day-night and cover classification. Written only by the classifier.
///
/// `is_night` and `cover_on` are never both true.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NightCoverState {
    pub is_night: bool,
    pub cover_on: bool,
    /// Sunset instant the last classification was made against.
    pub sunset: Option<OffsetDateTime>,
}

/// What the weather source knows about one local date.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DayForecast {
    /// Sunset instant, if the date has one (polar day/night have none).
    pub sunset: Option<OffsetDateTime>,
    /// Forecast outside temperature (°C) at the next morning's sunrise.
    pub temp_at_sunrise: Option<f32>,
}

/// One data log row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleRecord {
    pub timestamp: OffsetDateTime,
    pub reading: EnvironmentReading,
    pub roof_open: u8,
    pub fan_on: bool,
    pub heat_pad_on: bool,
    pub cover_on: bool,
    pub is_night: bool,
}

impl SampleRecord {
    /// Column the goodnight summary reads back.
    pub const TEMP_INSIDE: &'static str = "temp_inside";

    /// Data log column names, in row order.
    pub const COLUMNS: [&'static str; 11] = [
        "timestamp",
        Self::TEMP_INSIDE,
        "rh_inside",
        "temp_outside",
        "lux",
        "moisture",
        "roof_open",
        "fan_on",
        "heat_pad_on",
        "cover_on",
        "is_night",
    ];

    pub fn new(
        timestamp: OffsetDateTime,
        reading: EnvironmentReading,
        actuators: &ActuatorState,
        night_cover: &NightCoverState,
    ) -> Self {
        Self {
            timestamp,
            reading,
            roof_open: actuators.roof_open,
            fan_on: actuators.fan_on,
            heat_pad_on: actuators.heat_pad_on,
            cover_on: night_cover.cover_on,
            is_night: night_cover.is_night,
        }
    }
}
