//! Greenhouse configuration parameters
//!
//! All tunable parameters for the climate controller. Values are loaded from
//! a JSON file through the [`ConfigPort`](crate::app::ports::ConfigPort) and
//! fall back to [`GreenhouseConfig::default`] on first run.

use serde::{Deserialize, Serialize};

use crate::app::ports::ConfigError;

/// Upper bound on light readings per classifier cycle.
pub const MAX_LIGHT_SAMPLES: usize = 16;

/// Climate setpoints. Immutable for the lifetime of a run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Setpoints {
    /// Below this inside temperature (°C) the heat pad runs and the roof closes.
    pub temp_low: f32,
    /// Roof modulation centre (°C).
    pub temp_high: f32,
    /// Relative humidity (%) below which the fan is released.
    pub rh_low: f32,
    /// Relative humidity (%) above which a rising trend turns the fan on.
    pub rh_high: f32,
    /// Roof movement per actuation cycle, in percent. Must divide 100.
    pub roof_step: u8,
    /// Half-width of the hold band around `temp_high` (°C).
    pub deadband: f32,
    /// Margin above `temp_high` that triggers fan assist with the roof fully open.
    pub fan_on_delta: f32,
    /// Fan forced on above this temperature (°C), whatever else holds.
    pub extreme_heat_threshold: f32,
}

impl Default for Setpoints {
    fn default() -> Self {
        Self {
            temp_low: 15.0,
            temp_high: 25.0,
            rh_low: 40.0,
            rh_high: 70.0,
            roof_step: 25,
            deadband: 0.5,
            fan_on_delta: 2.0,
            extreme_heat_threshold: 35.0,
        }
    }
}

impl Setpoints {
    /// Check the ordering and step invariants. NaN fails every comparison.
    #[allow(clippy::neg_cmp_op_on_partial_ord)]
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.temp_low < self.temp_high) {
            return Err(ConfigError::ValidationFailed("temp_low must be below temp_high"));
        }
        if !(self.rh_low < self.rh_high) {
            return Err(ConfigError::ValidationFailed("rh_low must be below rh_high"));
        }
        if self.roof_step == 0 || self.roof_step > 100 || 100 % self.roof_step != 0 {
            return Err(ConfigError::ValidationFailed("roof_step must divide 100"));
        }
        if !(self.deadband >= 0.0) {
            return Err(ConfigError::ValidationFailed("deadband must be non-negative"));
        }
        if !(self.fan_on_delta >= 0.0) {
            return Err(ConfigError::ValidationFailed("fan_on_delta must be non-negative"));
        }
        if !self.extreme_heat_threshold.is_finite() {
            return Err(ConfigError::ValidationFailed("extreme_heat_threshold must be finite"));
        }
        Ok(())
    }

    /// Whether `position` is one of the roof positions reachable with this step.
    pub fn is_valid_roof(&self, position: u8) -> bool {
        position <= 100 && self.roof_step != 0 && position % self.roof_step == 0
    }
}

/// Task cadences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Delay between two logged samples (seconds).
    pub record_interval_secs: u32,
    /// Samples logged before the data log is flushed and actuation runs.
    pub samples_per_flush: u32,
    /// Classifier period (seconds).
    pub classifier_period_secs: u32,
    /// Number of light readings per classifier cycle.
    pub light_samples: u8,
    /// Spacing between light readings (milliseconds).
    pub light_sample_spacing_ms: u32,
    /// Local hour (0-23) of the daily sunset refresh.
    pub sunset_refresh_hour: u8,
    /// Attempts per sunset refresh before giving up until the next day.
    pub weather_retries: u8,
    /// Delay between sunset refresh attempts (seconds).
    pub weather_retry_delay_secs: u32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            record_interval_secs: 60,
            samples_per_flush: 5,
            classifier_period_secs: 30,
            light_samples: 4,
            light_sample_spacing_ms: 1000,
            sunset_refresh_hour: 3,
            weather_retries: 3,
            weather_retry_delay_secs: 10,
        }
    }
}

/// Notification gating.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertConfig {
    /// Inside temperature (°C) above which a high-temperature alert fires.
    pub high_temp_threshold: f32,
    /// Minimum spacing between two high-temperature alerts (seconds).
    pub cooldown_secs: u32,
    /// Inside temperature (°C) below which a warning is logged. Log only,
    /// no notification.
    pub low_temp_warning: f32,
    /// Forecast sunrise temperature (°C) below which a cold-night warning
    /// goes out.
    pub cold_night_threshold: f32,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            high_temp_threshold: 40.0,
            cooldown_secs: 3600,
            low_temp_warning: 5.0,
            cold_night_threshold: 15.0,
        }
    }
}

/// Core greenhouse configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GreenhouseConfig {
    pub setpoints: Setpoints,
    pub timing: TimingConfig,
    pub alerts: AlertConfig,
    /// Local offset from UTC in minutes.
    pub utc_offset_minutes: i16,
    /// Where the CSV data log lives.
    pub data_log_path: heapless::String<64>,
}

impl Default for GreenhouseConfig {
    fn default() -> Self {
        let mut data_log_path = heapless::String::new();
        // "data.csv" always fits in 64 bytes.
        let _ = data_log_path.push_str("data.csv");
        Self {
            setpoints: Setpoints::default(),
            timing: TimingConfig::default(),
            alerts: AlertConfig::default(),
            utc_offset_minutes: 0,
            data_log_path,
        }
    }
}

impl GreenhouseConfig {
    /// Reject configurations the controller cannot run with.
    ///
    /// Invalid ranges are rejected with [`ConfigError::ValidationFailed`],
    /// never silently clamped.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.setpoints.validate()?;

        let t = &self.timing;
        if t.record_interval_secs == 0 {
            return Err(ConfigError::ValidationFailed("record_interval_secs must be > 0"));
        }
        if t.samples_per_flush == 0 {
            return Err(ConfigError::ValidationFailed("samples_per_flush must be > 0"));
        }
        if t.classifier_period_secs == 0 {
            return Err(ConfigError::ValidationFailed("classifier_period_secs must be > 0"));
        }
        if t.light_samples == 0 || usize::from(t.light_samples) > MAX_LIGHT_SAMPLES {
            return Err(ConfigError::ValidationFailed("light_samples must be 1-16"));
        }
        if t.sunset_refresh_hour > 23 {
            return Err(ConfigError::ValidationFailed("sunset_refresh_hour must be 0-23"));
        }
        if t.weather_retries == 0 {
            return Err(ConfigError::ValidationFailed("weather_retries must be > 0"));
        }

        if !self.alerts.high_temp_threshold.is_finite() {
            return Err(ConfigError::ValidationFailed("high_temp_threshold must be finite"));
        }
        if !self.alerts.cold_night_threshold.is_finite() {
            return Err(ConfigError::ValidationFailed("cold_night_threshold must be finite"));
        }
        if self.utc_offset_minutes.unsigned_abs() > 18 * 60 {
            return Err(ConfigError::ValidationFailed("utc_offset_minutes out of range"));
        }
        if self.data_log_path.is_empty() {
            return Err(ConfigError::ValidationFailed("data_log_path must not be empty"));
        }
        Ok(())
    }
}
