//! Notification gating: cooldown for high-temperature alerts, once per
//! local day for goodnight and the cold-night warning.

use time::{Date, Duration, OffsetDateTime};

use crate::config::AlertConfig;

/// Alert bookkeeping. Only mutated when an alert fires.
#[derive(Debug, Clone, PartialEq)]
pub struct AlertGate {
    threshold: f32,
    cooldown: Duration,
    cold_night_threshold: f32,
    last_high_temp_alert: Option<OffsetDateTime>,
    last_goodnight_date: Option<Date>,
    last_cold_night_date: Option<Date>,
}

impl AlertGate {
    pub fn new(config: &AlertConfig) -> Self {
        Self {
            threshold: config.high_temp_threshold,
            cooldown: Duration::seconds(i64::from(config.cooldown_secs)),
            cold_night_threshold: config.cold_night_threshold,
            last_high_temp_alert: None,
            last_goodnight_date: None,
            last_cold_night_date: None,
        }
    }

    /// Returns `true` (and records `now`) when a high-temperature alert
    /// should go out.
    pub fn check_high_temp(&mut self, temp_inside: f32, now: OffsetDateTime) -> bool {
        if temp_inside <= self.threshold || temp_inside.is_nan() {
            return false;
        }
        let cooled_down = self
            .last_high_temp_alert
            .is_none_or(|last| now - last > self.cooldown);
        if cooled_down {
            self.last_high_temp_alert = Some(now);
        }
        cooled_down
    }

    /// Returns `true` (and records `today`) the first time it is night on
    /// a given local date.
    pub fn check_goodnight(&mut self, is_night: bool, today: Date) -> bool {
        if !is_night || self.last_goodnight_date == Some(today) {
            return false;
        }
        self.last_goodnight_date = Some(today);
        true
    }

    /// Returns `true` (and records `today`) when the forecast sunrise
    /// temperature is below the cold-night threshold, at most once per
    /// local date.
    pub fn check_cold_night(&mut self, temp_at_sunrise: f32, today: Date) -> bool {
        let cold = temp_at_sunrise < self.cold_night_threshold;
        if !cold || self.last_cold_night_date == Some(today) {
            return false;
        }
        self.last_cold_night_date = Some(today);
        true
    }

    pub fn last_high_temp_alert(&self) -> Option<OffsetDateTime> {
        self.last_high_temp_alert
    }

    pub fn last_goodnight_date(&self) -> Option<Date> {
        self.last_goodnight_date
    }

    pub fn last_cold_night_date(&self) -> Option<Date> {
        self.last_cold_night_date
    }
}
