//! Fixed-time forecast source.
//!
//! Reports the same local sunset time, and optionally the same sunrise
//! temperature, every day. Used by the simulator in place of a weather
//! service.

use time::{Date, Time, UtcOffset};

use crate::app::ports::WeatherPort;
use crate::control::DayForecast;
use crate::error::WeatherError;

#[derive(Debug, Clone, Copy)]
pub struct FixedSunset {
    at: Time,
    offset: UtcOffset,
    temp_at_sunrise: Option<f32>,
}

impl FixedSunset {
    pub fn new(hour: u8, minute: u8, offset: UtcOffset) -> Result<Self, WeatherError> {
        let at = Time::from_hms(hour, minute, 0).map_err(|_| WeatherError::BadResponse)?;
        Ok(Self {
            at,
            offset,
            temp_at_sunrise: None,
        })
    }

    /// Also report this forecast temperature (°C) at every sunrise.
    pub fn with_sunrise_temp(mut self, temp: f32) -> Self {
        self.temp_at_sunrise = Some(temp);
        self
    }
}

impl WeatherPort for FixedSunset {
    fn forecast(&mut self, date: Date) -> Result<DayForecast, WeatherError> {
        Ok(DayForecast {
            sunset: Some(date.with_time(self.at).assume_offset(self.offset)),
            temp_at_sunrise: self.temp_at_sunrise,
        })
    }
}
