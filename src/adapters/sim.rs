//! Simulated greenhouse.
//!
//! A coarse lumped thermal model so the controller can run on a host with
//! no hardware attached. One shared [`SimState`] sits behind a sensor
//! handle and an actuator handle, so roof/fan/heat commands feed back into
//! the next reading.
//!
//! The model is deliberately simple: outside temperature and daylight
//! follow a 24 h sine, the inside relaxes toward the outside, sunlight
//! heats it, the roof and fan vent it and the heat pad warms it.

use std::cell::RefCell;
use std::rc::Rc;

use time::OffsetDateTime;

use crate::app::ports::{ActuatorPort, ClockPort, SensorPort};
use crate::control::EnvironmentReading;
use crate::drivers::roof_motor::motion_for;
use crate::error::{ActuatorError, SensorError};

use super::clock::SystemClock;

/// Peak midday illuminance.
const PEAK_LUX: f32 = 60_000.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimState {
    pub temp_inside: f32,
    pub rh_inside: f32,
    pub moisture: f32,
    pub roof_open: u8,
    pub fan_on: bool,
    pub heat_pad_on: bool,
    last_step: Option<OffsetDateTime>,
}

impl Default for SimState {
    fn default() -> Self {
        Self {
            temp_inside: 18.0,
            rh_inside: 60.0,
            moisture: 450.0,
            roof_open: 0,
            fan_on: false,
            heat_pad_on: false,
            last_step: None,
        }
    }
}

/// Fractional local hour of day, `0.0..24.0`.
fn hour_of(now: OffsetDateTime) -> f32 {
    f32::from(now.hour()) + f32::from(now.minute()) / 60.0
}

pub fn outside_temp(now: OffsetDateTime) -> f32 {
    let phase = (hour_of(now) - 9.0) / 24.0 * core::f32::consts::TAU;
    12.0 + 8.0 * phase.sin()
}

/// Sunlight fraction `0.0..=1.0`; zero between 18:00 and 06:00.
pub fn daylight(now: OffsetDateTime) -> f32 {
    let phase = (hour_of(now) - 6.0) / 12.0 * core::f32::consts::PI;
    phase.sin().max(0.0)
}

impl SimState {
    /// Advance the model to `now`.
    pub fn step(&mut self, now: OffsetDateTime) {
        let minutes = match self.last_step {
            Some(prev) => ((now - prev).as_seconds_f32() / 60.0).clamp(0.0, 60.0),
            None => 0.0,
        };
        self.last_step = Some(now);
        if minutes <= 0.0 {
            return;
        }

        let outside = outside_temp(now);
        let sun = daylight(now);
        let vent = f32::from(self.roof_open) / 100.0 * 0.08
            + if self.fan_on { 0.05 } else { 0.0 };

        let mut dt = 0.01 * (outside - self.temp_inside) + 0.12 * sun;
        dt -= vent * (self.temp_inside - outside).max(0.0);
        if self.heat_pad_on {
            dt += 0.08;
        }
        self.temp_inside += dt * minutes;

        let mut drh = -0.5 * dt - vent * 10.0 + 0.05;
        if self.temp_inside < outside {
            drh += 0.1;
        }
        self.rh_inside = (self.rh_inside + drh * minutes).clamp(5.0, 100.0);
        self.moisture = (self.moisture - 0.02 * minutes * (1.0 + sun)).max(200.0);
    }

    pub fn reading(&self, now: OffsetDateTime) -> EnvironmentReading {
        EnvironmentReading {
            temp_inside: self.temp_inside,
            rh_inside: self.rh_inside,
            temp_outside: outside_temp(now),
            lux: daylight(now) * PEAK_LUX,
            moisture: self.moisture,
        }
    }
}

/// Builds the sensor and actuator handles over one shared state.
pub struct SimGreenhouse {
    state: Rc<RefCell<SimState>>,
    clock: SystemClock,
    roof_step: u8,
}

impl SimGreenhouse {
    pub fn new(clock: SystemClock, roof_step: u8) -> Self {
        Self {
            state: Rc::new(RefCell::new(SimState::default())),
            clock,
            roof_step,
        }
    }

    pub fn split(self) -> (SimSensors, SimActuators) {
        (
            SimSensors {
                state: Rc::clone(&self.state),
                clock: self.clock,
            },
            SimActuators {
                state: self.state,
                roof_step: self.roof_step,
            },
        )
    }
}

pub struct SimSensors {
    state: Rc<RefCell<SimState>>,
    clock: SystemClock,
}

impl SensorPort for SimSensors {
    fn read(&mut self) -> Result<EnvironmentReading, SensorError> {
        let now = self.clock.now();
        let mut state = self.state.borrow_mut();
        state.step(now);
        Ok(state.reading(now))
    }

    fn read_lux(&mut self) -> Result<f32, SensorError> {
        Ok(daylight(self.clock.now()) * PEAK_LUX)
    }
}

pub struct SimActuators {
    state: Rc<RefCell<SimState>>,
    roof_step: u8,
}

impl SimActuators {
    pub fn state(&self) -> SimState {
        *self.state.borrow()
    }
}

impl ActuatorPort for SimActuators {
    fn move_roof(&mut self, from: u8, to: u8) -> Result<(), ActuatorError> {
        let mut state = self.state.borrow_mut();
        if motion_for(from, to, self.roof_step).is_none() || state.roof_open != from {
            return Err(ActuatorError::InvalidTransition { from, to });
        }
        state.roof_open = to;
        Ok(())
    }

    fn set_fan(&mut self, on: bool) -> Result<(), ActuatorError> {
        self.state.borrow_mut().fan_on = on;
        Ok(())
    }

    fn set_heat_pad(&mut self, on: bool) -> Result<(), ActuatorError> {
        self.state.borrow_mut().heat_pad_on = on;
        Ok(())
    }
}
