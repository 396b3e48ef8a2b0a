//! On/off relay driver (fan, heat pad).
//!
//! A dumb actuator: the pin is written only when the requested state
//! differs from the last one written successfully.

use embedded_hal::digital::OutputPin;
use log::info;

use crate::error::ActuatorError;

pub struct Relay<P> {
    pin: P,
    label: &'static str,
    on: bool,
}

impl<P: OutputPin> Relay<P> {
    /// Takes the pin and drives it off.
    pub fn new(mut pin: P, label: &'static str) -> Result<Self, ActuatorError> {
        pin.set_low().map_err(|_| ActuatorError::GpioWriteFailed)?;
        Ok(Self {
            pin,
            label,
            on: false,
        })
    }

    pub fn set(&mut self, on: bool) -> Result<(), ActuatorError> {
        if on == self.on {
            return Ok(());
        }
        if on {
            self.pin.set_high()
        } else {
            self.pin.set_low()
        }
        .map_err(|_| ActuatorError::GpioWriteFailed)?;
        info!("Turning {} {}", self.label, if on { "on" } else { "off" });
        self.on = on;
        Ok(())
    }

    pub fn is_on(&self) -> bool {
        self.on
    }
}
