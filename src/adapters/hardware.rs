//! Hardware adapter: bridges the actuator drivers to the domain port.
//!
//! Owns the [`RoofMotor`] and both relays, exposing them through
//! [`ActuatorPort`]. Generic over the `embedded-hal` pin, PWM and delay
//! types so the same adapter runs on any HAL (and on mock pins in tests).

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use embedded_hal::pwm::SetDutyCycle;

use crate::app::ports::ActuatorPort;
use crate::drivers::relay::Relay;
use crate::drivers::roof_motor::RoofMotor;
use crate::error::ActuatorError;

/// Concrete adapter that combines all actuators behind the port trait.
pub struct HardwareAdapter<P, D, T, F, H> {
    roof: RoofMotor<P, D, T>,
    fan: Relay<F>,
    heat_pad: Relay<H>,
}

impl<P, D, T, F, H> HardwareAdapter<P, D, T, F, H>
where
    P: SetDutyCycle,
    D: OutputPin,
    T: DelayNs,
    F: OutputPin,
    H: OutputPin,
{
    pub fn new(roof: RoofMotor<P, D, T>, fan: Relay<F>, heat_pad: Relay<H>) -> Self {
        Self {
            roof,
            fan,
            heat_pad,
        }
    }

    pub fn fan_on(&self) -> bool {
        self.fan.is_on()
    }

    pub fn heat_pad_on(&self) -> bool {
        self.heat_pad.is_on()
    }
}

// ── ActuatorPort implementation ───────────────────────────────

impl<P, D, T, F, H> ActuatorPort for HardwareAdapter<P, D, T, F, H>
where
    P: SetDutyCycle,
    D: OutputPin,
    T: DelayNs,
    F: OutputPin,
    H: OutputPin,
{
    fn move_roof(&mut self, from: u8, to: u8) -> Result<(), ActuatorError> {
        self.roof.move_step(from, to)
    }

    fn set_fan(&mut self, on: bool) -> Result<(), ActuatorError> {
        self.fan.set(on)
    }

    fn set_heat_pad(&mut self, on: bool) -> Result<(), ActuatorError> {
        self.heat_pad.set(on)
    }
}
