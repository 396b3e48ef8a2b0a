//! Roof vent motor driver (two DC motors on H-bridges).
//!
//! The vent is lifted by two motors mounted mirror-image, so they are
//! always driven in opposite directions. Each channel is a PWM speed input
//! plus a digital direction pin.
//!
//! ## Motion table
//!
//! Only single steps between adjacent valid positions are accepted.
//! Opening runs at 75% duty for longer the higher the roof already is
//! (the vent gets heavier to lift); closing runs at 35% for a fixed time.
//!
//! | move (step 25)  | duty | duration |
//! |-----------------|------|----------|
//! | 0 → 25          | 75%  | 300 ms   |
//! | 25 → 50         | 75%  | 450 ms   |
//! | 50 → 75         | 75%  | 600 ms   |
//! | 75 → 100        | 75%  | 750 ms   |
//! | any step down   | 35%  | 300 ms   |
//!
//! ## Safety contract
//!
//! Both motors are stopped after every move, including a failed one.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use embedded_hal::pwm::SetDutyCycle;
use log::{debug, info};

use crate::error::ActuatorError;

const OPEN_DUTY_PERCENT: u8 = 75;
const CLOSE_DUTY_PERCENT: u8 = 35;
const OPEN_BASE_MS: u32 = 300;
const OPEN_INCREMENT_MS: u32 = 150;
const CLOSE_MS: u32 = 300;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Open,
    Close,
}

impl Direction {
    const fn reversed(self) -> Self {
        match self {
            Self::Open => Self::Close,
            Self::Close => Self::Open,
        }
    }
}

/// One entry of the motion table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Motion {
    pub direction: Direction,
    pub duty_percent: u8,
    pub duration_ms: u32,
}

/// Look up the motion for `from → to` with the given roof step.
///
/// `None` unless both are valid positions exactly one step apart.
pub fn motion_for(from: u8, to: u8, step: u8) -> Option<Motion> {
    let valid = |p: u8| step != 0 && p <= 100 && p % step == 0;
    if !valid(from) || !valid(to) {
        return None;
    }
    if to > from && to - from == step {
        let index = u32::from(from / step);
        Some(Motion {
            direction: Direction::Open,
            duty_percent: OPEN_DUTY_PERCENT,
            duration_ms: OPEN_BASE_MS + OPEN_INCREMENT_MS * index,
        })
    } else if from > to && from - to == step {
        Some(Motion {
            direction: Direction::Close,
            duty_percent: CLOSE_DUTY_PERCENT,
            duration_ms: CLOSE_MS,
        })
    } else {
        None
    }
}

// ───────────────────────────────────────────────────────────────
// H-bridge channel
// ───────────────────────────────────────────────────────────────

/// One motor channel: PWM speed plus direction pin.
pub struct HBridge<P, D> {
    pwm: P,
    dir: D,
}

impl<P: SetDutyCycle, D: OutputPin> HBridge<P, D> {
    pub fn new(pwm: P, dir: D) -> Self {
        Self { pwm, dir }
    }

    fn drive(&mut self, direction: Direction, duty_percent: u8) -> Result<(), ActuatorError> {
        match direction {
            Direction::Open => self.dir.set_high(),
            Direction::Close => self.dir.set_low(),
        }
        .map_err(|_| ActuatorError::GpioWriteFailed)?;
        self.pwm
            .set_duty_cycle_percent(duty_percent)
            .map_err(|_| ActuatorError::PwmWriteFailed)
    }

    fn stop(&mut self) -> Result<(), ActuatorError> {
        self.pwm
            .set_duty_cycle_fully_off()
            .map_err(|_| ActuatorError::PwmWriteFailed)
    }
}

// ───────────────────────────────────────────────────────────────
// Roof motor
// ───────────────────────────────────────────────────────────────

pub struct RoofMotor<P, D, T> {
    left: HBridge<P, D>,
    right: HBridge<P, D>,
    delay: T,
    step: u8,
}

impl<P, D, T> RoofMotor<P, D, T>
where
    P: SetDutyCycle,
    D: OutputPin,
    T: DelayNs,
{
    pub fn new(left: HBridge<P, D>, right: HBridge<P, D>, delay: T, step: u8) -> Self {
        Self {
            left,
            right,
            delay,
            step,
        }
    }

    /// Move one step. Rejects anything not in the motion table without
    /// touching the motors.
    pub fn move_step(&mut self, from: u8, to: u8) -> Result<(), ActuatorError> {
        let Some(motion) = motion_for(from, to, self.step) else {
            info!("Roof move {}% -> {}% rejected, not actuated", from, to);
            return Err(ActuatorError::InvalidTransition { from, to });
        };
        debug!(
            "Roof {}% -> {}%: {:?} at {}% for {} ms",
            from, to, motion.direction, motion.duty_percent, motion.duration_ms
        );

        let run = self.run(motion);
        let stop = self.stop();
        run.and(stop)
    }

    fn run(&mut self, motion: Motion) -> Result<(), ActuatorError> {
        self.left.drive(motion.direction, motion.duty_percent)?;
        self.right
            .drive(motion.direction.reversed(), motion.duty_percent)?;
        self.delay.delay_ms(motion.duration_ms);
        Ok(())
    }

    /// Stop both channels; both are attempted even if the first fails.
    fn stop(&mut self) -> Result<(), ActuatorError> {
        let left = self.left.stop();
        let right = self.right.stop();
        left.and(right)
    }
}
