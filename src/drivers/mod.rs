//! Actuator drivers, generic over `embedded-hal` 1.0 traits.

pub mod relay;
pub mod roof_motor;
