//! Pure decision logic: no I/O, no clocks, no logging side effects beyond
//! transition messages. Every function here is deterministic in its inputs.

pub mod alert_gate;
pub mod classifier;
pub mod climate;
pub mod state;

pub use alert_gate::AlertGate;
pub use classifier::{Classification, classify};
pub use climate::{decide, roof_path};
pub use state::{
    ActuatorState, DayForecast, EnvironmentReading, NightCoverState, SampleRecord,
};
