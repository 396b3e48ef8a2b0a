//! Level-triggered signals coupling the controller tasks.
//!
//! Each signal is a single slot: `signal()` sets it, `wait().await`
//! consumes it, and repeated sets before a wait collapse into one wake.
//! No payload travels with a signal; the data lives in the shared
//! [`GreenhouseContext`](crate::app::context::GreenhouseContext).
//!
//! ```text
//! ┌──────────┐ sample_complete ┌───────┐ actuator_update ┌───────────┐
//! │ sampling │────────────────▶│ flush │────────────────▶│ actuation │
//! └──────────┘                 └───────┘                 └─────┬─────┘
//!                                                  temp_alert │  ▲ night_close
//!                                                             ▼  │
//!                              ┌───────────┐  goodnight  ┌───────┴───┐
//!                              │ goodnight │◀────────────│   alert   │
//!                              └─────┬─────┘             └───────────┘
//!                                    └──────── night_close ──────────▶
//! ```
//!
//! All tasks share one local executor, so the no-op mutex is enough.

use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use embassy_sync::signal::Signal;

/// A payload-free, single-slot signal.
pub type Flag = Signal<NoopRawMutex, ()>;

/// The named signals of the controller.
pub struct Signals {
    /// A batch of samples has been logged.
    pub sample_complete: Flag,
    /// The data log was flushed; time for an actuation cycle.
    pub actuator_update: Flag,
    /// Actuation finished; time to check the high-temperature gate.
    pub temp_alert: Flag,
    /// Alerting finished; time to check the goodnight gate.
    pub goodnight: Flag,
    /// Goodnight fired; close the roof and stop the fan.
    pub night_close: Flag,
}

impl Signals {
    pub const fn new() -> Self {
        Self {
            sample_complete: Signal::new(),
            actuator_update: Signal::new(),
            temp_alert: Signal::new(),
            goodnight: Signal::new(),
            night_close: Signal::new(),
        }
    }
}

impl Default for Signals {
    fn default() -> Self {
        Self::new()
    }
}
