//! Shared controller state.
//!
//! One explicit context object replaces any module-level state. It is
//! owned by the orchestrator and shared by reference between the tasks of
//! a single local executor.
//!
//! | field                 | written by                       |
//! |-----------------------|----------------------------------|
//! | `actuators`           | actuation                        |
//! | `actuation_reading`   | actuation                        |
//! | `night_cover`         | classifier                       |
//! | `alerts`              | alert, goodnight, sunset refresh |
//! | `latest_sample`       | sampling                         |
//! | `sunset`              | sunset refresh                   |
//! | `health[task]`        | the named task                   |
//!
//! Interior mutability is `Cell` for `Copy` values and `RefCell` for the
//! rest. No borrow is ever held across an `.await`.

use core::cell::{Cell, RefCell};

use time::OffsetDateTime;

use crate::config::GreenhouseConfig;
use crate::control::{ActuatorState, AlertGate, EnvironmentReading, NightCoverState};
use crate::diagnostics::TaskHealth;
use crate::signals::Signals;

pub struct GreenhouseContext {
    config: GreenhouseConfig,
    signals: Signals,
    actuators: Cell<ActuatorState>,
    actuation_reading: Cell<Option<EnvironmentReading>>,
    night_cover: Cell<NightCoverState>,
    alerts: RefCell<AlertGate>,
    latest_sample: Cell<Option<EnvironmentReading>>,
    sunset: Cell<Option<OffsetDateTime>>,
    health: RefCell<TaskHealth>,
}

impl GreenhouseContext {
    /// Startup state: roof closed, outputs off, day assumed, no sunset known.
    pub fn new(config: GreenhouseConfig) -> Self {
        let alerts = AlertGate::new(&config.alerts);
        Self {
            config,
            signals: Signals::new(),
            actuators: Cell::new(ActuatorState::closed()),
            actuation_reading: Cell::new(None),
            night_cover: Cell::new(NightCoverState::default()),
            alerts: RefCell::new(alerts),
            latest_sample: Cell::new(None),
            sunset: Cell::new(None),
            health: RefCell::new(TaskHealth::new()),
        }
    }

    pub fn config(&self) -> &GreenhouseConfig {
        &self.config
    }

    pub fn signals(&self) -> &Signals {
        &self.signals
    }

    // ── Actuation ─────────────────────────────────────────────

    pub fn actuators(&self) -> ActuatorState {
        self.actuators.get()
    }

    pub fn set_actuators(&self, state: ActuatorState) {
        self.actuators.set(state);
    }

    /// The reading the last actuation cycle acted on.
    pub fn actuation_reading(&self) -> Option<EnvironmentReading> {
        self.actuation_reading.get()
    }

    pub fn set_actuation_reading(&self, reading: EnvironmentReading) {
        self.actuation_reading.set(Some(reading));
    }

    // ── Classification ────────────────────────────────────────

    pub fn night_cover(&self) -> NightCoverState {
        self.night_cover.get()
    }

    pub fn set_night_cover(&self, state: NightCoverState) {
        self.night_cover.set(state);
    }

    pub fn sunset(&self) -> Option<OffsetDateTime> {
        self.sunset.get()
    }

    pub fn set_sunset(&self, sunset: Option<OffsetDateTime>) {
        self.sunset.set(sunset);
    }

    // ── Sampling ──────────────────────────────────────────────

    pub fn latest_sample(&self) -> Option<EnvironmentReading> {
        self.latest_sample.get()
    }

    pub fn set_latest_sample(&self, reading: EnvironmentReading) {
        self.latest_sample.set(Some(reading));
    }

    // ── Alerts & health ───────────────────────────────────────

    /// Borrow the alert gate for one synchronous decision.
    pub fn alerts(&self) -> core::cell::RefMut<'_, AlertGate> {
        self.alerts.borrow_mut()
    }

    pub fn health(&self) -> core::cell::Ref<'_, TaskHealth> {
        self.health.borrow()
    }

    pub fn health_mut(&self) -> core::cell::RefMut<'_, TaskHealth> {
        self.health.borrow_mut()
    }
}
