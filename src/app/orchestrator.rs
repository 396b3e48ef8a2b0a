//! Event orchestrator: the hexagonal core.
//!
//! [`EventOrchestrator`] owns the shared [`GreenhouseContext`] and every
//! port adapter. It runs the controller as independent long-running tasks
//! on one local executor, coupled only through the named
//! [`Signals`](crate::signals::Signals):
//!
//! ```text
//!  SensorPort ──▶ ┌──────────────────────────────┐ ──▶ ActuatorPort
//!                 │       EventOrchestrator       │
//!  WeatherPort ─▶ │ sampling · flush · actuation  │ ──▶ DataLogPort
//!                 │ alert · goodnight · classifier│ ──▶ NotifierPort
//!  ClockPort ───▶ │ sunset refresh                │ ──▶ EventSink
//!                 └──────────────────────────────┘
//! ```
//!
//! Each task has a synchronous `*_once` step holding all of its decision
//! logic; the async task loop only waits, calls the step and signals.
//! Port borrows never span an `.await`.
//!
//! Transient port failures are recorded in the diagnostics surface and
//! the cycle is skipped; tasks never end on them.

use core::cell::{Ref, RefCell, RefMut};
use core::future::Future;
use core::time::Duration;

use futures_lite::future;
use log::{debug, error, info, warn};
use time::OffsetDateTime;

use crate::config::{GreenhouseConfig, MAX_LIGHT_SAMPLES};
use crate::control::{
    ActuatorState, Classification, EnvironmentReading, SampleRecord, classify, decide, roof_path,
};
use crate::error::{Error, SensorError, WeatherError};
use crate::safety::Override;
use crate::scheduler::DailySchedule;
use crate::stats::{DAY_WINDOW, summarize};

use super::context::GreenhouseContext;
use super::events::{ActuatorSummary, AppEvent};
use super::ports::{
    ActuatorPort, ClockPort, ConfigError, DataLogPort, EventSink, NotifierPort, Platform,
    SensorPort, WeatherPort,
};

// ───────────────────────────────────────────────────────────────
// Task names (diagnostics keys)
// ───────────────────────────────────────────────────────────────

pub const TASK_SAMPLING: &str = "sampling";
pub const TASK_FLUSH: &str = "flush";
pub const TASK_ACTUATION: &str = "actuation";
pub const TASK_ALERT: &str = "alert";
pub const TASK_GOODNIGHT: &str = "goodnight";
pub const TASK_CLASSIFIER: &str = "classifier";
pub const TASK_SUNSET: &str = "sunset";

/// Executor queue depth: one slot per task plus headroom.
const EXECUTOR_SLOTS: usize = 16;

/// The adapters handed to the orchestrator.
pub struct Ports<P: Platform> {
    pub sensors: P::Sensors,
    pub actuators: P::Actuators,
    pub data_log: P::DataLog,
    pub notifier: P::Notifier,
    pub weather: P::Weather,
    pub clock: P::Clock,
    pub events: P::Events,
}

/// Which signal woke the actuation task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ActuationWake {
    Update,
    NightClose,
}

// ───────────────────────────────────────────────────────────────
// EventOrchestrator
// ───────────────────────────────────────────────────────────────

pub struct EventOrchestrator<P: Platform> {
    ctx: GreenhouseContext,
    sensors: RefCell<P::Sensors>,
    actuators: RefCell<P::Actuators>,
    data_log: RefCell<P::DataLog>,
    notifier: RefCell<P::Notifier>,
    weather: RefCell<P::Weather>,
    events: RefCell<P::Events>,
    clock: P::Clock,
}

impl<P: Platform> EventOrchestrator<P> {
    /// Validate the configuration and take ownership of the adapters.
    ///
    /// An invalid configuration is fatal: nothing is started.
    pub fn new(config: GreenhouseConfig, ports: Ports<P>) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            ctx: GreenhouseContext::new(config),
            sensors: RefCell::new(ports.sensors),
            actuators: RefCell::new(ports.actuators),
            data_log: RefCell::new(ports.data_log),
            notifier: RefCell::new(ports.notifier),
            weather: RefCell::new(ports.weather),
            events: RefCell::new(ports.events),
            clock: ports.clock,
        })
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Run every task until the process ends.
    pub fn run(&self) {
        self.run_until(core::future::pending::<()>());
    }

    /// Run every task until `stop` completes.
    pub fn run_until(&self, stop: impl Future<Output = ()>) {
        let executor: edge_executor::LocalExecutor<'_, EXECUTOR_SLOTS> =
            edge_executor::LocalExecutor::new();

        executor.spawn(self.sunset_task()).detach();
        executor.spawn(self.classifier_task()).detach();
        executor.spawn(self.sampling_task()).detach();
        executor.spawn(self.flush_task()).detach();
        executor.spawn(self.actuation_task()).detach();
        executor.spawn(self.alert_task()).detach();
        executor.spawn(self.goodnight_task()).detach();

        info!("Orchestrator started: 7 tasks");
        self.emit(&AppEvent::Started);

        future::block_on(executor.run(stop));
    }

    // ── Sampling ──────────────────────────────────────────────

    /// Log `samples_per_flush` samples, then raise `sample_complete`.
    pub async fn sampling_task(&self) {
        let timing = self.ctx.config().timing;
        let interval = Duration::from_secs(u64::from(timing.record_interval_secs));
        loop {
            for _ in 0..timing.samples_per_flush {
                let _ = self.sample_once();
                self.clock.sleep(interval).await;
            }
            self.ctx.signals().sample_complete.signal(());
        }
    }

    /// Read the environment once and append a record to the data log.
    pub fn sample_once(&self) -> Result<EnvironmentReading, Error> {
        let result = self.try_sample();
        self.finish(TASK_SAMPLING, result)
    }

    fn try_sample(&self) -> Result<EnvironmentReading, Error> {
        let reading = self.sensors.borrow_mut().read()?;
        let now = self.clock.now();
        self.ctx.set_latest_sample(reading);

        let record = SampleRecord::new(
            now,
            reading,
            &self.ctx.actuators(),
            &self.ctx.night_cover(),
        );
        self.data_log.borrow_mut().append(&record)?;
        self.emit(&AppEvent::Sampled(reading));
        Ok(reading)
    }

    // ── Flush ─────────────────────────────────────────────────

    pub async fn flush_task(&self) {
        loop {
            self.ctx.signals().sample_complete.wait().await;
            let _ = self.flush_once();
        }
    }

    /// Flush the data log and raise `actuator_update`.
    ///
    /// Actuation is triggered even when the flush fails; climate control
    /// does not depend on storage.
    pub fn flush_once(&self) -> Result<(), Error> {
        let result = self.data_log.borrow_mut().flush().map_err(Error::from);
        let result = self.finish(TASK_FLUSH, result);
        self.ctx.signals().actuator_update.signal(());
        result
    }

    // ── Actuation ─────────────────────────────────────────────

    /// Sole writer of the actuator state.
    pub async fn actuation_task(&self) {
        let signals = self.ctx.signals();
        loop {
            let wake = future::or(
                async {
                    signals.actuator_update.wait().await;
                    ActuationWake::Update
                },
                async {
                    signals.night_close.wait().await;
                    ActuationWake::NightClose
                },
            )
            .await;

            match wake {
                ActuationWake::Update => {
                    let _ = self.actuate_once();
                }
                ActuationWake::NightClose => {
                    let _ = self.night_close_once();
                }
            }
        }
    }

    /// One actuation cycle: fresh reading → decision → cover override →
    /// roof, fan, heat pad → `temp_alert`.
    ///
    /// A failed reading skips the cycle and leaves every output as it was.
    pub fn actuate_once(&self) -> Result<ActuatorState, Error> {
        let result = self.try_actuate();
        self.finish(TASK_ACTUATION, result)
    }

    fn try_actuate(&self) -> Result<ActuatorState, Error> {
        let reading = self.sensors.borrow_mut().read()?;
        if !reading.is_usable() {
            return Err(SensorError::OutOfRange.into());
        }
        let now = self.clock.now();
        let prev = self.ctx.actuators();
        let night_cover = self.ctx.night_cover();

        let mut target = decide(
            &self.ctx.config().setpoints,
            &prev,
            &reading,
            night_cover.is_night,
            now,
        );
        if night_cover.cover_on {
            Override::Cover.apply(&mut target);
        }

        self.ctx.set_actuation_reading(reading);
        let (committed, fault) = self.drive(&prev, &target, now);
        self.ctx.set_actuators(committed);
        debug!(
            "Actuation: roof={}% fan={} heat={} (T={:.1}°C RH={:.0}%)",
            committed.roof_open,
            committed.fan_on,
            committed.heat_pad_on,
            reading.temp_inside,
            reading.rh_inside
        );
        self.emit(&AppEvent::Actuated(ActuatorSummary::new(
            &committed,
            night_cover.cover_on,
            Some(reading.temp_inside),
        )));
        self.ctx.signals().temp_alert.signal(());

        fault.map_or(Ok(committed), Err)
    }

    /// Close the roof and stop the fan on behalf of the goodnight task.
    pub fn night_close_once(&self) -> Result<ActuatorState, Error> {
        let prev = self.ctx.actuators();
        let mut target = prev;
        Override::NightClose.apply(&mut target);

        let (committed, fault) = self.drive(&prev, &target, self.clock.now());
        self.ctx.set_actuators(committed);
        self.emit(&AppEvent::Actuated(ActuatorSummary::new(
            &committed,
            self.ctx.night_cover().cover_on,
            self.ctx.actuation_reading().map(|r| r.temp_inside),
        )));

        self.finish(TASK_ACTUATION, fault.map_or(Ok(committed), Err))
    }

    /// Drive the hardware from `prev` towards `target`.
    ///
    /// The roof is walked one adjacent step at a time; a rejected step
    /// stops the walk and the committed position is the last one reached.
    /// A failed relay keeps its previous state. Returns the committed
    /// state and the first fault, if any.
    fn drive(
        &self,
        prev: &ActuatorState,
        target: &ActuatorState,
        now: OffsetDateTime,
    ) -> (ActuatorState, Option<Error>) {
        let step = self.ctx.config().setpoints.roof_step;
        let mut committed = *target;
        let mut fault: Option<Error> = None;
        let mut hw = self.actuators.borrow_mut();

        let mut reached = prev.roof_open;
        for (from, to) in roof_path(prev.roof_open, target.roof_open, step) {
            match hw.move_roof(from, to) {
                Ok(()) => reached = to,
                Err(e) => {
                    warn!("Roof move {}% -> {}% failed: {}", from, to, e);
                    fault = Some(e.into());
                    break;
                }
            }
        }
        if reached != prev.roof_open {
            info!("Roof {}% -> {}%", prev.roof_open, reached);
        }
        committed.roof_open = reached;
        committed.prev_roof = reached;

        if let Err(e) = hw.set_fan(target.fan_on) {
            warn!("Fan relay failed: {}", e);
            committed.fan_on = prev.fan_on;
            fault.get_or_insert(e.into());
        }
        if let Err(e) = hw.set_heat_pad(target.heat_pad_on) {
            warn!("Heat pad relay failed: {}", e);
            committed.heat_pad_on = prev.heat_pad_on;
            fault.get_or_insert(e.into());
        }

        committed.last_change_time = if committed.outputs_differ(prev) {
            Some(now)
        } else {
            prev.last_change_time
        };
        (committed, fault)
    }

    // ── Alert ─────────────────────────────────────────────────

    pub async fn alert_task(&self) {
        loop {
            self.ctx.signals().temp_alert.wait().await;
            let _ = self.alert_once();
            self.ctx.signals().goodnight.signal(());
        }
    }

    /// Run the high-temperature gate against the last actuation reading.
    /// Returns whether an alert went out.
    pub fn alert_once(&self) -> Result<bool, Error> {
        let Some(reading) = self.ctx.actuation_reading() else {
            return self.finish(TASK_ALERT, Ok(false));
        };
        let temp = reading.temp_inside;
        let alerts = self.ctx.config().alerts;
        if temp < alerts.low_temp_warning {
            warn!("Low temperature warning: {:.1}°C", temp);
        }

        let now = self.clock.now();
        if !self.ctx.alerts().check_high_temp(temp, now) {
            return self.finish(TASK_ALERT, Ok(false));
        }

        warn!("High temperature alert: {:.1}°C", temp);
        self.emit(&AppEvent::HighTempAlert { temp_inside: temp });
        let result = self.notify(&high_temp_message(temp)).map(|()| true);
        self.finish(TASK_ALERT, result)
    }

    // ── Goodnight ─────────────────────────────────────────────

    pub async fn goodnight_task(&self) {
        loop {
            self.ctx.signals().goodnight.wait().await;
            let _ = self.goodnight_once();
        }
    }

    /// Fire the goodnight routine at most once per local date: ask the
    /// actuation task to close up, then send the day's summary.
    pub fn goodnight_once(&self) -> Result<bool, Error> {
        let today = self.clock.now().date();
        let is_night = self.ctx.night_cover().is_night;
        if !self.ctx.alerts().check_goodnight(is_night, today) {
            return self.finish(TASK_GOODNIGHT, Ok(false));
        }

        info!("Goodnight for {}", today);
        self.ctx.signals().night_close.signal(());
        self.emit(&AppEvent::Goodnight(today));
        let result = self.notify(&self.goodnight_message()).map(|()| true);
        self.finish(TASK_GOODNIGHT, result)
    }

    fn goodnight_message(&self) -> String {
        let temps = self.data_log.borrow().column(SampleRecord::TEMP_INSIDE);
        match temps.ok().and_then(|v| summarize(&v, DAY_WINDOW)) {
            Some(s) => format!(
                "Goodnight! Inside today: high {:.1}°C, low {:.1}°C, average {:.1}°C.",
                s.high, s.low, s.average
            ),
            None => "Goodnight!".to_string(),
        }
    }

    // ── Classifier ────────────────────────────────────────────

    /// Sole writer of the night/cover state.
    pub async fn classifier_task(&self) {
        let period = Duration::from_secs(u64::from(
            self.ctx.config().timing.classifier_period_secs,
        ));
        loop {
            self.classify_cycle().await;
            self.clock.sleep(period).await;
        }
    }

    /// Take the configured number of light samples, spaced apart, and
    /// classify them.
    pub async fn classify_cycle(&self) -> Option<Classification> {
        let timing = self.ctx.config().timing;
        let spacing = Duration::from_millis(u64::from(timing.light_sample_spacing_ms));
        let mut samples: heapless::Vec<f32, MAX_LIGHT_SAMPLES> = heapless::Vec::new();

        for i in 0..timing.light_samples {
            let read = self.sensors.borrow_mut().read_lux();
            match read {
                Ok(lux) => {
                    let _ = samples.push(lux);
                }
                Err(e) => warn!("Light read failed: {}", e),
            }
            if i + 1 < timing.light_samples {
                self.clock.sleep(spacing).await;
            }
        }
        self.classify_samples(&samples)
    }

    /// Fold one batch of light samples into the night/cover state.
    /// An empty batch (every read failed) keeps the previous state.
    pub fn classify_samples(&self, samples: &[f32]) -> Option<Classification> {
        let now = self.clock.now();
        let sunset = self.ctx.sunset();
        let Some(c) = classify(samples, now, sunset) else {
            let _ = self.finish::<()>(TASK_CLASSIFIER, Err(SensorError::Unavailable.into()));
            return None;
        };

        let mut state = self.ctx.night_cover();
        if state.update(c, sunset) {
            self.emit(&AppEvent::NightCoverChanged {
                is_night: c.is_night,
                cover_on: c.cover_on,
            });
        }
        self.ctx.set_night_cover(state);
        let _ = self.finish(TASK_CLASSIFIER, Ok(()));
        Some(c)
    }

    // ── Sunset refresh ────────────────────────────────────────

    /// Refresh at startup, then daily at the configured local hour.
    pub async fn sunset_task(&self) {
        let schedule = DailySchedule::at_hour(self.ctx.config().timing.sunset_refresh_hour);
        loop {
            let _ = self.refresh_sunset().await;
            let delay = schedule.delay_from(self.clock.now());
            debug!("Next sunset refresh in {}s", delay.as_secs());
            self.clock.sleep(delay).await;
        }
    }

    /// Fetch today's forecast with bounded retries. The sunset feeds the
    /// classifier; a cold sunrise forecast triggers the cold-night warning.
    ///
    /// When every attempt fails, a sunset left over from an earlier date is
    /// dropped so the classifier falls back to darkness alone.
    pub async fn refresh_sunset(&self) -> Result<Option<OffsetDateTime>, Error> {
        let timing = self.ctx.config().timing;
        let retry_delay = Duration::from_secs(u64::from(timing.weather_retry_delay_secs));
        let mut last_error = WeatherError::Unreachable;

        for attempt in 1..=timing.weather_retries {
            let today = self.clock.now().date();
            let fetched = self.weather.borrow_mut().forecast(today);
            match fetched {
                Ok(forecast) => {
                    let sunset = forecast.sunset;
                    self.ctx.set_sunset(sunset);
                    match sunset {
                        Some(s) => {
                            info!("Sunset for {} at {}", today, s.time());
                            self.emit(&AppEvent::SunsetUpdated(s));
                        }
                        None => info!("No sunset for {}", today),
                    }
                    if let Some(temp) = forecast.temp_at_sunrise {
                        let _ = self.cold_night_once(temp);
                    }
                    return self.finish(TASK_SUNSET, Ok(sunset));
                }
                Err(e) => {
                    warn!(
                        "Sunset fetch attempt {}/{} failed: {}",
                        attempt, timing.weather_retries, e
                    );
                    last_error = e;
                    if attempt < timing.weather_retries {
                        self.clock.sleep(retry_delay).await;
                    }
                }
            }
        }

        let today = self.clock.now().date();
        if self.ctx.sunset().is_some_and(|s| s.date() != today) {
            warn!("Dropping stale sunset; classifying on darkness alone");
            self.ctx.set_sunset(None);
        }
        self.finish(TASK_SUNSET, Err(last_error.into()))
    }

    /// Warn about a cold night ahead, at most once per local date.
    /// Returns whether a warning went out.
    pub fn cold_night_once(&self, temp_at_sunrise: f32) -> Result<bool, Error> {
        let today = self.clock.now().date();
        if !self.ctx.alerts().check_cold_night(temp_at_sunrise, today) {
            debug!("Sunrise forecast {:.1}°C, no cold-night warning", temp_at_sunrise);
            return self.finish(TASK_ALERT, Ok(false));
        }

        warn!("Cold night ahead: {:.1}°C at sunrise", temp_at_sunrise);
        self.emit(&AppEvent::ColdNightWarning { temp_at_sunrise });
        let result = self.notify(&cold_night_message(temp_at_sunrise)).map(|()| true);
        self.finish(TASK_ALERT, result)
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn context(&self) -> &GreenhouseContext {
        &self.ctx
    }

    pub fn sensors_mut(&self) -> RefMut<'_, P::Sensors> {
        self.sensors.borrow_mut()
    }

    pub fn actuators(&self) -> Ref<'_, P::Actuators> {
        self.actuators.borrow()
    }

    pub fn actuators_mut(&self) -> RefMut<'_, P::Actuators> {
        self.actuators.borrow_mut()
    }

    pub fn data_log(&self) -> Ref<'_, P::DataLog> {
        self.data_log.borrow()
    }

    pub fn data_log_mut(&self) -> RefMut<'_, P::DataLog> {
        self.data_log.borrow_mut()
    }

    pub fn notifier(&self) -> Ref<'_, P::Notifier> {
        self.notifier.borrow()
    }

    pub fn notifier_mut(&self) -> RefMut<'_, P::Notifier> {
        self.notifier.borrow_mut()
    }

    pub fn weather_mut(&self) -> RefMut<'_, P::Weather> {
        self.weather.borrow_mut()
    }

    pub fn events(&self) -> Ref<'_, P::Events> {
        self.events.borrow()
    }

    pub fn clock(&self) -> &P::Clock {
        &self.clock
    }

    // ── Internal ──────────────────────────────────────────────

    fn emit(&self, event: &AppEvent) {
        self.events.borrow_mut().emit(event);
    }

    /// Fire-and-forget: the caller records a failure, nothing retries.
    fn notify(&self, message: &str) -> Result<(), Error> {
        self.notifier
            .borrow_mut()
            .send(message)
            .map_err(Error::from)
    }

    /// Record the outcome of one task cycle in the diagnostics surface.
    fn finish<T>(&self, task: &'static str, result: Result<T, Error>) -> Result<T, Error> {
        match &result {
            Ok(_) => {
                let was_faulted = self.ctx.health().is_faulted(task);
                self.ctx.health_mut().record_success(task);
                if was_faulted {
                    self.emit(&AppEvent::TaskRecovered { task });
                }
            }
            Err(e) => {
                if e.is_transient() {
                    warn!("{} cycle skipped: {}", task, e);
                } else {
                    error!("{} failed: {}", task, e);
                }
                self.ctx.health_mut().record_failure(task);
                self.emit(&AppEvent::TaskFault { task, error: *e });
            }
        }
        result
    }
}

/// Text of the high-temperature notification.
pub fn high_temp_message(temp_inside: f32) -> String {
    format!(
        "High temperature alert! It is {:.1}°C inside the greenhouse. \
         Move the plants somewhere cooler.",
        temp_inside
    )
}

/// Text of the cold-night notification.
pub fn cold_night_message(temp_at_sunrise: f32) -> String {
    format!(
        "It's going to be chilly tonight: {:.1}°C at sunrise. \
         Put some covers over the plants.",
        temp_at_sunrise
    )
}
