//! Greenhouse controller: host simulator entry point.
//!
//! Runs the full task graph against a simulated greenhouse.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  SimSensors     SimActuators    CsvDataLog     LogNotifier     │
//! │  (SensorPort)   (ActuatorPort)  (DataLogPort)  (NotifierPort)  │
//! │  FixedSunset    SystemClock     LogEventSink   JsonConfigStore │
//! │  (WeatherPort)  (ClockPort)     (EventSink)    (ConfigPort)    │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │              EventOrchestrator (tasks + signals)       │    │
//! │  │  climate rules · classifier · alert gate · safety      │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! └────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Usage: `greenhouse [config.json]`. Verbosity follows `RUST_LOG`.

#![deny(unused_must_use)]

use anyhow::{Context, Result};
use log::info;
use time::Time;
use time::macros::time;
use tracing_subscriber::EnvFilter;

use greenhouse::adapters::clock::SystemClock;
use greenhouse::adapters::config_file::JsonConfigStore;
use greenhouse::adapters::csv_log::CsvDataLog;
use greenhouse::adapters::log_sink::LogEventSink;
use greenhouse::adapters::notifier::LogNotifier;
use greenhouse::adapters::sim::{self, SimActuators, SimGreenhouse, SimSensors};
use greenhouse::adapters::sunset::FixedSunset;
use greenhouse::app::orchestrator::{EventOrchestrator, Ports};
use greenhouse::app::ports::{ClockPort, ConfigPort, Platform};
use greenhouse::diagnostics;

const DEFAULT_CONFIG_PATH: &str = "greenhouse.json";

/// Local sunset reported by the simulated weather source.
const SIM_SUNSET: (u8, u8) = (20, 0);

/// Local sunrise the simulated forecast temperature is taken at.
const SIM_SUNRISE: Time = time!(6:00);

struct SimPlatform;

impl Platform for SimPlatform {
    type Sensors = SimSensors;
    type Actuators = SimActuators;
    type DataLog = CsvDataLog;
    type Notifier = LogNotifier;
    type Weather = FixedSunset;
    type Clock = SystemClock;
    type Events = LogEventSink;
}

fn main() -> Result<()> {
    // ── 1. Logging ────────────────────────────────────────────
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    diagnostics::install_panic_handler();

    info!("╔══════════════════════════════════════╗");
    info!("║  Greenhouse v{}                    ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Config (missing file → defaults, invalid → refuse) ─
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
    let config = JsonConfigStore::new(&config_path)
        .load()
        .with_context(|| format!("loading config from {config_path}"))?;

    // ── 3. Adapters ───────────────────────────────────────────
    let clock = SystemClock::new(config.utc_offset_minutes).context("building clock")?;
    let (sensors, actuators) = SimGreenhouse::new(clock, config.setpoints.roof_step).split();
    let data_log = CsvDataLog::open(config.data_log_path.as_str())
        .with_context(|| format!("opening data log {}", config.data_log_path))?;
    let sunrise_temp = sim::outside_temp(clock.now().replace_time(SIM_SUNRISE));
    let weather = FixedSunset::new(SIM_SUNSET.0, SIM_SUNSET.1, clock.offset())
        .context("building sunset source")?
        .with_sunrise_temp(sunrise_temp);

    let ports = Ports::<SimPlatform> {
        sensors,
        actuators,
        data_log,
        notifier: LogNotifier::new(),
        weather,
        clock,
        events: LogEventSink::new(),
    };

    // ── 4. Run ────────────────────────────────────────────────
    let orchestrator = EventOrchestrator::new(config, ports).context("invalid configuration")?;
    info!("System ready. Entering task loop.");
    orchestrator.run();

    Ok(())
}
