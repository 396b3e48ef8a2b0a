//! Orchestrator task steps against mock adapters.

use time::macros::datetime;

use greenhouse::app::events::AppEvent;
use greenhouse::app::orchestrator::{
    TASK_ACTUATION, TASK_CLASSIFIER, TASK_FLUSH, TASK_SAMPLING, TASK_SUNSET,
};
use greenhouse::config::GreenhouseConfig;
use greenhouse::control::{Classification, NightCoverState};
use greenhouse::error::{ActuatorError, DataLogError, Error, SensorError, WeatherError};

use crate::mock_hw::{NOON, orchestrator, orchestrator_with, reading, sunset_only};

fn hot_cycles(orch: &crate::mock_hw::TestOrchestrator, n: usize) {
    orch.sensors_mut().reading = Ok(reading(28.0, 50.0));
    for _ in 0..n {
        orch.actuate_once().unwrap();
    }
    orch.actuators_mut().calls.clear();
}

// ── Sampling / flush ──────────────────────────────────────────

#[test]
fn sample_appends_record_with_current_outputs() {
    let orch = orchestrator();
    let r = orch.sample_once().unwrap();

    assert_eq!(r.temp_inside, 20.0);
    assert_eq!(orch.context().latest_sample(), Some(r));
    let log = orch.data_log();
    assert_eq!(log.records.len(), 1);
    assert_eq!(log.records[0].timestamp, NOON);
    assert_eq!(log.records[0].roof_open, 0);
    assert!(!log.records[0].is_night);
}

#[test]
fn sensor_failure_skips_sample_and_is_recorded() {
    let orch = orchestrator();
    orch.sensors_mut().reading = Err(SensorError::ReadFailed);

    assert_eq!(
        orch.sample_once(),
        Err(Error::Sensor(SensorError::ReadFailed))
    );
    assert!(orch.data_log().records.is_empty());
    assert_eq!(orch.context().health().failure_count(TASK_SAMPLING), 1);
    assert!(orch.events().events.iter().any(|e| matches!(
        e,
        AppEvent::TaskFault { task, .. } if *task == TASK_SAMPLING
    )));
}

#[test]
fn sampling_recovers_after_fault() {
    let orch = orchestrator();
    orch.sensors_mut().reading = Err(SensorError::Unavailable);
    let _ = orch.sample_once();
    orch.sensors_mut().reading = Ok(reading(21.0, 50.0));
    orch.sample_once().unwrap();

    assert!(!orch.context().health().is_faulted(TASK_SAMPLING));
    assert!(orch.events().events.iter().any(|e| matches!(
        e,
        AppEvent::TaskRecovered { task } if *task == TASK_SAMPLING
    )));
}

#[test]
fn flush_failure_still_triggers_actuation() {
    let orch = orchestrator();
    orch.data_log_mut().fail_flush = true;

    assert_eq!(
        orch.flush_once(),
        Err(Error::DataLog(DataLogError::WriteFailed))
    );
    assert!(orch.context().signals().actuator_update.signaled());
    assert_eq!(orch.context().health().failure_count(TASK_FLUSH), 1);
}

#[test]
fn successful_flush_triggers_actuation() {
    let orch = orchestrator();
    orch.flush_once().unwrap();
    assert_eq!(orch.data_log().flushes, 1);
    assert!(orch.context().signals().actuator_update.signaled());
}

// ── Actuation ─────────────────────────────────────────────────

#[test]
fn hot_cycle_opens_one_step() {
    let orch = orchestrator();
    orch.sensors_mut().reading = Ok(reading(27.0, 50.0));

    let state = orch.actuate_once().unwrap();
    assert_eq!(state.roof_open, 25);
    assert_eq!(state.prev_roof, 25);
    assert_eq!(state.last_change_time, Some(NOON));
    assert_eq!(orch.actuators().roof_moves(), vec![(0, 25)]);
    assert_eq!(orch.context().actuators(), state);
    assert!(orch.context().signals().temp_alert.signaled());
}

#[test]
fn sustained_heat_opens_fully_then_fan_assists() {
    let orch = orchestrator();
    orch.sensors_mut().reading = Ok(reading(28.0, 50.0));

    for expected in [25, 50, 75] {
        let s = orch.actuate_once().unwrap();
        assert_eq!(s.roof_open, expected);
        assert!(!s.fan_on);
    }
    let s = orch.actuate_once().unwrap();
    assert_eq!(s.roof_open, 100);
    assert!(s.fan_on);
    assert_eq!(orch.actuators().last_fan(), Some(true));
}

#[test]
fn cold_reading_closes_roof_stepwise_and_heats() {
    let orch = orchestrator();
    hot_cycles(&orch, 3);
    orch.sensors_mut().reading = Ok(reading(10.0, 50.0));

    let s = orch.actuate_once().unwrap();
    assert_eq!(s.roof_open, 0);
    assert!(s.heat_pad_on);
    assert!(!s.fan_on);
    assert_eq!(
        orch.actuators().roof_moves(),
        vec![(75, 50), (50, 25), (25, 0)]
    );
    assert_eq!(orch.actuators().last_heat_pad(), Some(true));
}

#[test]
fn jammed_roof_commits_last_position_reached() {
    let orch = orchestrator();
    hot_cycles(&orch, 3);
    orch.actuators_mut().jam_at = Some(50);
    orch.sensors_mut().reading = Ok(reading(10.0, 50.0));

    assert_eq!(
        orch.actuate_once(),
        Err(Error::Actuator(ActuatorError::InvalidTransition {
            from: 50,
            to: 25
        }))
    );
    let s = orch.context().actuators();
    assert_eq!(s.roof_open, 50);
    assert_eq!(s.prev_roof, 50);
    assert!(s.heat_pad_on);
    assert_eq!(orch.context().health().failure_count(TASK_ACTUATION), 1);
}

#[test]
fn failed_fan_relay_keeps_previous_fan_state() {
    let orch = orchestrator();
    orch.actuators_mut().fail_fan = true;
    orch.sensors_mut().reading = Ok(reading(36.0, 50.0));

    assert_eq!(
        orch.actuate_once(),
        Err(Error::Actuator(ActuatorError::GpioWriteFailed))
    );
    let s = orch.context().actuators();
    assert!(!s.fan_on);
    assert_eq!(s.roof_open, 25);
}

#[test]
fn unusable_reading_leaves_outputs_untouched() {
    let orch = orchestrator();
    orch.sensors_mut().reading = Ok(reading(f32::NAN, 50.0));

    assert_eq!(
        orch.actuate_once(),
        Err(Error::Sensor(SensorError::OutOfRange))
    );
    assert!(orch.actuators().calls.is_empty());
    assert!(!orch.context().signals().temp_alert.signaled());
    assert_eq!(orch.context().actuation_reading(), None);
}

#[test]
fn cover_keeps_roof_closed_and_fan_off() {
    let orch = orchestrator();
    orch.context().set_night_cover(NightCoverState {
        is_night: false,
        cover_on: true,
        sunset: None,
    });
    orch.sensors_mut().reading = Ok(reading(36.0, 50.0));

    let s = orch.actuate_once().unwrap();
    assert_eq!(s.roof_open, 0);
    assert!(!s.fan_on);
    assert!(orch.actuators().roof_moves().is_empty());
    assert!(orch.events().events.iter().any(|e| matches!(
        e,
        AppEvent::Actuated(summary) if summary.cover_on
    )));
}

#[test]
fn night_heat_pad_holds_inside_deadband() {
    let orch = orchestrator();
    orch.context().set_night_cover(NightCoverState {
        is_night: true,
        cover_on: false,
        sunset: None,
    });

    orch.sensors_mut().reading = Ok(reading(14.0, 50.0));
    assert!(orch.actuate_once().unwrap().heat_pad_on);

    orch.sensors_mut().reading = Ok(reading(15.2, 50.0));
    assert!(orch.actuate_once().unwrap().heat_pad_on);

    orch.sensors_mut().reading = Ok(reading(15.6, 50.0));
    assert!(!orch.actuate_once().unwrap().heat_pad_on);
}

#[test]
fn unchanged_outputs_keep_last_change_time() {
    let orch = orchestrator();
    orch.sensors_mut().reading = Ok(reading(27.0, 50.0));
    orch.actuate_once().unwrap();

    orch.clock().advance(time::Duration::minutes(5));
    orch.sensors_mut().reading = Ok(reading(25.2, 50.0));
    let s = orch.actuate_once().unwrap();
    assert_eq!(s.roof_open, 25);
    assert_eq!(s.last_change_time, Some(NOON));
}

#[test]
fn night_close_closes_roof_and_leaves_heat_pad() {
    let orch = orchestrator();
    hot_cycles(&orch, 2);

    let s = orch.night_close_once().unwrap();
    assert_eq!(s.roof_open, 0);
    assert_eq!(s.prev_roof, 0);
    assert!(!s.fan_on);
    assert_eq!(orch.actuators().roof_moves(), vec![(50, 25), (25, 0)]);
    assert_eq!(orch.actuators().last_heat_pad(), Some(false));
}

// ── Classifier ────────────────────────────────────────────────

#[test]
fn darkness_before_sunset_is_cover() {
    let orch = orchestrator();
    orch.context()
        .set_sunset(Some(datetime!(2024-06-01 20:30:00 UTC)));

    let c = orch.classify_samples(&[0.0; 4]).unwrap();
    assert_eq!(
        c,
        Classification {
            is_night: false,
            cover_on: true
        }
    );
    assert!(orch.context().night_cover().cover_on);
    assert!(orch.events().events.iter().any(|e| matches!(
        e,
        AppEvent::NightCoverChanged {
            is_night: false,
            cover_on: true
        }
    )));
}

#[test]
fn darkness_without_sunset_is_night() {
    let orch = orchestrator();
    let c = orch.classify_samples(&[0.0; 4]).unwrap();
    assert!(c.is_night);
    assert!(!c.cover_on);
}

#[test]
fn light_after_sunset_is_still_night() {
    let orch = orchestrator();
    orch.context()
        .set_sunset(Some(datetime!(2024-06-01 11:00:00 UTC)));
    let c = orch.classify_samples(&[0.0, 12.0, 0.0, 0.0]).unwrap();
    assert!(c.is_night);
    assert!(!c.cover_on);
}

#[test]
fn classify_cycle_spaces_reads_and_skips_failures() {
    let orch = orchestrator();
    {
        let mut sensors = orch.sensors_mut();
        sensors.lux_script.push_back(Err(SensorError::ReadFailed));
        sensors.lux_fallback = Ok(0.0);
    }

    let c = futures_lite::future::block_on(orch.classify_cycle()).unwrap();
    assert!(c.is_night);
    assert_eq!(
        *orch.clock().sleeps.borrow(),
        vec![core::time::Duration::from_millis(1000); 3]
    );
}

#[test]
fn all_light_reads_failing_keeps_previous_state() {
    let orch = orchestrator();
    let before = NightCoverState {
        is_night: true,
        cover_on: false,
        sunset: None,
    };
    orch.context().set_night_cover(before);
    orch.sensors_mut().lux_fallback = Err(SensorError::Unavailable);

    assert_eq!(futures_lite::future::block_on(orch.classify_cycle()), None);
    assert_eq!(orch.context().night_cover(), before);
    assert_eq!(orch.context().health().failure_count(TASK_CLASSIFIER), 1);
}

// ── Sunset refresh ────────────────────────────────────────────

#[test]
fn sunset_refresh_retries_until_success() {
    let orch = orchestrator();
    let sunset = datetime!(2024-06-01 20:45:00 UTC);
    {
        let mut w = orch.weather_mut();
        w.script.push_back(Err(WeatherError::Unreachable));
        w.script.push_back(Ok(sunset_only(Some(sunset))));
    }

    let got = futures_lite::future::block_on(orch.refresh_sunset()).unwrap();
    assert_eq!(got, Some(sunset));
    assert_eq!(orch.context().sunset(), Some(sunset));
    assert_eq!(orch.weather_mut().requested.len(), 2);
    assert_eq!(
        *orch.clock().sleeps.borrow(),
        vec![core::time::Duration::from_secs(10)]
    );
}

#[test]
fn failed_refresh_drops_stale_sunset() {
    let orch = orchestrator();
    orch.context()
        .set_sunset(Some(datetime!(2024-05-31 20:40:00 UTC)));

    assert_eq!(
        futures_lite::future::block_on(orch.refresh_sunset()),
        Err(Error::Weather(WeatherError::Unreachable))
    );
    assert_eq!(orch.context().sunset(), None);
    assert_eq!(orch.weather_mut().requested.len(), 3);
    assert_eq!(orch.context().health().failure_count(TASK_SUNSET), 1);
}

#[test]
fn failed_refresh_keeps_todays_sunset() {
    let orch = orchestrator();
    let today = datetime!(2024-06-01 20:40:00 UTC);
    orch.context().set_sunset(Some(today));

    let _ = futures_lite::future::block_on(orch.refresh_sunset());
    assert_eq!(orch.context().sunset(), Some(today));
}

#[test]
fn polar_day_clears_sunset() {
    let orch = orchestrator();
    orch.context()
        .set_sunset(Some(datetime!(2024-06-01 20:40:00 UTC)));
    orch.weather_mut().script.push_back(Ok(sunset_only(None)));

    assert_eq!(
        futures_lite::future::block_on(orch.refresh_sunset()),
        Ok(None)
    );
    assert_eq!(orch.context().sunset(), None);
}

// ── Full task graph ───────────────────────────────────────────

#[test]
fn samples_flow_through_flush_into_actuation() {
    let mut config = GreenhouseConfig::default();
    config.timing.samples_per_flush = 2;
    let orch = orchestrator_with(config);
    orch.sensors_mut().reading = Ok(reading(27.0, 50.0));

    let stop = async {
        for _ in 0..10_000 {
            let actuated = orch
                .events()
                .count(|e| matches!(e, AppEvent::Actuated(_)));
            if actuated > 0 {
                break;
            }
            futures_lite::future::yield_now().await;
        }
    };
    orch.run_until(stop);

    assert!(matches!(orch.events().events[0], AppEvent::Started));
    assert!(orch.data_log().records.len() >= 2);
    assert!(orch.data_log().flushes >= 1);
    assert!(orch.context().actuators().roof_open >= 25);
    assert_eq!(orch.actuators().roof_moves()[0], (0, 25));
}

#[test]
fn run_until_returns_once_every_task_is_parked() {
    let orch = orchestrator();
    orch.clock().set_sleep_budget(0);

    orch.run_until(async {});

    assert!(matches!(orch.events().events[0], AppEvent::Started));
    // Sampling logged once before parking on its first sleep.
    assert_eq!(orch.data_log().records.len(), 1);
    assert_eq!(orch.data_log().flushes, 0);
    assert!(!orch.clock().sleeps.borrow().is_empty());
}
