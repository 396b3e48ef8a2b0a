//! High-temperature alert and goodnight flows.

use time::Duration;
use time::macros::datetime;

use greenhouse::app::events::AppEvent;
use greenhouse::app::orchestrator::{TASK_ALERT, cold_night_message, high_temp_message};
use greenhouse::control::{DayForecast, NightCoverState};
use greenhouse::error::{Error, NotifyError};

use crate::mock_hw::{NOON, orchestrator, reading};

const NIGHT: NightCoverState = NightCoverState {
    is_night: true,
    cover_on: false,
    sunset: None,
};

fn actuate_at(orch: &crate::mock_hw::TestOrchestrator, temp: f32) {
    orch.sensors_mut().reading = Ok(reading(temp, 50.0));
    let _ = orch.actuate_once();
}

// ── High temperature ──────────────────────────────────────────

#[test]
fn high_temp_alert_respects_cooldown() {
    let orch = orchestrator();
    actuate_at(&orch, 41.0);

    assert_eq!(orch.alert_once(), Ok(true));
    assert_eq!(orch.notifier().messages, vec![high_temp_message(41.0)]);

    assert_eq!(orch.alert_once(), Ok(false));
    orch.clock().advance(Duration::seconds(3600));
    assert_eq!(orch.alert_once(), Ok(false));
    orch.clock().advance(Duration::seconds(1));
    assert_eq!(orch.alert_once(), Ok(true));
    assert_eq!(orch.notifier().messages.len(), 2);
}

#[test]
fn threshold_itself_does_not_alert() {
    let orch = orchestrator();
    actuate_at(&orch, 40.0);
    assert_eq!(orch.alert_once(), Ok(false));
    assert!(orch.notifier().messages.is_empty());
}

#[test]
fn no_alert_before_first_actuation() {
    let orch = orchestrator();
    assert_eq!(orch.alert_once(), Ok(false));
}

#[test]
fn alert_uses_actuation_reading_not_latest_sample() {
    let orch = orchestrator();
    actuate_at(&orch, 30.0);
    orch.sensors_mut().reading = Ok(reading(45.0, 50.0));
    orch.sample_once().unwrap();

    assert_eq!(orch.alert_once(), Ok(false));
}

#[test]
fn failed_notification_is_recorded_and_not_retried() {
    let orch = orchestrator();
    actuate_at(&orch, 42.0);
    orch.notifier_mut().fail = true;

    assert_eq!(
        orch.alert_once(),
        Err(Error::Notify(NotifyError::Unreachable))
    );
    assert_eq!(orch.context().health().failure_count(TASK_ALERT), 1);
    assert!(orch.context().alerts().last_high_temp_alert().is_some());

    orch.notifier_mut().fail = false;
    assert_eq!(orch.alert_once(), Ok(false));
    assert!(orch.notifier().messages.is_empty());
}

#[test]
fn alert_event_carries_temperature() {
    let orch = orchestrator();
    actuate_at(&orch, 43.5);
    orch.alert_once().unwrap();
    assert!(orch.events().events.iter().any(|e| matches!(
        e,
        AppEvent::HighTempAlert { temp_inside } if *temp_inside == 43.5
    )));
}

// ── Goodnight ─────────────────────────────────────────────────

#[test]
fn goodnight_waits_for_night() {
    let orch = orchestrator();
    assert_eq!(orch.goodnight_once(), Ok(false));
    assert!(!orch.context().signals().night_close.signaled());
}

#[test]
fn goodnight_once_per_date() {
    let orch = orchestrator();
    orch.context().set_night_cover(NIGHT);

    assert_eq!(orch.goodnight_once(), Ok(true));
    assert!(orch.context().signals().night_close.signaled());
    assert_eq!(orch.goodnight_once(), Ok(false));

    orch.clock().set(datetime!(2024-06-02 00:30:00 UTC));
    assert_eq!(orch.goodnight_once(), Ok(true));
    assert_eq!(orch.notifier().messages.len(), 2);
    assert_eq!(
        orch.context().alerts().last_goodnight_date(),
        Some(time::macros::date!(2024 - 06 - 02))
    );
}

#[test]
fn goodnight_summarises_logged_temperatures() {
    let orch = orchestrator();
    for t in [18.0, 30.0, 24.0] {
        orch.sensors_mut().reading = Ok(reading(t, 50.0));
        orch.sample_once().unwrap();
    }
    orch.context().set_night_cover(NIGHT);

    orch.goodnight_once().unwrap();
    assert_eq!(
        orch.notifier().messages,
        vec!["Goodnight! Inside today: high 30.0°C, low 18.0°C, average 24.0°C.".to_string()]
    );
}

#[test]
fn goodnight_without_data_is_plain() {
    let orch = orchestrator();
    orch.context().set_night_cover(NIGHT);
    orch.goodnight_once().unwrap();
    assert_eq!(orch.notifier().messages, vec!["Goodnight!".to_string()]);
}

// ── Cold night ────────────────────────────────────────────────

fn cold_forecast(temp_at_sunrise: f32) -> DayForecast {
    DayForecast {
        sunset: Some(datetime!(2024-06-01 20:45:00 UTC)),
        temp_at_sunrise: Some(temp_at_sunrise),
    }
}

#[test]
fn cold_sunrise_forecast_sends_warning() {
    let orch = orchestrator();
    orch.weather_mut().script.push_back(Ok(cold_forecast(8.0)));

    let sunset = futures_lite::future::block_on(orch.refresh_sunset()).unwrap();
    assert!(sunset.is_some());
    assert_eq!(orch.notifier().messages, vec![cold_night_message(8.0)]);
    assert_eq!(
        orch.events()
            .count(|e| matches!(e, AppEvent::ColdNightWarning { .. })),
        1
    );
    assert_eq!(
        orch.context().alerts().last_cold_night_date(),
        Some(NOON.date())
    );
}

#[test]
fn mild_sunrise_forecast_stays_quiet() {
    let orch = orchestrator();
    {
        let mut w = orch.weather_mut();
        w.script.push_back(Ok(cold_forecast(15.0)));
        w.script.push_back(Ok(cold_forecast(18.5)));
    }

    let _ = futures_lite::future::block_on(orch.refresh_sunset());
    let _ = futures_lite::future::block_on(orch.refresh_sunset());
    assert!(orch.notifier().messages.is_empty());
    assert_eq!(orch.context().alerts().last_cold_night_date(), None);
}

#[test]
fn cold_warning_goes_out_once_per_date() {
    let orch = orchestrator();
    {
        let mut w = orch.weather_mut();
        w.script.push_back(Ok(cold_forecast(5.0)));
        w.script.push_back(Ok(cold_forecast(4.0)));
        w.script.push_back(Ok(cold_forecast(6.0)));
    }

    let _ = futures_lite::future::block_on(orch.refresh_sunset());
    let _ = futures_lite::future::block_on(orch.refresh_sunset());
    assert_eq!(orch.notifier().messages.len(), 1);

    orch.clock().advance(Duration::days(1));
    let _ = futures_lite::future::block_on(orch.refresh_sunset());
    assert_eq!(orch.notifier().messages.len(), 2);
    assert_eq!(orch.notifier().messages[1], cold_night_message(6.0));
}

#[test]
fn failed_cold_warning_keeps_sunset() {
    let orch = orchestrator();
    orch.notifier_mut().fail = true;
    orch.weather_mut().script.push_back(Ok(cold_forecast(3.0)));

    let sunset = futures_lite::future::block_on(orch.refresh_sunset());
    assert_eq!(sunset, Ok(Some(datetime!(2024-06-01 20:45:00 UTC))));
    assert_eq!(orch.context().health().failure_count(TASK_ALERT), 1);
    assert!(orch.notifier().messages.is_empty());
}

// ── Full chain: actuation → alert → goodnight → night close ──

#[test]
fn hot_night_runs_whole_alert_chain() {
    let orch = orchestrator();
    {
        let mut sensors = orch.sensors_mut();
        sensors.reading = Ok(reading(41.0, 50.0));
        sensors.lux_fallback = Ok(0.0);
    }

    let stop = async {
        for _ in 0..10_000 {
            if orch.notifier().messages.len() >= 2 {
                break;
            }
            futures_lite::future::yield_now().await;
        }
    };
    orch.run_until(stop);

    let messages = orch.notifier().messages.clone();
    assert_eq!(messages[0], high_temp_message(41.0));
    assert!(messages[1].starts_with("Goodnight!"));
    assert_eq!(
        orch.context().alerts().last_goodnight_date(),
        Some(NOON.date())
    );
    assert!(orch.context().night_cover().is_night);
    let s = orch.context().actuators();
    assert_eq!(s.roof_open, 0);
    assert!(!s.fan_on);
}
