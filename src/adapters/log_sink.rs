//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the `log` facade (the console in the simulator). A display or
//! telemetry adapter would implement the same trait.

use log::{debug, info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`].
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

fn on_off(on: bool) -> &'static str {
    if on { "ON" } else { "OFF" }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started => {
                info!("START | greenhouse controller v{}", env!("CARGO_PKG_VERSION"));
            }
            AppEvent::Sampled(r) => {
                debug!(
                    "SAMPLE | T={:.1}\u{00b0}C RH={:.0}% | out={:.1}\u{00b0}C | lux={:.0} | moist={:.0}",
                    r.temp_inside, r.rh_inside, r.temp_outside, r.lux, r.moisture
                );
            }
            AppEvent::Actuated(a) => {
                info!(
                    "ACT | roof={}% fan={} heat={} cover={} | T={}",
                    a.roof_open,
                    on_off(a.fan_on),
                    on_off(a.heat_pad_on),
                    on_off(a.cover_on),
                    a.temp_inside
                        .map_or_else(|| "n/a".to_string(), |t| format!("{t:.1}\u{00b0}C")),
                );
            }
            AppEvent::NightCoverChanged { is_night, cover_on } => {
                info!(
                    "SKY | {} | cover={}",
                    if *is_night { "night" } else { "day" },
                    on_off(*cover_on)
                );
            }
            AppEvent::SunsetUpdated(at) => {
                info!("SUNSET | {}", at);
            }
            AppEvent::HighTempAlert { temp_inside } => {
                warn!("ALERT | high temperature {:.1}\u{00b0}C", temp_inside);
            }
            AppEvent::ColdNightWarning { temp_at_sunrise } => {
                warn!("ALERT | cold night, {:.1}\u{00b0}C at sunrise", temp_at_sunrise);
            }
            AppEvent::Goodnight(date) => {
                info!("GOODNIGHT | {}", date);
            }
            AppEvent::TaskFault { task, error } => {
                warn!("FAULT | task={} | {}", task, error);
            }
            AppEvent::TaskRecovered { task } => {
                info!("FAULT | task={} recovered", task);
            }
        }
    }
}
