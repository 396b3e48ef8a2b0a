//! Roof, fan and heat pad decision function.
//!
//! Rules are evaluated in a fixed order and later rules override earlier
//! ones:
//!
//! ```text
//!  heating ─▶ roof modulation ─▶ humidity ─▶ fan assist ─▶ extreme heat ─▶ night
//! ```
//!
//! The night override always wins. Cover and night-close overrides are
//! applied on top by [`crate::safety::Override`].

use time::OffsetDateTime;

use crate::config::Setpoints;

use super::state::{ActuatorState, EnvironmentReading};

/// Compute the next actuator state.
///
/// Pure: the result depends only on the arguments.
pub fn decide(
    sp: &Setpoints,
    prev: &ActuatorState,
    reading: &EnvironmentReading,
    is_night: bool,
    now: OffsetDateTime,
) -> ActuatorState {
    let t = reading.temp_inside;
    let rh = reading.rh_inside;

    let mut roof = prev.prev_roof;
    let mut fan = prev.fan_on;
    let mut heat;

    // ── Heating / roof modulation ─────────────────────────────
    if t < sp.temp_low {
        roof = 0;
        fan = false;
        heat = true;
    } else {
        if t > sp.temp_high + sp.deadband {
            roof = prev.prev_roof.saturating_add(sp.roof_step).min(100);
        } else if t < sp.temp_high - sp.deadband {
            roof = prev.prev_roof.saturating_sub(sp.roof_step);
        }
        heat = false;

        // ── Humidity (comfort band only) ──────────────────────
        if t <= sp.temp_high {
            let rising = prev.prev_rh.is_some_and(|p| rh > p);
            if rh > sp.rh_high && rising {
                fan = true;
            } else if rh < sp.rh_low {
                fan = false;
            }
        }
    }

    // ── Fan assist with the roof fully open ───────────────────
    if prev.roof_open == 100 || roof == 100 {
        if t > sp.temp_high + sp.fan_on_delta {
            fan = true;
        } else if t < sp.temp_high {
            fan = false;
        }
    }

    // ── Extreme heat ──────────────────────────────────────────
    if t > sp.extreme_heat_threshold {
        fan = true;
    }

    // ── Night override ────────────────────────────────────────
    if is_night {
        roof = 0;
        fan = false;
        if t < sp.temp_low - sp.deadband {
            heat = true;
        } else if t >= sp.temp_low + sp.deadband {
            heat = false;
        } else {
            heat = prev.heat_pad_on;
        }
    }

    let mut next = ActuatorState {
        roof_open: roof,
        fan_on: fan,
        heat_pad_on: heat,
        prev_roof: roof,
        prev_temp: Some(t),
        prev_rh: Some(rh),
        last_change_time: prev.last_change_time,
    };
    if next.outputs_differ(prev) {
        next.last_change_time = Some(now);
    }
    next
}

/// Single-step moves from `from` to `to`, each between adjacent positions.
///
/// Empty when the positions are equal.
pub fn roof_path(from: u8, to: u8, step: u8) -> impl Iterator<Item = (u8, u8)> {
    let step = step.max(1);
    let mut at = from;
    core::iter::from_fn(move || {
        if at == to {
            return None;
        }
        let next = if to > at {
            at.saturating_add(step).min(to)
        } else {
            at.saturating_sub(step).max(to)
        };
        let pair = (at, next);
        at = next;
        Some(pair)
    })
}
