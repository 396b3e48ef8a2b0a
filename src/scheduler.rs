//! Daily wall-clock scheduling.
//!
//! The sunset refresh runs once a day at a fixed local hour. Tasks sleep
//! on the clock port for the delay computed here rather than polling.
//!
//! ```text
//!   now ──▶ DailySchedule::delay_from(now) ──▶ clock.sleep(delay) ──▶ fire
//! ```

use time::{Duration, OffsetDateTime, Time};

// ═══════════════════════════════════════════════════════════════
//  Daily schedule
// ═══════════════════════════════════════════════════════════════

/// Fires once per day at the top of a local hour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailySchedule {
    /// Local hour (0-23).
    hour: u8,
}

impl DailySchedule {
    /// Hours past 23 wrap into the day.
    pub const fn at_hour(hour: u8) -> Self {
        Self { hour: hour % 24 }
    }

    /// The next firing strictly after `now`, in `now`'s offset.
    ///
    /// At exactly the scheduled hour the next firing is tomorrow's.
    pub fn next_after(&self, now: OffsetDateTime) -> OffsetDateTime {
        let at = Time::from_hms(self.hour, 0, 0).unwrap_or(Time::MIDNIGHT);
        let today = now.replace_time(at);
        if now.hour() >= self.hour {
            today + Duration::days(1)
        } else {
            today
        }
    }

    /// How long to sleep from `now` until the next firing.
    pub fn delay_from(&self, now: OffsetDateTime) -> core::time::Duration {
        let delta = self.next_after(now) - now;
        core::time::Duration::try_from(delta).unwrap_or(core::time::Duration::ZERO)
    }
}

/// Whole seconds from `now` until the next occurrence of local `hour`.
///
/// Past (or at) `hour` today, counts to `hour` tomorrow. Sub-second
/// precision is dropped, so the result is at most 86 400.
pub fn seconds_until(hour: u8, now: OffsetDateTime) -> u32 {
    let now = now.replace_nanosecond(0).unwrap_or(now);
    let delta = DailySchedule::at_hour(hour).next_after(now) - now;
    delta.whole_seconds().clamp(0, 86_400) as u32
}
