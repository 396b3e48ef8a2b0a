//! System clock adapter.
//!
//! Local wall-clock time from the host clock shifted by the configured UTC
//! offset; delays on the `async-io-mini` timer reactor.

use core::future::Future;
use core::time::Duration;

use time::{OffsetDateTime, UtcOffset};

use crate::app::ports::{ClockPort, ConfigError};

#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    offset: UtcOffset,
}

impl SystemClock {
    pub fn new(utc_offset_minutes: i16) -> Result<Self, ConfigError> {
        let offset = UtcOffset::from_whole_seconds(i32::from(utc_offset_minutes) * 60)
            .map_err(|_| ConfigError::ValidationFailed("utc_offset_minutes out of range"))?;
        Ok(Self { offset })
    }

    pub fn offset(&self) -> UtcOffset {
        self.offset
    }
}

impl ClockPort for SystemClock {
    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc().to_offset(self.offset)
    }

    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> {
        async move {
            async_io_mini::Timer::after(duration).await;
        }
    }
}
