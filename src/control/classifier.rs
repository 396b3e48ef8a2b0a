//! Day-night / cover classifier.
//!
//! Darkness alone is ambiguous: it is either nightfall or something lying
//! over the light sensor (a tarp, snow). The known sunset instant settles it.
//!
//! | dark | sunset known | now > sunset | is_night | cover_on |
//! |------|--------------|--------------|----------|----------|
//! | no   | any          | any          | per sunset | no     |
//! | yes  | no           | -            | yes      | no       |
//! | yes  | yes          | no           | no       | yes      |
//! | yes  | yes          | yes          | yes      | no       |

use log::info;
use time::OffsetDateTime;

use super::state::NightCoverState;

/// Result of one classifier cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub is_night: bool,
    pub cover_on: bool,
}

/// Classify one batch of light samples.
///
/// Returns `None` when no sample could be read, in which case the caller
/// keeps the previous state.
pub fn classify(
    lux_samples: &[f32],
    now: OffsetDateTime,
    sunset: Option<OffsetDateTime>,
) -> Option<Classification> {
    if lux_samples.is_empty() {
        return None;
    }
    // Dark only when the readings sum to exactly zero; a NaN reading is
    // never dark.
    let dark = lux_samples.iter().sum::<f32>() == 0.0;
    let is_night = sunset.map_or(dark, |s| now > s);
    Some(Classification {
        is_night,
        cover_on: dark && !is_night,
    })
}

impl NightCoverState {
    /// Fold a classification into the state, logging transitions.
    /// Returns `true` when `is_night` or `cover_on` changed.
    pub fn update(&mut self, c: Classification, sunset: Option<OffsetDateTime>) -> bool {
        let changed = self.is_night != c.is_night || self.cover_on != c.cover_on;
        if self.is_night != c.is_night {
            info!(
                "Classifier: {}",
                if c.is_night { "night has fallen" } else { "daytime" }
            );
        }
        if self.cover_on != c.cover_on {
            info!(
                "Classifier: cover {}",
                if c.cover_on { "detected" } else { "removed" }
            );
        }
        self.is_night = c.is_night;
        self.cover_on = c.cover_on;
        self.sunset = sunset;
        changed
    }
}
