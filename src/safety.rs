//! Post-decision overrides.
//!
//! The climate decision is computed first; these overrides are then
//! applied on top of it by the actuation task and always win:
//!
//! 1. **Cover**: something lies over the greenhouse, so venting is
//!    pointless and the fan only stirs trapped air. Roof closed, fan off.
//! 2. **Night close**: the goodnight gate fired. Roof closed, fan off.
//!
//! Both leave the heat pad alone and move the roof step base to the
//! committed closed position.

use log::info;

use crate::control::ActuatorState;

/// Which override is being applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Override {
    Cover,
    NightClose,
}

impl Override {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Cover => "cover",
            Self::NightClose => "night close",
        }
    }

    /// Close the roof and stop the fan. Returns `true` if anything changed.
    pub fn apply(self, state: &mut ActuatorState) -> bool {
        let changed = state.roof_open != 0 || state.fan_on;
        if changed {
            info!(
                "Override {}: roof {}% -> 0%, fan {} -> off",
                self.label(),
                state.roof_open,
                if state.fan_on { "on" } else { "off" }
            );
        }
        state.roof_open = 0;
        state.prev_roof = 0;
        state.fan_on = false;
        changed
    }
}
