// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Setpoint ramping.
//!
//! Output levels never jump: every control tick moves the level one unit toward the target, so a
//! full-range change takes 255 ticks at the fixed tick period. The bounded slew rate keeps the fan
//! and pump free of torque and flow transients regardless of how large a step the host commands.
//! The cost — convergence time proportional to the size of the step — is deliberate.

use crate::control::Actuator;

pub const MIN_LEVEL: u8 = 0;
pub const MAX_LEVEL: u8 = 255;

/// Result of one ramp tick.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RampStatus {
    /// Already at the target; the hardware was not touched.
    Converged,
    /// Moved one unit toward the target and wrote the new level out.
    Stepping,
}

/// Commanded vs. applied level for one actuator.
///
/// `current` is only ever moved by [`advance`](Self::advance); `target` only by the dispatcher
/// through [`set_target`](Self::set_target). Both start at [`MIN_LEVEL`], matching the motors at
/// power-on.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Setpoint {
    current: u8,
    target: u8,
}

impl Setpoint {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn current(&self) -> u8 {
        self.current
    }

    #[inline]
    pub fn target(&self) -> u8 {
        self.target
    }

    /// Command a new target level. Idempotent: re-commanding the current level is a no-op ramp,
    /// not an error.
    #[inline]
    pub fn set_target(&mut self, level: u8) {
        self.target = level;
    }

    #[inline]
    pub fn is_converged(&self) -> bool {
        self.current == self.target
    }

    /// Move one unit toward the target and write the new level to `out`. Converged setpoints
    /// perform no hardware write at all.
    pub fn advance(&mut self, out: &mut impl Actuator) -> RampStatus {
        if self.current == self.target {
            return RampStatus::Converged;
        }
        self.current = if self.target > self.current {
            self.current + 1
        } else {
            self.current - 1
        };
        out.set_output_level(self.current);
        RampStatus::Stepping
    }
}
