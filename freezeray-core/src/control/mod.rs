// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Actuation
//!
//! - [`ramp`] - one-unit-per-tick setpoint ramping toward a commanded level.
//! - [`dispatcher`] - turns accepted frames into setpoint updates and framed replies.
//!
//! Concrete motor hardware sits behind the [`Actuator`] capability; any driver that can take a
//! 0–255 output level is interchangeable here.

pub mod dispatcher;
pub mod ramp;

pub use dispatcher::{Dispatcher, ReplyTerminator};
pub use ramp::{RampStatus, Setpoint, MAX_LEVEL, MIN_LEVEL};

/// A PWM-style output the ramp can drive.
pub trait Actuator {
    /// Apply `level` (0 = off, 255 = full duty) to the physical output.
    fn set_output_level(&mut self, level: u8);
}
