// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Device-Specific Drivers
//!
//! Device-level drivers that sit above the raw `hw/` layer and below the control core.
//!
//! - [`motor_shield`] – Adafruit-style DC motor shield (PCA9685 PWM expander over I²C)

pub mod motor_shield;

pub use motor_shield::{DcMotor, Motor, MotorShield};
