// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # FreezeRay Core
//!
//! Protocol decoding and setpoint ramping for the FreezeRay bench controller, a serial bridge
//! between a host PC and the fan/pump motor channels of the cooling rig (plus, in the daisy-chained
//! deployment, a downstream syringe-pump controller).
//!
//! This crate is hardware-free: serial bytes come and go through the [`io`] traits and motor
//! outputs sit behind [`control::Actuator`], so the whole crate builds and tests on the host.
//! The `freezeray-fw` crate supplies the STM32 side of those traits.
//!
//! ## Crate Structure
//!
//! | Module | Purpose |
//! | ------ | -------- |
//! | [`protocol`] | Byte-at-a-time frame decoders (plain and checksummed dialects) and the relay |
//! | [`control`]  | Setpoint ramping and command dispatch |
//! | [`device`]   | The tick-driven control cycle tying decoder, dispatcher, and ramps together |
//! | [`io`]       | Byte source/sink capabilities provided by the surrounding firmware |

#![cfg_attr(not(test), no_std)]

pub mod control;
pub mod device;
pub mod io;
pub mod protocol;

#[cfg(test)]
pub(crate) mod mock;
