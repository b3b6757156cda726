// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Serial Framing
//!
//! Two framing dialects share the same `STX`/`ETX` markers:
//!
//! - [`decoder`] - the plain ASCII dialect the host PC speaks to this board
//!   (`<STX> <selector> <args> <ETX>`, no checksum).
//! - [`addressed`] - the addressed dialect used on the daisy-chained instrument link
//!   (`[<SYNC>] <STX> <address> <sequence> <payload…> <ETX> <checksum>`).
//!
//! [`relay`] mirrors accepted addressed frames onto a downstream port. Both decoders are fed one
//! byte at a time and hold their own state, so they can be driven straight from a polled UART.

pub mod addressed;
pub mod decoder;
pub mod messages;
pub mod relay;

pub use addressed::{AddressedDecoder, AddressedFrame, AddressedResult};
pub use decoder::Decoder;
pub use messages::FrameResult;
pub use relay::Relay;
