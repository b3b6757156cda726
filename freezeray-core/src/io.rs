// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Byte-stream capabilities provided by the surrounding firmware.
//!
//! The core never touches a UART directly. The firmware hands the control cycle whatever
//! implements these traits — on hardware that is a USART wrapper with a small RX ring, in tests a
//! scripted buffer.

/// A readable serial channel.
pub trait ByteSource {
    /// Number of bytes ready to be read without blocking.
    fn available(&self) -> usize;

    /// Read one byte. Callers must check [`available`](Self::available) first; reading an empty
    /// source is allowed to return an arbitrary byte.
    fn read_byte(&mut self) -> u8;
}

/// A writable serial channel.
pub trait ByteSink {
    fn write_byte(&mut self, byte: u8);
}
