// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! USART abstraction layer.
//!
//! The port splits into a [`UsartRx`] that drains the receive register into a small ring each
//! poll and a [`UsartTx`] with blocking write helpers. The halves implement the core's
//! `ByteSource`/`ByteSink` capabilities, so the control cycle can borrow them independently.
//!
//! Note: When using `writeln!`, be sure to include `\r` (CR) in the format string to ensure
//! correct line endings on the terminal.

use core::fmt;
use nb::block;

use freezeray_core::io::{ByteSink, ByteSource};
use heapless::Deque;
use stm32f7xx_hal::{
    prelude::*,
    serial::{Instance, Pins, Rx, Serial, Tx},
};

/// Capacity of the software RX ring. At 9600 baud and a 10 ms tick this is several ticks of
/// headroom.
pub const RX_RING_LEN: usize = 64;

/// Receive half: hardware RX register behind a software ring.
pub struct UsartRx<U: Instance> {
    rx: Rx<U>,
    ring: Deque<u8, RX_RING_LEN>,
}

impl<U: Instance> UsartRx<U> {
    /// Drain the receive register into the ring. Call once per control tick, before the decoder
    /// runs. Reception errors (framing, overrun, noise) discard the affected byte; the frame
    /// decoder downstream resynchronizes on the next start marker.
    pub fn poll(&mut self) {
        loop {
            match self.rx.read() {
                Ok(byte) => {
                    if self.ring.push_back(byte).is_err() {
                        // Ring full: shed the oldest byte, the decoder will resync.
                        self.ring.pop_front();
                        let _ = self.ring.push_back(byte);
                    }
                }
                Err(nb::Error::WouldBlock) => return,
                Err(nb::Error::Other(_)) => {}
            }
        }
    }
}

impl<U: Instance> ByteSource for UsartRx<U> {
    #[inline]
    fn available(&self) -> usize {
        self.ring.len()
    }

    #[inline]
    fn read_byte(&mut self) -> u8 {
        self.ring.pop_front().unwrap_or(0)
    }
}

/// Transmit half with blocking helpers.
pub struct UsartTx<U: Instance> {
    tx: Tx<U>,
}

impl<U: Instance> UsartTx<U> {
    #[inline]
    pub fn write_byte(&mut self, b: u8) {
        let _ = block!(self.tx.write(b));
    }

    pub fn write_str(&mut self, s: &str) {
        for &b in s.as_bytes() {
            self.write_byte(b);
        }
    }

    /// Write string and CRLF terminator.
    #[inline]
    pub fn println(&mut self, s: &str) {
        self.write_str(s);
        self.write_str("\r\n");
    }

    /// Block until the hardware TX FIFO/drain is flushed.
    #[inline]
    pub fn flush(&mut self) {
        let _ = block!(self.tx.flush());
    }
}

impl<U: Instance> ByteSink for UsartTx<U> {
    #[inline]
    fn write_byte(&mut self, byte: u8) {
        UsartTx::write_byte(self, byte);
    }
}

// Implement `core::fmt::Write` so we can use `write!` / `writeln!` on `UsartTx`.
impl<U: Instance> fmt::Write for UsartTx<U> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        UsartTx::write_str(self, s);
        Ok(())
    }
}

/// A full-duplex port, split so RX and TX can be borrowed at the same time.
pub struct Usart<U: Instance> {
    pub rx: UsartRx<U>,
    pub tx: UsartTx<U>,
}

impl<U: Instance> Usart<U> {
    pub fn new<PINS: Pins<U>>(serial: Serial<U, PINS>) -> Self {
        let (tx, rx) = serial.split();
        Self {
            rx: UsartRx {
                rx,
                ring: Deque::new(),
            },
            tx: UsartTx { tx },
        }
    }
}
