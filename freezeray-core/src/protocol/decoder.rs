// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Frame decoder for the plain ASCII dialect.
//!
//! Command syntax: `<STX> <selector> <args…> <ETX>`. One decoder instance persists per serial
//! channel and is fed one byte per call, so it can run straight off a polled UART with no
//! line buffering underneath.

use crate::protocol::messages::*;

enum State {
    SeekingStart,
    Accumulating,
}

pub struct Decoder {
    state: State,
    buf: FrameBytes,
}

impl Decoder {
    pub fn new() -> Self {
        Self {
            state: State::SeekingStart,
            buf: FrameBytes::new(),
        }
    }

    /// Process a single incoming byte. Returns `Some` once a frame terminates, whether cleanly or
    /// with an error; either way the decoder is ready for the next frame afterwards.
    ///
    /// Bytes seen before the first `STX` are discarded and can never leak into a surfaced frame.
    pub fn feed(&mut self, byte: u8) -> Option<FrameResult> {
        match self.state {
            State::SeekingStart => {
                if byte == STX {
                    self.buf.clear();
                    self.state = State::Accumulating;
                }
            }
            State::Accumulating => {
                if byte == ETX {
                    self.state = State::SeekingStart;
                    return Some(self.classify());
                }
                if self.buf.push(byte).is_err() {
                    self.state = State::SeekingStart;
                    return Some(FrameResult::FrameTooLong);
                }
            }
        }
        None
    }

    fn classify(&self) -> FrameResult {
        match self.buf.split_first() {
            Some((&selector, args)) if COMMANDS.contains(&selector) => FrameResult::Command {
                selector,
                // Infallible: args is shorter than the buffer it came from.
                args: FrameBytes::from_slice(args).unwrap_or_default(),
            },
            _ => FrameResult::Unknown(self.buf.clone()),
        }
    }
}

impl Default for Decoder {
    fn default() -> Self {
        Self::new()
    }
}
