// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Command dispatch.
//!
//! Accepted frames are executed against the fan and pump setpoints and answered on the reply
//! channel, framed with the same `STX` marker the host sent — so the host can run the identical
//! decoder on the response stream. Reply syntax:
//! `<STX> <selector> <data,data,…> <terminator>`, with `E,<value>` as the data of a rejected
//! setpoint command.

use crate::control::ramp::{Setpoint, MAX_LEVEL};
use crate::io::ByteSink;
use crate::protocol::messages::{FrameResult, ACK, CMD_FAN, CMD_PUMP, CMD_QUERY, ETX, STX};

/// Which byte closes a reply. Host variants differ here, so it is configuration, not a constant.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ReplyTerminator {
    Etx,
    Ack,
}

impl ReplyTerminator {
    #[inline]
    pub fn byte(self) -> u8 {
        match self {
            ReplyTerminator::Etx => ETX,
            ReplyTerminator::Ack => ACK,
        }
    }
}

/// Reported in place of a temperature reading: the sensor path is unimplemented upstream, and a
/// fabricated value must never look plausible.
pub const TEMPERATURE_SENTINEL: u8 = 0xFF;

enum ArgError {
    OutOfRange(u32),
    Unparseable,
}

pub struct Dispatcher {
    terminator: ReplyTerminator,
}

impl Dispatcher {
    pub fn new(terminator: ReplyTerminator) -> Self {
        Self { terminator }
    }

    /// Execute one accepted frame. Setpoint targets are the only state this ever mutates; every
    /// path emits exactly one framed reply, except `FrameTooLong`, which the decoder already
    /// resolved and which carries nothing to answer.
    pub fn dispatch(
        &self,
        frame: &FrameResult,
        fan: &mut Setpoint,
        pump: &mut Setpoint,
        temperature: u8,
        sink: &mut impl ByteSink,
    ) {
        match frame {
            FrameResult::Command { selector, args } => match *selector {
                CMD_FAN => self.set_level(CMD_FAN, args, fan, sink),
                CMD_PUMP => self.set_level(CMD_PUMP, args, pump, sink),
                CMD_QUERY => self.query(fan, pump, temperature, sink),
                other => self.reject(other, sink),
            },
            FrameResult::Unknown(body) => {
                self.reject(body.first().copied().unwrap_or(b'?'), sink)
            }
            FrameResult::FrameTooLong => {}
        }
    }

    /// `F<n>` / `P<n>`: parse and range-check the argument, then retarget the setpoint.
    ///
    /// An out-of-range value is rejected with an explicit `E` reply and the target left alone —
    /// silently clamping would let the operator believe a speed is in effect that is not.
    fn set_level(&self, selector: u8, args: &[u8], setpoint: &mut Setpoint, sink: &mut impl ByteSink) {
        sink.write_byte(STX);
        sink.write_byte(selector);
        match parse_level(args) {
            Ok(level) => {
                setpoint.set_target(level);
                write_decimal(sink, u32::from(level));
            }
            Err(ArgError::OutOfRange(value)) => {
                #[cfg(feature = "defmt")]
                defmt::warn!("setpoint {} out of range", value);
                sink.write_byte(b'E');
                sink.write_byte(b',');
                write_decimal(sink, value);
            }
            Err(ArgError::Unparseable) => {
                sink.write_byte(b'E');
                sink.write_byte(b',');
                for &b in strip_nul(args) {
                    sink.write_byte(b);
                }
            }
        }
        sink.write_byte(self.terminator.byte());
    }

    /// `Q`: report the applied (not commanded) levels plus the temperature sentinel. No side
    /// effects, so a query lands mid-ramp and reads the level actually in effect.
    fn query(&self, fan: &Setpoint, pump: &Setpoint, temperature: u8, sink: &mut impl ByteSink) {
        sink.write_byte(STX);
        sink.write_byte(CMD_QUERY);
        write_decimal(sink, u32::from(fan.current()));
        sink.write_byte(b',');
        write_decimal(sink, u32::from(pump.current()));
        sink.write_byte(b',');
        write_decimal(sink, u32::from(temperature));
        sink.write_byte(self.terminator.byte());
    }

    fn reject(&self, selector: u8, sink: &mut impl ByteSink) {
        sink.write_byte(STX);
        sink.write_byte(selector);
        sink.write_byte(b'E');
        sink.write_byte(self.terminator.byte());
    }
}

/// Drop the single trailing NUL the host appends for the firmware's former `atoi`.
fn strip_nul(args: &[u8]) -> &[u8] {
    match args {
        [head @ .., 0] => head,
        _ => args,
    }
}

fn parse_level(args: &[u8]) -> Result<u8, ArgError> {
    let digits = strip_nul(args);
    if digits.is_empty() {
        return Err(ArgError::Unparseable);
    }
    let mut value: u32 = 0;
    for &b in digits {
        if !b.is_ascii_digit() {
            return Err(ArgError::Unparseable);
        }
        value = value
            .saturating_mul(10)
            .saturating_add(u32::from(b - b'0'));
    }
    if value > u32::from(MAX_LEVEL) {
        return Err(ArgError::OutOfRange(value));
    }
    Ok(value as u8)
}

/// ASCII-decimal writer for reply data.
fn write_decimal(sink: &mut impl ByteSink, mut value: u32) {
    if value == 0 {
        sink.write_byte(b'0');
        return;
    }
    let mut buf = [0u8; 10];
    let mut i = buf.len();
    while value > 0 {
        i -= 1;
        buf[i] = b'0' + (value % 10) as u8;
        value /= 10;
    }
    for &b in &buf[i..] {
        sink.write_byte(b);
    }
}
