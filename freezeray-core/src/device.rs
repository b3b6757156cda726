// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! The tick-driven control cycle.
//!
//! One [`Device::tick`] performs, in order: a bounded burst of byte ingestion into the decoder, at
//! most one dispatch, and one ramp advance per actuator. The caller owns the fixed inter-tick
//! delay, which bounds both the ramp slew rate and the UART polling rate. Everything here runs on
//! the single control-loop context; there is no other thread to lock against.
//!
//! Actuation commands are single-outstanding: a fan or pump command received while either ramp is
//! still stepping waits in a one-deep pending slot (further bytes simply stay in the serial
//! buffer), and the next accepted command supersedes the targets only once the ramps have
//! converged. Queries carry no side effects and are answered immediately, mid-ramp included — the
//! old firmware ramped inside the command handler and went deaf for seconds at a time, which is
//! exactly what this cycle exists to fix.

use crate::control::dispatcher::{Dispatcher, ReplyTerminator, TEMPERATURE_SENTINEL};
use crate::control::ramp::{RampStatus, Setpoint};
use crate::control::Actuator;
use crate::io::{ByteSink, ByteSource};
use crate::protocol::decoder::Decoder;
use crate::protocol::messages::{FrameResult, CMD_FAN, CMD_PUMP};

/// Upper bound on bytes pulled off the serial source in one tick.
pub const INGEST_BURST: usize = 32;

/// What one tick did, for the firmware's activity LED and logging.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TickReport {
    pub dispatched: bool,
    pub fan: RampStatus,
    pub pump: RampStatus,
}

/// Decoder state, setpoints, and the pending-command slot for one board.
///
/// Owned by the control loop and handed to [`tick`](Self::tick) together with the serial channel
/// and the two motor outputs; there is no global device singleton.
pub struct Device {
    decoder: Decoder,
    dispatcher: Dispatcher,
    fan: Setpoint,
    pump: Setpoint,
    pending: Option<FrameResult>,
}

impl Device {
    pub fn new(terminator: ReplyTerminator) -> Self {
        Self {
            decoder: Decoder::new(),
            dispatcher: Dispatcher::new(terminator),
            fan: Setpoint::new(),
            pump: Setpoint::new(),
            pending: None,
        }
    }

    #[inline]
    pub fn fan(&self) -> &Setpoint {
        &self.fan
    }

    #[inline]
    pub fn pump(&self) -> &Setpoint {
        &self.pump
    }

    /// Run one control cycle.
    pub fn tick(
        &mut self,
        source: &mut impl ByteSource,
        sink: &mut impl ByteSink,
        fan_out: &mut impl Actuator,
        pump_out: &mut impl Actuator,
    ) -> TickReport {
        self.ingest(source);

        let mut dispatched = false;
        if let Some(frame) = self.pending.take() {
            if self.ready_for(&frame) {
                self.dispatcher.dispatch(
                    &frame,
                    &mut self.fan,
                    &mut self.pump,
                    TEMPERATURE_SENTINEL,
                    sink,
                );
                dispatched = true;
            } else {
                self.pending = Some(frame);
            }
        }

        TickReport {
            dispatched,
            fan: self.fan.advance(fan_out),
            pump: self.pump.advance(pump_out),
        }
    }

    /// Pull bytes into the decoder until the burst budget runs out, the line goes quiet, or a
    /// frame completes. While a command is pending nothing is read; unread bytes wait in the
    /// serial buffer.
    fn ingest(&mut self, source: &mut impl ByteSource) {
        if self.pending.is_some() {
            return;
        }
        for _ in 0..INGEST_BURST {
            if source.available() == 0 {
                return;
            }
            if let Some(result) = self.decoder.feed(source.read_byte()) {
                if result == FrameResult::FrameTooLong {
                    // Decoder already reset; keep draining the line.
                    #[cfg(feature = "defmt")]
                    defmt::warn!("frame exceeded maximum length, discarded");
                    continue;
                }
                self.pending = Some(result);
                return;
            }
        }
    }

    /// Actuation commands wait for quiet ramps; everything else is served at once.
    fn ready_for(&self, frame: &FrameResult) -> bool {
        match frame {
            FrameResult::Command { selector, .. } if *selector == CMD_FAN || *selector == CMD_PUMP => {
                self.fan.is_converged() && self.pump.is_converged()
            }
            _ => true,
        }
    }
}
