// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Wire constants and decoded frame types for the FreezeRay command protocol.

use heapless::Vec;

/// Start-of-frame marker.
pub const STX: u8 = 0x02;
/// End-of-frame marker.
pub const ETX: u8 = 0x03;
/// Alternate reply terminator used by some host variants.
pub const ACK: u8 = 0x06;
/// Optional line-sync byte preceding `STX` on the addressed link.
pub const SYNC: u8 = 0xFF;

/// Upper bound on the body of a frame (markers and checksum excluded). Exceeding this is a
/// protocol error, never a silent wrap.
pub const MAX_FRAME_LEN: usize = 100;

// Command selectors
pub const CMD_FAN: u8 = b'F';
pub const CMD_PUMP: u8 = b'P';
pub const CMD_QUERY: u8 = b'Q';

/// Whitelist of selectors the plain-dialect decoder accepts as commands.
pub const COMMANDS: [u8; 3] = [CMD_FAN, CMD_PUMP, CMD_QUERY];

/// Bounded frame body storage.
pub type FrameBytes = Vec<u8, MAX_FRAME_LEN>;

/// Outcome of feeding a terminating byte to the plain-dialect [`Decoder`](super::Decoder).
///
/// Only fully terminated frames ever surface here; a partially received frame is invisible to the
/// caller. Errors leave the decoder back in its ready state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameResult {
    /// A frame whose selector is on the [`COMMANDS`] whitelist. `args` is exactly the body after
    /// the selector, unmodified — the host's trailing NUL (kept for its `atoi`) is passed through
    /// and stripped by the dispatcher's parser.
    Command { selector: u8, args: FrameBytes },
    /// A terminated frame with an unrecognized selector. The caller decides how to report it.
    Unknown(FrameBytes),
    /// The body outgrew [`MAX_FRAME_LEN`]. The partial frame is discarded.
    FrameTooLong,
}
