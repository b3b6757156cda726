// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Frame decoder and encoder for the checksummed, addressed dialect.
//!
//! Wire format: `[<SYNC>] <STX> <address> <sequence> <payload…> <ETX> <checksum>`, where the
//! checksum is the XOR of every byte from `STX` through `ETX` inclusive. The sequence byte carries
//! a 3-bit cyclic counter plus a repeat flag that marks retransmissions of the previous frame.
//!
//! Duplicate handling: once the far end loses its link (and with it the counter it was tracking),
//! "no new data" and "genuine duplicate" cannot be told apart. A frame whose repeat flag is set
//! and whose sequence number matches the last accepted one is therefore dropped silently — never
//! surfaced as an error, never re-executed. Dropping a legitimate repeat is the safer failure mode
//! than actuating twice on a stale command.

use crate::io::ByteSink;
use crate::protocol::messages::{FrameBytes, ETX, STX, SYNC};

/// Repeat-flag bit in the sequence byte.
pub const REPEAT_FLAG: u8 = 0x08;
/// Mask for the cyclic sequence number in the sequence byte.
pub const SEQUENCE_MASK: u8 = 0x07;

/// A validated frame from the addressed link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressedFrame {
    pub address: u8,
    /// Raw sequence byte, repeat flag included.
    pub sequence: u8,
    pub payload: FrameBytes,
}

impl AddressedFrame {
    #[inline]
    pub fn is_repeat(&self) -> bool {
        self.sequence & REPEAT_FLAG != 0
    }

    /// Cyclic sequence number with the flag bits masked off.
    #[inline]
    pub fn sequence_number(&self) -> u8 {
        self.sequence & SEQUENCE_MASK
    }
}

/// Outcome of feeding a terminating byte to the [`AddressedDecoder`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddressedResult {
    Frame(AddressedFrame),
    /// Checksum mismatch, or a body too short to hold address and sequence. The frame is
    /// discarded; the protocol is stateless per-frame, so no retry is requested.
    ChecksumError,
    /// The body outgrew the frame buffer. The partial frame is discarded.
    FrameTooLong,
}

enum State {
    SeekingStart,
    Accumulating,
    SeekingChecksum,
}

pub struct AddressedDecoder {
    state: State,
    buf: FrameBytes,
    checksum: u8,
    /// Raw sequence byte of the last accepted frame, for duplicate suppression.
    last_sequence: Option<u8>,
}

impl AddressedDecoder {
    pub fn new() -> Self {
        Self {
            state: State::SeekingStart,
            buf: FrameBytes::new(),
            checksum: 0,
            last_sequence: None,
        }
    }

    /// Process a single incoming byte. Returns `Some` when a frame terminates, cleanly or not.
    /// A silently suppressed duplicate returns `None`, same as mid-frame bytes.
    pub fn feed(&mut self, byte: u8) -> Option<AddressedResult> {
        match self.state {
            State::SeekingStart => {
                // SYNC bytes and line noise fall through here untouched.
                if byte == STX {
                    self.buf.clear();
                    self.checksum = STX;
                    self.state = State::Accumulating;
                }
            }
            State::Accumulating => {
                // Unlike the plain dialect, ETX is folded into the checksum too.
                self.checksum ^= byte;
                if byte == ETX {
                    self.state = State::SeekingChecksum;
                } else if self.buf.push(byte).is_err() {
                    self.state = State::SeekingStart;
                    return Some(AddressedResult::FrameTooLong);
                }
            }
            State::SeekingChecksum => {
                self.state = State::SeekingStart;
                return self.validate(byte);
            }
        }
        None
    }

    fn validate(&mut self, received: u8) -> Option<AddressedResult> {
        if received != self.checksum || self.buf.len() < 2 {
            return Some(AddressedResult::ChecksumError);
        }

        let frame = AddressedFrame {
            address: self.buf[0],
            sequence: self.buf[1],
            // Infallible: the slice comes out of a buffer of the same capacity.
            payload: FrameBytes::from_slice(&self.buf[2..]).unwrap_or_default(),
        };

        if frame.is_repeat() {
            if let Some(last) = self.last_sequence {
                if last & SEQUENCE_MASK == frame.sequence_number() {
                    // Retransmission of the frame we already acted on. Not an error, not a
                    // command: nothing surfaces.
                    #[cfg(feature = "defmt")]
                    defmt::trace!(
                        "suppressed duplicate frame, sequence {}",
                        frame.sequence_number()
                    );
                    return None;
                }
            }
        }

        self.last_sequence = Some(frame.sequence);
        Some(AddressedResult::Frame(frame))
    }
}

impl Default for AddressedDecoder {
    fn default() -> Self {
        Self::new()
    }
}

/// Encode one frame onto `sink`, with a leading `SYNC` so a half-synchronized receiver has a safe
/// byte to discard. `payload` must not contain the `ETX` marker; this dialect has no escaping.
pub fn encode_frame(address: u8, sequence: u8, payload: &[u8], sink: &mut impl ByteSink) {
    sink.write_byte(SYNC);
    sink.write_byte(STX);

    let mut checksum = STX;
    for &byte in [address, sequence].iter().chain(payload) {
        checksum ^= byte;
        sink.write_byte(byte);
    }

    checksum ^= ETX;
    sink.write_byte(ETX);
    sink.write_byte(checksum);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::CaptureSink;

    fn encoded(address: u8, sequence: u8, payload: &[u8]) -> Vec<u8> {
        let mut sink = CaptureSink::new();
        encode_frame(address, sequence, payload, &mut sink);
        sink.into_bytes()
    }

    fn feed_all(decoder: &mut AddressedDecoder, bytes: &[u8]) -> Vec<AddressedResult> {
        bytes.iter().filter_map(|&b| decoder.feed(b)).collect()
    }

    #[test]
    fn round_trip_recovers_the_triple() {
        let mut decoder = AddressedDecoder::new();
        let results = feed_all(&mut decoder, &encoded(0x21, 0x05, b"RUN"));
        assert_eq!(
            results,
            vec![AddressedResult::Frame(AddressedFrame {
                address: 0x21,
                sequence: 0x05,
                payload: FrameBytes::from_slice(b"RUN").unwrap(),
            })]
        );
    }

    #[test]
    fn empty_payload_round_trips() {
        let mut decoder = AddressedDecoder::new();
        let results = feed_all(&mut decoder, &encoded(0x01, 0x00, b""));
        assert_eq!(
            results,
            vec![AddressedResult::Frame(AddressedFrame {
                address: 0x01,
                sequence: 0x00,
                payload: FrameBytes::new(),
            })]
        );
    }

    #[test]
    fn single_bit_corruption_never_decodes_as_the_original() {
        let original = AddressedFrame {
            address: 0x21,
            sequence: 0x02,
            payload: FrameBytes::from_slice(b"VOL 100").unwrap(),
        };
        let clean = encoded(0x21, 0x02, b"VOL 100");

        // Flip one bit in every byte between SYNC and the trailing checksum byte. Depending on
        // which byte is hit the decoder sees a checksum mismatch, a frame that never starts, or a
        // frame that never ends — but never the original triple.
        for i in 1..clean.len() - 1 {
            for bit in 0..8 {
                let mut corrupted = clean.clone();
                corrupted[i] ^= 1 << bit;
                let mut decoder = AddressedDecoder::new();
                let results = feed_all(&mut decoder, &corrupted);
                assert!(
                    !results.contains(&AddressedResult::Frame(original.clone())),
                    "byte {i} bit {bit}: corrupted frame decoded as the original"
                );
            }
        }
    }

    #[test]
    fn corrupted_body_byte_is_a_checksum_error() {
        let mut corrupted = encoded(0x21, 0x02, b"VOL 100");
        corrupted[4] ^= 0x01; // first payload byte
        let mut decoder = AddressedDecoder::new();
        let results = feed_all(&mut decoder, &corrupted);
        assert_eq!(results, vec![AddressedResult::ChecksumError]);
    }

    #[test]
    fn repeat_flag_suppresses_exact_duplicate() {
        let frame = encoded(0x21, REPEAT_FLAG | 0x03, b"STP");
        let mut decoder = AddressedDecoder::new();

        // First transmission: repeat flag set but nothing accepted yet, so it counts as new.
        let first = feed_all(&mut decoder, &frame);
        assert!(matches!(first.as_slice(), [AddressedResult::Frame(_)]));

        // Identical retransmission: silently dropped, not an error.
        let second = feed_all(&mut decoder, &frame);
        assert!(second.is_empty());
    }

    #[test]
    fn repeat_flag_with_new_sequence_is_accepted() {
        let mut decoder = AddressedDecoder::new();
        let first = feed_all(&mut decoder, &encoded(0x21, REPEAT_FLAG | 0x03, b"STP"));
        let second = feed_all(&mut decoder, &encoded(0x21, REPEAT_FLAG | 0x04, b"STP"));
        assert!(matches!(first.as_slice(), [AddressedResult::Frame(_)]));
        assert!(matches!(second.as_slice(), [AddressedResult::Frame(_)]));
    }

    #[test]
    fn same_sequence_without_repeat_flag_is_a_new_command() {
        let frame = encoded(0x21, 0x05, b"RUN");
        let mut decoder = AddressedDecoder::new();
        let first = feed_all(&mut decoder, &frame);
        let second = feed_all(&mut decoder, &frame);
        assert!(matches!(first.as_slice(), [AddressedResult::Frame(_)]));
        assert!(matches!(second.as_slice(), [AddressedResult::Frame(_)]));
    }

    #[test]
    fn sync_byte_and_noise_are_discarded() {
        let mut bytes = vec![SYNC, SYNC, 0x7E];
        bytes.extend_from_slice(&encoded(0x10, 0x01, b"DIA 7.0"));
        let mut decoder = AddressedDecoder::new();
        let results = feed_all(&mut decoder, &bytes);
        assert!(matches!(results.as_slice(), [AddressedResult::Frame(_)]));
    }

    #[test]
    fn truncated_body_fails_validation() {
        // A checksum-correct frame with only an address byte is still malformed.
        let mut sink = CaptureSink::new();
        sink.write_byte(STX);
        let mut checksum = STX;
        checksum ^= 0x21;
        sink.write_byte(0x21);
        checksum ^= ETX;
        sink.write_byte(ETX);
        sink.write_byte(checksum);

        let mut decoder = AddressedDecoder::new();
        let results = feed_all(&mut decoder, &sink.into_bytes());
        assert_eq!(results, vec![AddressedResult::ChecksumError]);
    }

    #[test]
    fn decoder_recovers_after_checksum_error() {
        let mut corrupted = encoded(0x21, 0x01, b"RAT");
        let last = corrupted.len() - 1;
        corrupted[last] ^= 0xFF;

        let mut decoder = AddressedDecoder::new();
        let results = feed_all(&mut decoder, &corrupted);
        assert_eq!(results, vec![AddressedResult::ChecksumError]);

        let results = feed_all(&mut decoder, &encoded(0x21, 0x02, b"RAT"));
        assert!(matches!(results.as_slice(), [AddressedResult::Frame(_)]));
    }
}
