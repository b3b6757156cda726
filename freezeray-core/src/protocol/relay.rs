// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Forwarding of accepted addressed frames to a daisy-chained downstream device.
//!
//! In the syringe-pump deployment this board sits between the host and the pump controller:
//! frames accepted from upstream are re-encoded onto the downstream port. The relay keeps a
//! mirror of the last frame it sent so it can re-emit on request after a downstream reconnect,
//! and so an upstream frame identical to the mirror is not actuated twice.

use crate::io::ByteSink;
use crate::protocol::addressed::{encode_frame, AddressedFrame};

pub struct Relay {
    last: Option<AddressedFrame>,
}

impl Relay {
    pub fn new() -> Self {
        Self { last: None }
    }

    /// Forward `frame` downstream. Returns `false` (writing nothing) when the frame is identical
    /// to the one already mirrored.
    pub fn forward(&mut self, frame: &AddressedFrame, sink: &mut impl ByteSink) -> bool {
        if self.last.as_ref() == Some(frame) {
            return false;
        }
        encode_frame(frame.address, frame.sequence, &frame.payload, sink);
        self.last = Some(frame.clone());
        true
    }

    /// Re-emit the mirrored frame, e.g. after the downstream device drops and re-establishes its
    /// connection. Returns `false` when nothing has been forwarded yet.
    pub fn re_emit(&self, sink: &mut impl ByteSink) -> bool {
        match &self.last {
            Some(frame) => {
                encode_frame(frame.address, frame.sequence, &frame.payload, sink);
                true
            }
            None => false,
        }
    }

    #[inline]
    pub fn last_frame(&self) -> Option<&AddressedFrame> {
        self.last.as_ref()
    }
}

impl Default for Relay {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::CaptureSink;
    use crate::protocol::addressed::{AddressedDecoder, AddressedResult};
    use crate::protocol::messages::FrameBytes;

    fn frame(sequence: u8, payload: &[u8]) -> AddressedFrame {
        AddressedFrame {
            address: 0x21,
            sequence,
            payload: FrameBytes::from_slice(payload).unwrap(),
        }
    }

    #[test]
    fn forwarded_frame_survives_the_downstream_decoder() {
        let mut relay = Relay::new();
        let mut sink = CaptureSink::new();
        let original = frame(0x01, b"RAT 1000 UM");
        assert!(relay.forward(&original, &mut sink));

        let mut downstream = AddressedDecoder::new();
        let results: Vec<_> = sink
            .into_bytes()
            .into_iter()
            .filter_map(|b| downstream.feed(b))
            .collect();
        assert_eq!(results, vec![AddressedResult::Frame(original)]);
    }

    #[test]
    fn identical_frame_is_not_re_emitted() {
        let mut relay = Relay::new();
        let mut sink = CaptureSink::new();
        let f = frame(0x02, b"RUN");
        assert!(relay.forward(&f, &mut sink));
        assert!(!relay.forward(&f, &mut sink));
        assert_eq!(relay.last_frame(), Some(&f));
    }

    #[test]
    fn changed_frame_is_forwarded() {
        let mut relay = Relay::new();
        let mut sink = CaptureSink::new();
        assert!(relay.forward(&frame(0x02, b"RUN"), &mut sink));
        assert!(relay.forward(&frame(0x03, b"STP"), &mut sink));
    }

    #[test]
    fn re_emit_repeats_the_mirror() {
        let mut relay = Relay::new();
        let mut sink = CaptureSink::new();
        assert!(!relay.re_emit(&mut sink));
        assert!(sink.bytes().is_empty());

        relay.forward(&frame(0x04, b"STP"), &mut sink);
        let after_forward = sink.bytes().len();
        assert!(relay.re_emit(&mut sink));
        assert_eq!(sink.bytes().len(), after_forward * 2);
    }
}
