// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Scripted serial endpoints and a recording actuator for the test suite.

use crate::control::Actuator;
use crate::io::{ByteSink, ByteSource};

/// A [`ByteSource`] that replays a fixed byte script.
pub struct ScriptSource {
    bytes: Vec<u8>,
    pos: usize,
}

impl ScriptSource {
    pub fn new(bytes: &[u8]) -> Self {
        Self {
            bytes: bytes.to_vec(),
            pos: 0,
        }
    }

    pub fn empty() -> Self {
        Self::new(&[])
    }

    /// Append more scripted input, as if it arrived on the wire later.
    pub fn push(&mut self, bytes: &[u8]) {
        self.bytes.extend_from_slice(bytes);
    }
}

impl ByteSource for ScriptSource {
    fn available(&self) -> usize {
        self.bytes.len() - self.pos
    }

    fn read_byte(&mut self) -> u8 {
        let byte = self.bytes.get(self.pos).copied().unwrap_or(0);
        self.pos += 1;
        byte
    }
}

/// A [`ByteSink`] that captures everything written to it.
pub struct CaptureSink {
    bytes: Vec<u8>,
}

impl CaptureSink {
    pub fn new() -> Self {
        Self { bytes: Vec::new() }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn clear(&mut self) {
        self.bytes.clear();
    }
}

impl ByteSink for CaptureSink {
    fn write_byte(&mut self, byte: u8) {
        self.bytes.push(byte);
    }
}

/// An [`Actuator`] that records every level written to it.
pub struct RecordingActuator {
    writes: Vec<u8>,
}

impl RecordingActuator {
    pub fn new() -> Self {
        Self { writes: Vec::new() }
    }

    pub fn writes(&self) -> &[u8] {
        &self.writes
    }
}

impl Actuator for RecordingActuator {
    fn set_output_level(&mut self, level: u8) {
        self.writes.push(level);
    }
}
