//! Nunchuck wire format
//!
//! Decoding of the raw byte stream into 6-byte sample blocks and the
//! field layout of a block.

use log::trace;

use crate::nunchuck::constants::*;
use crate::nunchuck::types::Axis;

/// Reverse the device's byte whitening.
pub fn decode_byte(raw: u8) -> u8 {
    (raw ^ DECODE_KEY).wrapping_add(DECODE_KEY)
}

/// The device-side whitening, inverse of [`decode_byte`].
pub fn encode_byte(value: u8) -> u8 {
    value.wrapping_sub(DECODE_KEY) ^ DECODE_KEY
}

/// One decoded sample block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawSample(pub [u8; SAMPLE_LEN]);

impl RawSample {
    pub fn bytes(&self) -> &[u8; SAMPLE_LEN] {
        &self.0
    }

    pub fn joy_x(&self) -> u8 {
        self.0[0]
    }

    pub fn joy_y(&self) -> u8 {
        self.0[1]
    }

    /// 10-bit acceleration: 8 high bits from bytes 2..=4, 2 low bits
    /// from the status byte.
    pub fn accel(&self, axis: Axis) -> u16 {
        let high = self.0[axis.index() + 2] as u16;
        let low = (self.0[STATUS_INDEX] >> axis.low_bits_shift()) & 0b11;
        (high << 2) | low as u16
    }

    pub fn accels(&self) -> [u16; 3] {
        Axis::ALL.map(|axis| self.accel(axis))
    }

    /// Z button, active-low on the wire
    pub fn button_z(&self) -> bool {
        self.0[STATUS_INDEX] & BUTTON_Z_MASK == 0
    }

    /// C button, active-low on the wire
    pub fn button_c(&self) -> bool {
        self.0[STATUS_INDEX] & BUTTON_C_MASK == 0
    }

    /// Encode into the bytes the device would put on the wire
    pub fn to_wire(&self) -> [u8; SAMPLE_LEN] {
        self.0.map(encode_byte)
    }
}

/// Accumulates decoded bytes until a full block is present.
///
/// The write position persists across bursts, so a block split over
/// several polls is reassembled.
#[derive(Debug, Clone, Default)]
pub struct SampleBuffer {
    bytes: [u8; SAMPLE_LEN],
    cursor: usize,
}

impl SampleBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode and store one raw byte. Returns `false` when the block is
    /// already full and the byte was dropped.
    pub fn push(&mut self, raw: u8) -> bool {
        if self.is_full() {
            return false;
        }
        let decoded = decode_byte(raw);
        trace!("byte[{}]: raw=0x{:02X} decoded=0x{:02X}", self.cursor, raw, decoded);
        self.bytes[self.cursor] = decoded;
        self.cursor += 1;
        true
    }

    pub fn len(&self) -> usize {
        self.cursor
    }

    pub fn is_empty(&self) -> bool {
        self.cursor == 0
    }

    pub fn is_full(&self) -> bool {
        self.cursor == SAMPLE_LEN
    }

    /// Take the completed block and rewind, or `None` if incomplete
    pub fn take(&mut self) -> Option<RawSample> {
        if !self.is_full() {
            return None;
        }
        self.cursor = 0;
        Some(RawSample(self.bytes))
    }

    pub fn clear(&mut self) {
        self.cursor = 0;
    }
}
