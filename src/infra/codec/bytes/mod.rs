//! Little-endian field access for fixed-layout frames and the additive
//! checksum closing every HoTT response.
//!
//! HoTT frames store multi-byte values as `_L`/`_H` byte pairs, low byte
//! first. Offsets always come from the frame layout constants, so the helpers
//! index the buffer directly.

/// Write `value` at `offset` as a little-endian byte pair.
#[inline]
pub fn write_u16_le(buffer: &mut [u8], offset: usize, value: u16) {
    buffer[offset..offset + 2].copy_from_slice(&value.to_le_bytes());
}

/// Read the little-endian byte pair stored at `offset`.
#[inline]
pub fn read_u16_le(buffer: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([buffer[offset], buffer[offset + 1]])
}

/// Running sum, modulo 256, of every byte fed so far.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Checksum(u8);

impl Checksum {
    /// Start a new accumulation at zero.
    pub const fn new() -> Self {
        Self(0)
    }

    /// Fold one byte into the sum.
    #[inline]
    pub fn push(&mut self, byte: u8) {
        self.0 = self.0.wrapping_add(byte);
    }

    /// Fold a whole slice into the sum.
    pub fn extend(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.push(byte);
        }
    }

    /// Current checksum value.
    #[inline]
    pub fn value(&self) -> u8 {
        self.0
    }
}

/// Checksum of a complete byte sequence.
pub fn checksum(bytes: &[u8]) -> u8 {
    let mut sum = Checksum::new();
    sum.extend(bytes);
    sum.value()
}
