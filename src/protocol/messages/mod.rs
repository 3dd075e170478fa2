//! HoTT response frames: fixed 44-byte layouts opened by a start marker and a
//! sensor header, closed by a stop marker. The checksum byte is not stored in
//! the frame; the transmitter computes it while sending.
//!
//! ```text
//! [0x7C][sensor id][warning beeps][text id][payload ...][0x7D] + checksum
//! ```
pub mod eam;
pub mod gps;

pub use eam::EamFrame;
pub use gps::{GpsFix, GpsFrame};

/// First byte of every binary-mode response.
pub const START_BYTE: u8 = 0x7C;
/// Last stored byte of every binary-mode response (before the checksum).
pub const STOP_BYTE: u8 = 0x7D;
/// Stored frame length, start byte to stop byte inclusive.
pub const FRAME_LEN: usize = 44;
/// Bytes on the wire for one response: frame plus trailing checksum.
pub const WIRE_LEN: usize = FRAME_LEN + 1;

/// Header offsets shared by every sensor frame.
pub mod header {
    pub const START: usize = 0;
    pub const SENSOR_ID: usize = 1;
    pub const WARNING_BEEPS: usize = 2;
    pub const TEXT_ID: usize = 3;
    pub const ALARM_INVERS_1: usize = 4;
    pub const ALARM_INVERS_2: usize = 5;
    pub const STOP: usize = super::FRAME_LEN - 1;
}

/// Frame kinds this sensor can answer with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameKind {
    /// GPS module frame (position, speed, home vector).
    Gps,
    /// Electric Air Module frame (battery voltages).
    Eam,
}

impl FrameKind {
    /// Binary-mode address the receiver polls for this frame; also written as
    /// the sensor id in the frame header.
    pub const fn sensor_id(self) -> u8 {
        match self {
            FrameKind::Gps => 0x8A,
            FrameKind::Eam => 0x8E,
        }
    }

    /// Sensor text id written in the frame header.
    pub const fn text_id(self) -> u8 {
        match self {
            FrameKind::Gps => 0xA0,
            FrameKind::Eam => 0xE0,
        }
    }
}

/// Fixed-size response buffer. Header and trailer are written once at
/// construction; payload bytes are overwritten in place on every refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResponseFrame {
    kind: FrameKind,
    bytes: [u8; FRAME_LEN],
}

impl ResponseFrame {
    /// Zeroed frame carrying the header and trailer for `kind`.
    pub const fn new(kind: FrameKind) -> Self {
        let mut bytes = [0u8; FRAME_LEN];
        bytes[header::START] = START_BYTE;
        bytes[header::SENSOR_ID] = kind.sensor_id();
        bytes[header::TEXT_ID] = kind.text_id();
        bytes[header::STOP] = STOP_BYTE;
        Self { kind, bytes }
    }

    /// Frame kind fixed at construction.
    #[inline]
    pub fn kind(&self) -> FrameKind {
        self.kind
    }

    /// Stored bytes, start marker to stop marker.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Number of stored bytes (excluding the checksum).
    #[inline]
    pub fn len(&self) -> usize {
        FRAME_LEN
    }

    /// Frames are never empty; provided for API symmetry with `len`.
    #[inline]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Checksum the transmitter will append after the stop byte.
    pub fn checksum(&self) -> u8 {
        crate::infra::codec::bytes::checksum(&self.bytes)
    }

    /// Payload view for the codec. Header and trailer offsets must not be written.
    #[inline]
    pub(crate) fn bytes_mut(&mut self) -> &mut [u8; FRAME_LEN] {
        &mut self.bytes
    }
}
