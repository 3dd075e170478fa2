//! HoTT transport layer over a half-duplex single-wire serial link: bus
//! arbitration, request detection, and byte-paced frame transmission.
//!
//! ## HoTT Timing Constants
//!
//! The receiver sends a two-byte request, then expects the response to start
//! a few milliseconds later with a fixed gap between bytes. None of these
//! waits block: each one is an early return re-evaluated on the next tick.

pub mod port;
pub mod request;
pub mod traits;
pub mod transmitter;

#[cfg(test)]
pub(crate) mod mock;

/// Fixed line rate of the HoTT bus (8N1).
pub const HOTT_BAUD_RATE: u32 = 19_200;

/// Request id announcing a binary-mode poll.
pub const BINARY_MODE_REQUEST_ID: u8 = 0x80;

/// Request id announcing a text-mode poll. Text mode is not served.
pub const TEXT_MODE_REQUEST_ID: u8 = 0x7F;

/// Minimum time a two-byte request must sit in the receive buffer before it
/// is trusted (µs).
///
/// Guards against reading a request while its bytes are still arriving, and
/// against taking the tail of another sensor's traffic for a request.
pub const REQUEST_SETTLE_TIME_US: u64 = 4_000;

/// Minimum delay between two response bytes (µs).
///
/// HoTT receivers sample the response at their own pace; bytes sent back to
/// back are dropped. The first byte also waits this long after the line is
/// switched to transmit.
pub const INTER_BYTE_DELAY_US: u64 = 3_000;

/// Period between two refreshes of the response frames (µs), 5 Hz.
pub const FRAME_REFRESH_PERIOD_US: u64 = 200_000;

/// Baud rate the surrounding port management must configure for HoTT.
pub const fn hott_baud_rate() -> u32 {
    HOTT_BAUD_RATE
}
