//! Request detector: recognizes the receiver's two-byte poll `[id, address]`
//! on the shared wire.
//!
//! A request is only trusted once exactly two bytes have been waiting for at
//! least the settle time. Any other byte count above one is treated as noise
//! or echo: the buffer is flushed and the window disarmed.
use embassy_time::{Duration, Instant};

use crate::error::HottError;
use crate::protocol::messages::FrameKind;
use crate::protocol::transport::port::PortArbiter;
use crate::protocol::transport::traits::serial_port::SerialPort;
use crate::protocol::transport::BINARY_MODE_REQUEST_ID;

/// Number of bytes in a receiver request.
pub const REQUEST_LEN: usize = 2;

/// Raw request as read from the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Request {
    pub id: u8,
    pub address: u8,
}

/// Closed set of requests the sensor knows how to answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RequestKind {
    /// Binary-mode poll of the GPS module address.
    Gps,
    /// Binary-mode poll of the Electric Air Module address.
    Eam,
    /// Text-mode poll, foreign address, or unknown request id.
    Unrecognized,
}

impl RequestKind {
    /// Classify a raw request.
    pub fn from_request(request: &Request) -> Self {
        if request.id != BINARY_MODE_REQUEST_ID {
            return RequestKind::Unrecognized;
        }
        match request.address {
            address if address == FrameKind::Gps.sensor_id() => RequestKind::Gps,
            address if address == FrameKind::Eam.sensor_id() => RequestKind::Eam,
            _ => RequestKind::Unrecognized,
        }
    }

    /// Frame answering this request, if any.
    pub fn frame_kind(self) -> Option<FrameKind> {
        match self {
            RequestKind::Gps => Some(FrameKind::Gps),
            RequestKind::Eam => Some(FrameKind::Eam),
            RequestKind::Unrecognized => None,
        }
    }
}

/// Outcome of one detector poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DetectorEvent {
    /// Fewer than two bytes waiting.
    Waiting,
    /// Two bytes seen for the first time; settle window started.
    Armed,
    /// Two bytes waiting but the settle time has not elapsed yet.
    Settling,
    /// Unexpected byte count: this many bytes were discarded.
    NoiseDiscarded(usize),
    /// A complete request was consumed from the wire.
    Request(Request),
}

/// Settle-window state machine.
#[derive(Debug, Clone, Copy)]
pub struct RequestDetector {
    armed_at: Option<Instant>,
    settle_time: Duration,
}

impl RequestDetector {
    pub const fn new(settle_time: Duration) -> Self {
        Self {
            armed_at: None,
            settle_time,
        }
    }

    /// Whether a two-byte candidate is currently settling.
    #[inline]
    pub fn is_armed(&self) -> bool {
        self.armed_at.is_some()
    }

    /// Forget any settling candidate.
    pub fn disarm(&mut self) {
        self.armed_at = None;
    }

    /// Inspect the receive buffer once. Must not run while a response is
    /// being transmitted.
    pub fn poll<P: SerialPort>(
        &mut self,
        port: &mut PortArbiter<P>,
        now: Instant,
    ) -> Result<DetectorEvent, HottError<P::Error>> {
        let waiting = port.bytes_waiting();

        if waiting < REQUEST_LEN {
            return Ok(DetectorEvent::Waiting);
        }

        if waiting != REQUEST_LEN {
            let discarded = port.flush_rx()?;
            self.armed_at = None;

            #[cfg(feature = "defmt")]
            defmt::debug!("HoTT rx noise: {} bytes discarded", discarded);

            return Ok(DetectorEvent::NoiseDiscarded(discarded));
        }

        match self.armed_at {
            None => {
                self.armed_at = Some(now);
                return Ok(DetectorEvent::Armed);
            }
            Some(armed_at) => {
                if now.saturating_duration_since(armed_at) < self.settle_time {
                    return Ok(DetectorEvent::Settling);
                }
                self.armed_at = None;
            }
        }

        let id = port.read_byte()?;
        let address = port.read_byte()?;

        #[cfg(feature = "defmt")]
        defmt::trace!("HoTT request id={=u8:#x} address={=u8:#x}", id, address);

        Ok(DetectorEvent::Request(Request { id, address }))
    }
}

#[cfg(test)]
#[path = "tests.rs"]
mod tests;
