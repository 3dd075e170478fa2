//! Frame transmitter: emits one response byte per call, accumulating the
//! checksum as it goes, then releases the line.
//!
//! The caller decides when a byte is due (see [`FrameTransmitter::is_due`]);
//! nothing here sleeps. A send is resumable across any number of ticks and
//! all of its progress lives in the cursor.
//!
//! Sequence for a 44-byte frame:
//!
//! ```text
//! begin_send   -> line to TX, cursor { offset 0, remaining 45 }
//! advance x44  -> frame bytes, checksum accumulated
//! advance      -> checksum byte
//! advance      -> line back to RX, echo flushed, cursor cleared
//! ```
use embassy_time::{Duration, Instant};

use crate::error::HottError;
use crate::infra::codec::bytes::Checksum;
use crate::protocol::messages::{FrameKind, ResponseFrame};
use crate::protocol::transport::port::PortArbiter;
use crate::protocol::transport::traits::serial_port::SerialPort;

/// Position inside the in-flight response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SendCursor {
    kind: FrameKind,
    offset: usize,
    /// Frame bytes still to send plus the checksum byte.
    remaining: usize,
    checksum: Checksum,
}

/// Result of one [`FrameTransmitter::advance`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransmitProgress {
    /// No send in progress.
    Idle,
    /// One frame byte was written.
    ByteWritten(u8),
    /// The closing checksum byte was written.
    ChecksumWritten(u8),
    /// Line released; `discarded` echo bytes were flushed.
    Completed { kind: FrameKind, discarded: usize },
}

/// Byte-paced sender holding at most one response in flight.
#[derive(Debug, Clone)]
pub struct FrameTransmitter {
    buffer: ResponseFrame,
    cursor: Option<SendCursor>,
    last_write_at: Option<Instant>,
    inter_byte_delay: Duration,
}

impl FrameTransmitter {
    pub const fn new(inter_byte_delay: Duration) -> Self {
        Self {
            buffer: ResponseFrame::new(FrameKind::Eam),
            cursor: None,
            last_write_at: None,
            inter_byte_delay,
        }
    }

    /// Whether a response is in flight.
    #[inline]
    pub fn is_sending(&self) -> bool {
        self.cursor.is_some()
    }

    /// Kind of the response in flight.
    pub fn sending_kind(&self) -> Option<FrameKind> {
        self.cursor.map(|cursor| cursor.kind)
    }

    /// Bytes left to write, checksum included.
    pub fn remaining(&self) -> usize {
        self.cursor.map_or(0, |cursor| cursor.remaining)
    }

    /// Whether the inter-byte delay has elapsed since the last line action.
    pub fn is_due(&self, now: Instant) -> bool {
        if self.cursor.is_none() {
            return false;
        }
        self.last_write_at
            .map_or(true, |at| now.saturating_duration_since(at) >= self.inter_byte_delay)
    }

    /// Start sending `frame`.
    ///
    /// Returns `Ok(false)` without side effects when a send is already in
    /// progress: responses are never queued. The frame is copied, so later
    /// refreshes of the caller's buffer cannot tear this transmission.
    pub fn begin_send<P: SerialPort>(
        &mut self,
        frame: &ResponseFrame,
        port: &mut PortArbiter<P>,
        now: Instant,
    ) -> Result<bool, HottError<P::Error>> {
        if self.cursor.is_some() {
            #[cfg(feature = "defmt")]
            defmt::debug!("HoTT send dropped: {} still in flight", self.sending_kind());
            return Ok(false);
        }

        port.switch_to_transmit()?;

        self.buffer = *frame;
        self.cursor = Some(SendCursor {
            kind: frame.kind(),
            offset: 0,
            remaining: frame.len() + 1,
            checksum: Checksum::new(),
        });
        self.last_write_at = Some(now);

        #[cfg(feature = "defmt")]
        defmt::debug!("HoTT send started: {}", frame.kind());
        Ok(true)
    }

    /// Drop the in-flight send without touching the line. Returns the kind
    /// of the send that was dropped, if any.
    pub fn abort(&mut self) -> Option<FrameKind> {
        let kind = self.sending_kind();
        self.cursor = None;
        self.last_write_at = None;

        #[cfg(feature = "defmt")]
        if let Some(kind) = kind {
            defmt::debug!("HoTT send aborted: {}", kind);
        }
        kind
    }

    /// Perform the next line action of the in-flight send. Callers gate this
    /// with [`is_due`](Self::is_due).
    pub fn advance<P: SerialPort>(
        &mut self,
        port: &mut PortArbiter<P>,
        now: Instant,
    ) -> Result<TransmitProgress, HottError<P::Error>> {
        let Some(mut cursor) = self.cursor else {
            return Ok(TransmitProgress::Idle);
        };

        if cursor.remaining == 0 {
            let discarded = port.switch_to_receive()?;
            self.cursor = None;
            self.last_write_at = None;

            #[cfg(feature = "defmt")]
            defmt::debug!("HoTT send completed: {}", cursor.kind);

            return Ok(TransmitProgress::Completed {
                kind: cursor.kind,
                discarded,
            });
        }

        cursor.remaining -= 1;
        let progress = if cursor.remaining == 0 {
            let checksum = cursor.checksum.value();
            port.write_byte(checksum)?;
            TransmitProgress::ChecksumWritten(checksum)
        } else {
            let byte = self.buffer.as_bytes()[cursor.offset];
            cursor.checksum.push(byte);
            port.write_byte(byte)?;
            cursor.offset += 1;
            TransmitProgress::ByteWritten(byte)
        };

        self.cursor = Some(cursor);
        self.last_write_at = Some(now);
        Ok(progress)
    }
}
