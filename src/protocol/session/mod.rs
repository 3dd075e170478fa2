//! Session dispatcher: the single polled entry point of the HoTT sensor.
//!
//! Each [`HottSession::tick`] performs, in order:
//!
//! 1. a frame refresh when the refresh period has elapsed (independent of
//!    any send in progress; sends work on their own copy),
//! 2. request detection, only while no response is in flight,
//! 3. at most one transmitter step, once the inter-byte delay has elapsed.
//!
//! ```text
//! Idle -> Listening -> Armed -> RequestRecognized -> Sending -> Idle
//! ```
//!
//! Every wait is an early return; a tick never blocks.
use embassy_time::Instant;

use crate::core::VehicleSnapshot;
use crate::error::HottError;
use crate::protocol::config::HottConfig;
use crate::protocol::messages::{EamFrame, FrameKind, GpsFrame, ResponseFrame};
use crate::protocol::transport::port::PortArbiter;
use crate::protocol::transport::request::{DetectorEvent, Request, RequestDetector, RequestKind};
use crate::protocol::transport::traits::serial_port::{SerialPort, SerialPortProvider};
use crate::protocol::transport::traits::telemetry_source::TelemetrySource;
use crate::protocol::transport::transmitter::{FrameTransmitter, TransmitProgress};

pub mod runner;

/// What a tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SessionEvent {
    /// Port not held, or nothing to do.
    Idle,
    /// Two request bytes seen; waiting for them to settle.
    RequestArmed,
    /// Unexpected byte count on the wire; buffer flushed.
    NoiseDiscarded(usize),
    /// Request read but not answered (unknown address, text mode, no GPS).
    RequestIgnored(Request),
    /// A recognized request arrived while a send was in flight.
    SendDropped(FrameKind),
    /// Response scheduled; the line is now in transmit mode.
    SendStarted(FrameKind),
    /// Response in flight, next byte not due yet.
    InterByteWait,
    /// One response byte written.
    ByteWritten(u8),
    /// Checksum written, line released on the next step.
    ChecksumWritten(u8),
    /// Line back in receive mode.
    SendCompleted(FrameKind),
}

/// Complete HoTT sensor state: frames, port, detector, transmitter, timers.
pub struct HottSession<P: SerialPort> {
    config: HottConfig,
    port: PortArbiter<P>,
    detector: RequestDetector,
    transmitter: FrameTransmitter,
    gps: GpsFrame,
    eam: EamFrame,
    gps_present: bool,
    last_refresh_at: Option<Instant>,
}

impl<P: SerialPort> HottSession<P> {
    /// Initialize a session; frames get their headers, the port stays free.
    pub fn new(config: HottConfig) -> Self {
        Self {
            port: PortArbiter::new(config.baud_rate),
            detector: RequestDetector::new(config.request_settle_time),
            transmitter: FrameTransmitter::new(config.inter_byte_delay),
            gps: GpsFrame::new(),
            eam: EamFrame::new(),
            gps_present: false,
            last_refresh_at: None,
            config,
        }
    }

    /// Configuration supplied at initialization.
    pub fn config(&self) -> &HottConfig {
        &self.config
    }

    /// Line rate the port management must use for this session.
    pub fn baud_rate(&self) -> u32 {
        self.config.baud_rate
    }

    /// Take the telemetry port.
    pub fn acquire_port<S>(&mut self, provider: &mut S) -> Result<(), HottError<P::Error>>
    where
        S: SerialPortProvider<Port = P>,
    {
        self.port.acquire(provider)?;
        self.detector.disarm();
        Ok(())
    }

    /// Restore and hand back the telemetry port.
    ///
    /// A send still in flight is aborted: ownership of the line ends here and
    /// the receiver re-polls for a fresh frame.
    pub fn release_port<S>(&mut self, provider: &mut S) -> Result<(), HottError<P::Error>>
    where
        S: SerialPortProvider<Port = P>,
    {
        self.detector.disarm();
        self.transmitter.abort();
        self.port.release(provider)
    }

    #[inline]
    pub fn is_port_acquired(&self) -> bool {
        self.port.is_acquired()
    }

    /// Port arbiter, for mode and restore-state inspection.
    pub fn port(&self) -> &PortArbiter<P> {
        &self.port
    }

    #[inline]
    pub fn is_sending(&self) -> bool {
        self.transmitter.is_sending()
    }

    /// Staged GPS frame (next response to a GPS request).
    pub fn gps_frame(&self) -> &GpsFrame {
        &self.gps
    }

    /// Staged EAM frame (next response to an EAM request).
    pub fn eam_frame(&self) -> &EamFrame {
        &self.eam
    }

    /// Timestamp of the last frame refresh.
    pub fn last_refresh_at(&self) -> Option<Instant> {
        self.last_refresh_at
    }

    /// Run one dispatcher step at time `now`.
    pub fn tick<T: TelemetrySource>(
        &mut self,
        now: Instant,
        source: &T,
    ) -> Result<SessionEvent, HottError<P::Error>> {
        if self.refresh_due(now) {
            self.refresh(&source.snapshot());
            self.last_refresh_at = Some(now);
        }

        if !self.port.is_acquired() {
            return Ok(SessionEvent::Idle);
        }

        if !self.transmitter.is_sending() {
            let event = match self.detector.poll(&mut self.port, now)? {
                DetectorEvent::Waiting | DetectorEvent::Settling => SessionEvent::Idle,
                DetectorEvent::Armed => SessionEvent::RequestArmed,
                DetectorEvent::NoiseDiscarded(count) => SessionEvent::NoiseDiscarded(count),
                DetectorEvent::Request(request) => self.dispatch(request, now)?,
            };
            // The first byte waits a full inter-byte delay after the switch.
            return Ok(event);
        }

        if !self.transmitter.is_due(now) {
            return Ok(SessionEvent::InterByteWait);
        }

        let event = match self.transmitter.advance(&mut self.port, now)? {
            TransmitProgress::Idle => SessionEvent::Idle,
            TransmitProgress::ByteWritten(byte) => SessionEvent::ByteWritten(byte),
            TransmitProgress::ChecksumWritten(byte) => SessionEvent::ChecksumWritten(byte),
            TransmitProgress::Completed { kind, .. } => SessionEvent::SendCompleted(kind),
        };
        Ok(event)
    }

    /// Schedule the response for `kind` directly, as a recognized request
    /// would. Dropped when a send is already in flight.
    pub fn begin_send(
        &mut self,
        kind: FrameKind,
        now: Instant,
    ) -> Result<SessionEvent, HottError<P::Error>> {
        let frame: ResponseFrame = match kind {
            FrameKind::Gps => *self.gps.frame(),
            FrameKind::Eam => *self.eam.frame(),
        };

        if self.transmitter.begin_send(&frame, &mut self.port, now)? {
            Ok(SessionEvent::SendStarted(kind))
        } else {
            Ok(SessionEvent::SendDropped(kind))
        }
    }

    fn refresh_due(&self, now: Instant) -> bool {
        self.last_refresh_at.map_or(true, |at| {
            now.saturating_duration_since(at) >= self.config.refresh_period
        })
    }

    fn refresh(&mut self, snapshot: &VehicleSnapshot) {
        self.eam.update(snapshot);
        self.gps.update(snapshot);
        self.gps_present = snapshot.gps_present;
    }

    fn dispatch(
        &mut self,
        request: Request,
        now: Instant,
    ) -> Result<SessionEvent, HottError<P::Error>> {
        match RequestKind::from_request(&request) {
            RequestKind::Gps if self.gps_present => self.begin_send(FrameKind::Gps, now),
            RequestKind::Eam => self.begin_send(FrameKind::Eam, now),
            _ => {
                #[cfg(feature = "defmt")]
                defmt::trace!("HoTT request ignored: {}", request);
                Ok(SessionEvent::RequestIgnored(request))
            }
        }
    }
}
