//! Bus port arbiter: owns the telemetry serial port between `acquire` and
//! `release`, switches it between receive and transmit, and restores the
//! configuration it found on release.
//!
//! The HoTT wire is a single conductor. While transmitting, the local echo
//! (or the tail of the receiver's own traffic) lands in the receive buffer,
//! so every switch back to receive discards whatever arrived meanwhile.
use crate::error::HottError;
use crate::protocol::transport::traits::serial_port::{
    PortMode, SerialFunction, SerialPort, SerialPortProvider,
};

/// Port configuration captured at acquisition time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SavedPortConfig {
    pub mode: PortMode,
    pub baud_rate: u32,
}

/// Single owner of the telemetry port.
pub struct PortArbiter<P: SerialPort> {
    port: Option<P>,
    saved: Option<SavedPortConfig>,
    baud_rate: u32,
}

impl<P: SerialPort> PortArbiter<P> {
    /// Arbiter configuring the port at `baud_rate` once acquired.
    pub const fn new(baud_rate: u32) -> Self {
        Self {
            port: None,
            saved: None,
            baud_rate,
        }
    }

    /// Take the telemetry port from `provider`.
    ///
    /// Reuses a port already tagged for telemetry (reconfigured to the HoTT
    /// rate in receive mode), otherwise opens a dedicated one. Either way the
    /// prior mode and rate are kept for [`release`](Self::release).
    pub fn acquire<S>(&mut self, provider: &mut S) -> Result<(), HottError<P::Error>>
    where
        S: SerialPortProvider<Port = P>,
    {
        if self.port.is_some() {
            return Err(HottError::PortAlreadyAcquired);
        }

        let (port, saved) = match provider.find_open_port(SerialFunction::Telemetry) {
            Some(mut port) => {
                let saved = capture(&port);
                if let Err(err) = configure(&mut port, self.baud_rate) {
                    // Hand the port back as found; the first failure is the one reported.
                    let _ = port.set_baud_rate(saved.baud_rate);
                    let _ = port.set_mode(saved.mode);
                    return Err(HottError::Serial(err));
                }
                provider.begin_function(&mut port, SerialFunction::Telemetry);
                (port, saved)
            }
            None => {
                let port = provider
                    .open_port(SerialFunction::Telemetry, self.baud_rate, PortMode::Rx)
                    .map_err(HottError::Serial)?;
                let saved = capture(&port);
                (port, saved)
            }
        };

        #[cfg(feature = "defmt")]
        defmt::info!(
            "HoTT port acquired, previous config {} @ {} baud",
            saved.mode,
            saved.baud_rate
        );

        self.port = Some(port);
        self.saved = Some(saved);
        Ok(())
    }

    /// Restore the captured configuration and hand the port back.
    pub fn release<S>(&mut self, provider: &mut S) -> Result<(), HottError<P::Error>>
    where
        S: SerialPortProvider<Port = P>,
    {
        let (Some(port), Some(saved)) = (self.port.as_mut(), self.saved) else {
            return Err(HottError::PortNotAcquired);
        };

        port.set_mode(saved.mode).map_err(HottError::Serial)?;
        port.set_baud_rate(saved.baud_rate).map_err(HottError::Serial)?;
        provider.end_function(port, SerialFunction::Telemetry);

        self.port = None;
        self.saved = None;

        #[cfg(feature = "defmt")]
        defmt::info!("HoTT port released");
        Ok(())
    }

    /// Whether the port is currently held.
    #[inline]
    pub fn is_acquired(&self) -> bool {
        self.port.is_some()
    }

    /// Current direction of the held port.
    pub fn mode(&self) -> Option<PortMode> {
        self.port.as_ref().map(|port| port.mode())
    }

    /// Configuration that `release` will restore.
    pub fn saved_config(&self) -> Option<SavedPortConfig> {
        self.saved
    }

    /// Line rate applied at acquisition.
    pub fn baud_rate(&self) -> u32 {
        self.baud_rate
    }

    /// Take the line to drive a response.
    pub fn switch_to_transmit(&mut self) -> Result<(), HottError<P::Error>> {
        self.port_mut()?.set_mode(PortMode::Tx).map_err(HottError::Serial)
    }

    /// Give the line back and drop the bytes received while transmitting.
    /// Returns how many bytes were discarded.
    pub fn switch_to_receive(&mut self) -> Result<usize, HottError<P::Error>> {
        self.port_mut()?.set_mode(PortMode::Rx).map_err(HottError::Serial)?;
        self.flush_rx()
    }

    /// Discard every byte waiting in the receive buffer.
    pub fn flush_rx(&mut self) -> Result<usize, HottError<P::Error>> {
        let port = self.port_mut()?;
        let mut discarded = 0;
        while port.bytes_waiting() > 0 {
            port.read_byte().map_err(HottError::Serial)?;
            discarded += 1;
        }
        Ok(discarded)
    }

    /// Received bytes ready to read; zero while the port is not held.
    pub fn bytes_waiting(&self) -> usize {
        self.port.as_ref().map_or(0, |port| port.bytes_waiting())
    }

    pub fn read_byte(&mut self) -> Result<u8, HottError<P::Error>> {
        self.port_mut()?.read_byte().map_err(HottError::Serial)
    }

    pub fn write_byte(&mut self, byte: u8) -> Result<(), HottError<P::Error>> {
        self.port_mut()?.write_byte(byte).map_err(HottError::Serial)
    }

    fn port_mut(&mut self) -> Result<&mut P, HottError<P::Error>> {
        self.port.as_mut().ok_or(HottError::PortNotAcquired)
    }
}

fn configure<P: SerialPort>(port: &mut P, baud_rate: u32) -> Result<(), P::Error> {
    port.set_baud_rate(baud_rate)?;
    port.set_mode(PortMode::Rx)
}

fn capture<P: SerialPort>(port: &P) -> SavedPortConfig {
    SavedPortConfig {
        mode: port.mode(),
        baud_rate: port.baud_rate(),
    }
}
