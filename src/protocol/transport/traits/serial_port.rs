//! Minimal abstraction over the flight controller serial drivers. Allows the
//! library to plug into hardware UARTs, soft-serial ports, or host mocks.

/// Direction the port is currently configured for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PortMode {
    /// Receive only; the transmitter is released.
    Rx,
    /// Transmit only; received bytes are not expected.
    Tx,
    /// Full duplex (ports not dedicated to HoTT).
    RxTx,
}

/// Function tags used to find and share serial ports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SerialFunction {
    Telemetry,
    Msp,
}

/// Non-blocking byte access to one serial port.
pub trait SerialPort {
    type Error: core::fmt::Debug;

    /// Current direction.
    fn mode(&self) -> PortMode;
    /// Current line rate.
    fn baud_rate(&self) -> u32;
    /// Switch direction.
    fn set_mode(&mut self, mode: PortMode) -> Result<(), Self::Error>;
    /// Change the line rate.
    fn set_baud_rate(&mut self, baud_rate: u32) -> Result<(), Self::Error>;
    /// Number of received bytes ready to read.
    fn bytes_waiting(&self) -> usize;
    /// Pop one received byte. Only called when `bytes_waiting() > 0`.
    fn read_byte(&mut self) -> Result<u8, Self::Error>;
    /// Queue one byte for transmission. Must not block.
    fn write_byte(&mut self, byte: u8) -> Result<(), Self::Error>;
}

/// Port registry of the host firmware.
pub trait SerialPortProvider {
    type Port: SerialPort;

    /// Already-open port tagged with `function`, if any.
    fn find_open_port(&mut self, function: SerialFunction) -> Option<Self::Port>;

    /// Open a dedicated port for `function`.
    fn open_port(
        &mut self,
        function: SerialFunction,
        baud_rate: u32,
        mode: PortMode,
    ) -> Result<Self::Port, <Self::Port as SerialPort>::Error>;

    /// Tag `port` as serving `function`.
    fn begin_function(&mut self, port: &mut Self::Port, function: SerialFunction);

    /// Remove the `function` tag from `port`.
    fn end_function(&mut self, port: &mut Self::Port, function: SerialFunction);

    /// Whether any port is configured for `function`.
    fn can_open(&self, function: SerialFunction) -> bool;

    /// Whether `function` and `other` are configured on the same port.
    fn is_function_shared(&self, function: SerialFunction, other: SerialFunction) -> bool;
}
