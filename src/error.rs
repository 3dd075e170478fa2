//! Error definitions shared across library modules.
//! Protocol-level conditions (line noise, unknown addresses, a busy
//! transmitter) are not errors: they are reported as session events. Only
//! serial driver failures and misuse of the port lifecycle end up here.
use thiserror_no_std::Error;

#[derive(Error, Debug)]
/// Errors raised while driving the telemetry session.
pub enum HottError<E: core::fmt::Debug> {
    /// The serial driver rejected an operation (open, mode switch, read, write).
    #[error("Serial port error: {0:?}")]
    Serial(E),

    /// An operation requiring the telemetry port ran before `acquire`.
    #[error("Telemetry port not acquired")]
    PortNotAcquired,

    /// `acquire` was called while the port is already held.
    #[error("Telemetry port already acquired")]
    PortAlreadyAcquired,
}

impl<E: core::fmt::Debug> HottError<E> {
    /// `true` when the failure originates from the serial driver.
    pub fn is_serial(&self) -> bool {
        matches!(self, HottError::Serial(_))
    }
}
