//! HoTT protocol components: frame layouts, configuration, single-wire
//! transport, the polled session, and telemetry enable management.
pub mod config;
pub mod managment;
pub mod messages;
pub mod session;
pub mod transport;
