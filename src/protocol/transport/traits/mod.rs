//! Abstraction traits consumed by the transport layer (serial port, timer,
//! and vehicle telemetry source).
pub mod hott_timer;
pub mod serial_port;
pub mod telemetry_source;
