//! Telemetry management: decides when the HoTT session may own its serial
//! port, acquiring and releasing it as the vehicle state changes.
pub mod telemetry_gate;
