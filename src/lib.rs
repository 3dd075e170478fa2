//! `hott-link` library: sensor-side implementation of the Graupner HoTT
//! telemetry protocol for a `no_std` environment. A single polled session
//! listens for receiver requests on a half-duplex single-wire serial link and
//! answers them with GPS and EAM (battery) frames, one byte per tick.
#![no_std]
//==================================================================================
/// Vehicle snapshot and shared data types consumed by the frame codec.
pub mod core;
/// Driver-level errors surfaced by the session (serial failures, port misuse).
pub mod error;
/// Byte-level helpers: little-endian field writes and checksum accumulation.
pub mod infra;
/// HoTT protocol implementation: frame layouts, bus arbitration, request
/// detection, byte transmission, and the session dispatcher.
pub mod protocol;
//==================================================================================
