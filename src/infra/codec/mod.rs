//! Byte-level codec primitives used by the HoTT frame layouts.
pub mod bytes;
