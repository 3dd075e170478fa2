//! Electric Air Module frame (sensor id `0x8E`, text id `0xE0`), used here
//! as the battery report.
//!
//! Only one voltage is measured, so the main voltage and battery 1 voltage
//! fields both mirror it; per-cell, temperature, current, and capacity
//! fields stay zero.
use crate::core::VehicleSnapshot;
use crate::infra::codec::bytes::{read_u16_le, write_u16_le};
use crate::protocol::messages::{header, FrameKind, ResponseFrame};

/// Byte offsets inside the EAM frame.
pub mod layout {
    pub const CELL_LOW: usize = 6;
    pub const CELL_HIGH: usize = 13;
    pub const BATTERY_1_VOLTAGE: usize = 20;
    pub const BATTERY_2_VOLTAGE: usize = 22;
    pub const TEMPERATURE_1: usize = 24;
    pub const TEMPERATURE_2: usize = 25;
    pub const ALTITUDE: usize = 26;
    pub const CURRENT: usize = 28;
    pub const MAIN_VOLTAGE: usize = 30;
    pub const CAPACITY: usize = 32;
    pub const CLIMB_RATE: usize = 34;
    pub const CLIMB_RATE_3S: usize = 36;
    pub const RPM: usize = 37;
    pub const ELECTRIC_MINUTES: usize = 39;
    pub const ELECTRIC_SECONDS: usize = 40;
    pub const SPEED: usize = 41;
}

/// Battery response frame, refreshed in place from vehicle snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EamFrame {
    frame: ResponseFrame,
}

impl Default for EamFrame {
    fn default() -> Self {
        Self::new()
    }
}

impl EamFrame {
    pub const fn new() -> Self {
        Self {
            frame: ResponseFrame::new(FrameKind::Eam),
        }
    }

    /// Underlying bytes ready for transmission.
    pub fn frame(&self) -> &ResponseFrame {
        &self.frame
    }

    /// Refresh the payload from `snapshot`.
    ///
    /// Warning tone and inverse-display alarm bits are cleared on every
    /// refresh: nothing raised in an earlier cycle survives into the next.
    pub fn update(&mut self, snapshot: &VehicleSnapshot) {
        let bytes = self.frame.bytes_mut();
        bytes[header::WARNING_BEEPS] = 0;
        bytes[header::ALARM_INVERS_1] = 0;

        write_u16_le(bytes, layout::MAIN_VOLTAGE, snapshot.battery_voltage);
        write_u16_le(bytes, layout::BATTERY_1_VOLTAGE, snapshot.battery_voltage);
    }

    /// Stored main voltage, 0.1 V.
    pub fn main_voltage(&self) -> u16 {
        read_u16_le(self.frame.as_bytes(), layout::MAIN_VOLTAGE)
    }

    /// Stored battery 1 voltage, 0.1 V.
    pub fn battery_1_voltage(&self) -> u16 {
        read_u16_le(self.frame.as_bytes(), layout::BATTERY_1_VOLTAGE)
    }

    /// Raise a warning tone and alarm bits until the next refresh.
    pub fn raise_alarm(&mut self, warning_beep: u8, alarm_bits: u8) {
        let bytes = self.frame.bytes_mut();
        bytes[header::WARNING_BEEPS] = warning_beep;
        bytes[header::ALARM_INVERS_1] = alarm_bits;
    }
}
