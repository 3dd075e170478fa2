//! Defines the "data contract" between the vehicle telemetry source (the
//! producer) and the frame codec (the consumer).
//!
//! The telemetry source owns and mutates the vehicle state. The codec never
//! keeps a reference to it: it reads a [`VehicleSnapshot`] copy at
//! composition time and writes the derived bytes into its own frames.

/// Read-only view of the vehicle state used to compose response frames.
///
/// Units follow the flight controller conventions:
///
/// ```text
/// latitude / longitude : degrees x 1e7, south and west negative
/// ground_speed         : 0.1 m/s
/// altitude             : 0.1 m
/// distance_to_home     : m
/// direction_to_home    : degrees
/// battery_voltage      : 0.1 V
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct VehicleSnapshot {
    /// A GPS sensor is fitted and detected.
    pub gps_present: bool,
    /// The GPS currently holds a position solution.
    pub gps_fix: bool,
    /// Number of satellites used in the solution.
    pub satellites: u8,
    /// Signed latitude, degrees x 1e7.
    pub latitude: i32,
    /// Signed longitude, degrees x 1e7.
    pub longitude: i32,
    /// Ground speed in 0.1 m/s units.
    pub ground_speed: u16,
    /// Altitude in 0.1 m units.
    pub altitude: i32,
    /// Distance to the home point in meters.
    pub distance_to_home: u16,
    /// Direction to the home point in degrees.
    pub direction_to_home: i16,
    /// Measured battery voltage in 0.1 V units.
    pub battery_voltage: u16,
}

impl VehicleSnapshot {
    /// Snapshot with every field cleared (no GPS, no fix, 0 V).
    pub const fn new() -> Self {
        Self {
            gps_present: false,
            gps_fix: false,
            satellites: 0,
            latitude: 0,
            longitude: 0,
            ground_speed: 0,
            altitude: 0,
            distance_to_home: 0,
            direction_to_home: 0,
            battery_voltage: 0,
        }
    }
}
