//! GPS module frame (sensor id `0x8A`, text id `0xA0`).
//!
//! # Payload layout (0-based offsets)
//!
//! ```text
//!  6       flight direction
//!  7-8     ground speed, km/h
//!  9       latitude hemisphere (1 = south)
//! 10-11    latitude degrees * 100 + minutes
//! 12-13    latitude seconds remainder
//! 14       longitude hemisphere (1 = west)
//! 15-16    longitude degrees * 100 + minutes
//! 17-18    longitude seconds remainder
//! 19-20    distance to home, m
//! 21-22    altitude, m + 500
//! 23-25    climb rates
//! 26       satellites
//! 27       fix character
//! 28       direction to home
//! 29-42    attitude, GPS time, MSL altitude, vibration, free chars, version
//! ```
use crate::core::VehicleSnapshot;
use crate::infra::codec::bytes::{read_u16_le, write_u16_le};
use crate::protocol::messages::{FrameKind, ResponseFrame};

/// Byte offsets inside the GPS frame.
pub mod layout {
    pub const FLIGHT_DIRECTION: usize = 6;
    pub const SPEED: usize = 7;
    pub const LAT_HEMISPHERE: usize = 9;
    pub const LAT_DEGREE_MINUTES: usize = 10;
    pub const LAT_SECONDS: usize = 12;
    pub const LON_HEMISPHERE: usize = 14;
    pub const LON_DEGREE_MINUTES: usize = 15;
    pub const LON_SECONDS: usize = 17;
    pub const HOME_DISTANCE: usize = 19;
    pub const ALTITUDE: usize = 21;
    pub const CLIMB_RATE_1S: usize = 23;
    pub const CLIMB_RATE_3S: usize = 25;
    pub const SATELLITES: usize = 26;
    pub const FIX_CHAR: usize = 27;
    pub const HOME_DIRECTION: usize = 28;
}

/// HoTT altitude zero sits 500 m below the reported value.
pub const GPS_ALTITUDE_OFFSET: i32 = 500;
/// Satellites required before a fix is reported as 3D.
pub const MIN_SATELLITES_FOR_3D: u8 = 5;

const UNITS_PER_DEGREE: u32 = 10_000_000;
const SCALED_UNITS_PER_MINUTE: u32 = 1_000_000;

/// Fix quality shown on the receiver display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GpsFix {
    None,
    TwoD,
    ThreeD,
    /// Supported by the wire format; never derived from the vehicle state.
    Dgps,
}

impl GpsFix {
    /// Classify the current GPS state.
    pub fn from_state(has_fix: bool, satellites: u8) -> Self {
        if !has_fix {
            GpsFix::None
        } else if satellites >= MIN_SATELLITES_FOR_3D {
            GpsFix::ThreeD
        } else {
            GpsFix::TwoD
        }
    }

    /// Character written in the fix field.
    pub const fn as_char(self) -> u8 {
        match self {
            GpsFix::None => b'-',
            GpsFix::TwoD => b'2',
            GpsFix::ThreeD => b'3',
            GpsFix::Dgps => b'D',
        }
    }

    /// Reverse lookup of [`GpsFix::as_char`].
    pub fn from_char(value: u8) -> Option<Self> {
        match value {
            b'-' => Some(GpsFix::None),
            b'2' => Some(GpsFix::TwoD),
            b'3' => Some(GpsFix::ThreeD),
            b'D' => Some(GpsFix::Dgps),
            _ => None,
        }
    }
}

/// Coordinate split into the three HoTT fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HottCoordinate {
    /// South or west of the origin.
    pub negative: bool,
    /// `degrees * 100 + minutes`.
    pub degree_minutes: u16,
    /// Fraction of a minute, seconds x 100.
    pub seconds: u16,
}

/// Split a signed 1e-7 degree value into hemisphere, degree/minute and
/// seconds fields. The magnitude is encoded unsigned; the sign only sets
/// the hemisphere flag.
pub fn encode_coordinate(value: i32) -> HottCoordinate {
    let magnitude = value.unsigned_abs();
    let degrees = magnitude / UNITS_PER_DEGREE;
    let scaled = (magnitude - degrees * UNITS_PER_DEGREE) * 6;
    let minutes = scaled / SCALED_UNITS_PER_MINUTE;
    let seconds = (scaled % SCALED_UNITS_PER_MINUTE) / 100;

    HottCoordinate {
        negative: value < 0,
        degree_minutes: (degrees * 100 + minutes) as u16,
        seconds: seconds as u16,
    }
}

/// Rebuild the 1e-7 degree value from the wire fields. Precision is bounded
/// by the seconds field (100 / 6 units of 1e-7 degree).
pub fn decode_coordinate(coordinate: HottCoordinate) -> i32 {
    let degrees = i64::from(coordinate.degree_minutes / 100);
    let minutes = i64::from(coordinate.degree_minutes % 100);
    let scaled = minutes * i64::from(SCALED_UNITS_PER_MINUTE) + i64::from(coordinate.seconds) * 100;
    let magnitude = (degrees * i64::from(UNITS_PER_DEGREE) + scaled / 6) as i32;

    if coordinate.negative {
        -magnitude
    } else {
        magnitude
    }
}

/// Ground speed conversion used by the display: `(speed / 100) * 36`.
pub fn gps_speed_kmh(ground_speed: u16) -> u16 {
    (ground_speed / 100) * 36
}

/// Altitude field value: whole meters shifted by [`GPS_ALTITUDE_OFFSET`].
pub fn gps_altitude(altitude: i32) -> u16 {
    (altitude / 10 + GPS_ALTITUDE_OFFSET) as u16
}

/// GPS response frame, refreshed in place from vehicle snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GpsFrame {
    frame: ResponseFrame,
}

impl Default for GpsFrame {
    fn default() -> Self {
        Self::new()
    }
}

impl GpsFrame {
    pub const fn new() -> Self {
        Self {
            frame: ResponseFrame::new(FrameKind::Gps),
        }
    }

    /// Underlying bytes ready for transmission.
    pub fn frame(&self) -> &ResponseFrame {
        &self.frame
    }

    /// Refresh the payload from `snapshot`.
    ///
    /// Without a fix only the satellite count and fix character change: the
    /// position block keeps the last fixed values on the display.
    pub fn update(&mut self, snapshot: &VehicleSnapshot) {
        let bytes = self.frame.bytes_mut();
        bytes[layout::SATELLITES] = snapshot.satellites;

        let fix = GpsFix::from_state(snapshot.gps_fix, snapshot.satellites);
        bytes[layout::FIX_CHAR] = fix.as_char();
        if fix == GpsFix::None {
            return;
        }

        write_coordinate(
            bytes,
            layout::LAT_HEMISPHERE,
            encode_coordinate(snapshot.latitude),
        );
        write_coordinate(
            bytes,
            layout::LON_HEMISPHERE,
            encode_coordinate(snapshot.longitude),
        );

        write_u16_le(bytes, layout::SPEED, gps_speed_kmh(snapshot.ground_speed));
        write_u16_le(bytes, layout::HOME_DISTANCE, snapshot.distance_to_home);
        write_u16_le(bytes, layout::ALTITUDE, gps_altitude(snapshot.altitude));
        bytes[layout::HOME_DIRECTION] = snapshot.direction_to_home as u8;
    }

    /// Fix character currently stored.
    pub fn fix(&self) -> Option<GpsFix> {
        GpsFix::from_char(self.frame.as_bytes()[layout::FIX_CHAR])
    }

    /// Stored latitude fields.
    pub fn latitude(&self) -> HottCoordinate {
        read_coordinate(self.frame.as_bytes(), layout::LAT_HEMISPHERE)
    }

    /// Stored longitude fields.
    pub fn longitude(&self) -> HottCoordinate {
        read_coordinate(self.frame.as_bytes(), layout::LON_HEMISPHERE)
    }

    /// Stored ground speed, km/h.
    pub fn speed_kmh(&self) -> u16 {
        read_u16_le(self.frame.as_bytes(), layout::SPEED)
    }

    /// Stored altitude field (offset applied).
    pub fn altitude(&self) -> u16 {
        read_u16_le(self.frame.as_bytes(), layout::ALTITUDE)
    }
}

// Hemisphere flag, then degree/minutes and seconds as little-endian pairs.
fn write_coordinate(bytes: &mut [u8], offset: usize, coordinate: HottCoordinate) {
    bytes[offset] = coordinate.negative as u8;
    write_u16_le(bytes, offset + 1, coordinate.degree_minutes);
    write_u16_le(bytes, offset + 3, coordinate.seconds);
}

fn read_coordinate(bytes: &[u8], offset: usize) -> HottCoordinate {
    HottCoordinate {
        negative: bytes[offset] != 0,
        degree_minutes: read_u16_le(bytes, offset + 1),
        seconds: read_u16_le(bytes, offset + 3),
    }
}
