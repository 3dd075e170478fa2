//! Session configuration supplied once at initialization.
use embassy_time::Duration;

use crate::protocol::transport::{
    FRAME_REFRESH_PERIOD_US, HOTT_BAUD_RATE, INTER_BYTE_DELAY_US, REQUEST_SETTLE_TIME_US,
};

/// Timing and policy knobs of a HoTT session. `Default` yields the protocol
/// values; the timings only need changing for unusual receivers or tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HottConfig {
    /// Line rate applied to the telemetry port.
    pub baud_rate: u32,
    /// Period between two frame refreshes.
    pub refresh_period: Duration,
    /// Minimum age of a two-byte request before it is read.
    pub request_settle_time: Duration,
    /// Minimum gap between two response bytes.
    pub inter_byte_delay: Duration,
    /// On a shared port, follow the telemetry switch instead of the arming state.
    pub telemetry_switch: bool,
}

impl Default for HottConfig {
    fn default() -> Self {
        Self {
            baud_rate: HOTT_BAUD_RATE,
            refresh_period: Duration::from_micros(FRAME_REFRESH_PERIOD_US),
            request_settle_time: Duration::from_micros(REQUEST_SETTLE_TIME_US),
            inter_byte_delay: Duration::from_micros(INTER_BYTE_DELAY_US),
            telemetry_switch: false,
        }
    }
}
