//! Timer abstraction used by the asynchronous runner. The polled session
//! itself only needs timestamps passed to `tick`.
use embassy_time::Instant;

/// Monotonic clock plus an asynchronous delay.
pub trait HottTimer {
    /// Current timestamp.
    fn now(&self) -> Instant;

    /// Asynchronously wait for `micros` microseconds.
    fn delay_us<'a>(&'a mut self, micros: u32) -> impl core::future::Future<Output = ()> + 'a;
}
