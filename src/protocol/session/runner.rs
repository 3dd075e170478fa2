//! Asynchronous driver for firmware that prefers a dedicated telemetry task
//! over calling [`HottSession::tick`] from its control loop.
//!
//! The task ticks the session at a fixed poll interval until the `stop`
//! future resolves. All send progress stays in the session, so stopping
//! between two ticks loses nothing: ticking can resume later from the loop.
use core::future::Future;

use futures_util::{
    future::{select, Either},
    pin_mut,
};

use crate::error::HottError;
use crate::protocol::session::HottSession;
use crate::protocol::transport::traits::{
    hott_timer::HottTimer, serial_port::SerialPort, telemetry_source::TelemetrySource,
};

/// Interval between two ticks issued by [`drive`] (µs). Well below the
/// inter-byte delay, so pacing stays within one poll of the ideal.
pub const RUNNER_POLL_INTERVAL_US: u32 = 1_000;

/// Tick `session` every [`RUNNER_POLL_INTERVAL_US`] until `stop` completes.
///
/// Returns `Ok(())` on stop, or the first error raised by a tick.
pub async fn drive<P, S, T, F>(
    session: &mut HottSession<P>,
    source: &S,
    timer: &mut T,
    stop: F,
) -> Result<(), HottError<P::Error>>
where
    P: SerialPort,
    S: TelemetrySource,
    T: HottTimer,
    F: Future<Output = ()>,
{
    let ticking = tick_forever(session, source, timer);
    pin_mut!(ticking);
    pin_mut!(stop);

    match select(ticking, stop).await {
        Either::Left((err, _)) => Err(err),
        Either::Right(_) => Ok(()),
    }
}

async fn tick_forever<P, S, T>(
    session: &mut HottSession<P>,
    source: &S,
    timer: &mut T,
) -> HottError<P::Error>
where
    P: SerialPort,
    S: TelemetrySource,
    T: HottTimer,
{
    loop {
        if let Err(err) = session.tick(timer.now(), source) {
            #[cfg(feature = "defmt")]
            defmt::warn!("HoTT runner stopped on error");
            return err;
        }
        timer.delay_us(RUNNER_POLL_INTERVAL_US).await;
    }
}
