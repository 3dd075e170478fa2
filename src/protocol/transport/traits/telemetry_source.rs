//! Vehicle telemetry source read at frame-refresh time, plus a
//! critical-section protected snapshot cell for firmware where the GPS and
//! battery tasks publish from another execution context.
use core::cell::Cell;

use embassy_sync::blocking_mutex::{raw::CriticalSectionRawMutex, Mutex};

use crate::core::VehicleSnapshot;

/// Provides the vehicle state to compose frames from.
pub trait TelemetrySource {
    fn snapshot(&self) -> VehicleSnapshot;
}

impl TelemetrySource for VehicleSnapshot {
    fn snapshot(&self) -> VehicleSnapshot {
        *self
    }
}

/// Snapshot cell shared between producers and the telemetry session.
///
/// Suitable for a `static`: producers call [`publish`](Self::publish) or
/// [`update`](Self::update), the session reads a consistent copy.
pub struct SharedSnapshot {
    inner: Mutex<CriticalSectionRawMutex, Cell<VehicleSnapshot>>,
}

impl Default for SharedSnapshot {
    fn default() -> Self {
        Self::new()
    }
}

impl SharedSnapshot {
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(Cell::new(VehicleSnapshot::new())),
        }
    }

    /// Replace the whole snapshot.
    pub fn publish(&self, snapshot: VehicleSnapshot) {
        self.inner.lock(|cell| cell.set(snapshot));
    }

    /// Modify selected fields atomically.
    pub fn update<F: FnOnce(&mut VehicleSnapshot)>(&self, f: F) {
        self.inner.lock(|cell| {
            let mut snapshot = cell.get();
            f(&mut snapshot);
            cell.set(snapshot);
        });
    }
}

impl TelemetrySource for SharedSnapshot {
    fn snapshot(&self) -> VehicleSnapshot {
        self.inner.lock(|cell| cell.get())
    }
}
