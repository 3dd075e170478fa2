//! Telemetry enable gate.
//!
//! A dedicated telemetry port is always enabled. When the port is shared
//! with MSP, telemetry only owns it while the vehicle is armed, or, when
//! `telemetry_switch` is configured, while the telemetry switch is on. The
//! gate acquires or releases the session port on every change of state.
use embassy_time::Instant;

use crate::error::HottError;
use crate::protocol::session::{HottSession, SessionEvent};
use crate::protocol::transport::traits::serial_port::{
    SerialFunction, SerialPort, SerialPortProvider,
};
use crate::protocol::transport::traits::telemetry_source::TelemetrySource;

/// Vehicle inputs driving the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GateInputs {
    pub armed: bool,
    pub telemetry_switch_active: bool,
}

/// Result of [`TelemetryGate::check_state`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GateTransition {
    /// No telemetry port configured; the gate never enables.
    Inactive,
    Unchanged,
    /// Port acquired.
    Enabled,
    /// Port released.
    Disabled,
}

#[derive(Debug, Clone, Copy)]
pub struct TelemetryGate {
    configuration_valid: bool,
    port_shared: bool,
    use_switch: bool,
    enabled: bool,
}

impl TelemetryGate {
    /// Inspect the port configuration once. `use_switch` mirrors
    /// [`HottConfig::telemetry_switch`](crate::protocol::config::HottConfig).
    pub fn new<S: SerialPortProvider>(provider: &S, use_switch: bool) -> Self {
        Self {
            configuration_valid: provider.can_open(SerialFunction::Telemetry),
            port_shared: provider
                .is_function_shared(SerialFunction::Telemetry, SerialFunction::Msp),
            use_switch,
            enabled: false,
        }
    }

    /// Whether the gate currently holds the port for the session.
    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Whether the port is shared with MSP.
    #[inline]
    pub fn is_port_shared(&self) -> bool {
        self.port_shared
    }

    /// Desired state for `inputs`, ignoring the current one.
    pub fn should_enable(&self, inputs: GateInputs) -> bool {
        if !self.port_shared {
            return true;
        }
        if self.use_switch {
            inputs.telemetry_switch_active
        } else {
            inputs.armed
        }
    }

    /// Acquire or release the session port when the desired state changed.
    pub fn check_state<P, S>(
        &mut self,
        session: &mut HottSession<P>,
        provider: &mut S,
        inputs: GateInputs,
    ) -> Result<GateTransition, HottError<P::Error>>
    where
        P: SerialPort,
        S: SerialPortProvider<Port = P>,
    {
        if !self.configuration_valid {
            return Ok(GateTransition::Inactive);
        }

        let desired = self.should_enable(inputs);
        if desired == self.enabled {
            return Ok(GateTransition::Unchanged);
        }

        if desired {
            session.acquire_port(provider)?;
        } else {
            session.release_port(provider)?;
        }
        self.enabled = desired;

        #[cfg(feature = "defmt")]
        defmt::info!("HoTT telemetry enabled: {}", desired);

        Ok(if desired {
            GateTransition::Enabled
        } else {
            GateTransition::Disabled
        })
    }

    /// Tick the session when telemetry is currently allowed.
    pub fn handle<P, T>(
        &self,
        session: &mut HottSession<P>,
        inputs: GateInputs,
        now: Instant,
        source: &T,
    ) -> Result<SessionEvent, HottError<P::Error>>
    where
        P: SerialPort,
        T: TelemetrySource,
    {
        if !self.configuration_valid || !self.should_enable(inputs) {
            return Ok(SessionEvent::Idle);
        }
        session.tick(now, source)
    }
}
