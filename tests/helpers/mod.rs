/// Test doubles simulating the HoTT wire, the port provider and the clock
/// during integration tests.
use hott_link::core::VehicleSnapshot;
use hott_link::protocol::transport::traits::{
    hott_timer::HottTimer,
    serial_port::{PortMode, SerialFunction, SerialPort, SerialPortProvider},
};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::time::{sleep, Duration};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(dead_code)]
pub struct WireError;

#[derive(Debug, Default)]
#[allow(dead_code)]
/// Shared wire state, seen by both the sensor side and the receiver side.
pub struct Wire {
    pub mode: Option<PortMode>,
    pub baud_rate: u32,
    pub rx: VecDeque<u8>,
    pub tx: Vec<u8>,
    /// Single conductor: everything written is heard back.
    pub echo: bool,
}

#[derive(Clone, Debug)]
#[allow(dead_code)]
/// Sensor end of a simulated single-wire link.
pub struct MockSerialPort {
    wire: Arc<Mutex<Wire>>,
}

#[allow(dead_code)]
impl MockSerialPort {
    /// Build the sensor port and the receiver handle sharing the same wire.
    pub fn create_pair(mode: PortMode, baud_rate: u32) -> (Self, ReceiverHandle) {
        let wire = Arc::new(Mutex::new(Wire {
            mode: Some(mode),
            baud_rate,
            ..Wire::default()
        }));
        (
            Self { wire: wire.clone() },
            ReceiverHandle { wire },
        )
    }
}

impl SerialPort for MockSerialPort {
    type Error = WireError;

    fn mode(&self) -> PortMode {
        self.wire.lock().unwrap().mode.unwrap_or(PortMode::RxTx)
    }

    fn baud_rate(&self) -> u32 {
        self.wire.lock().unwrap().baud_rate
    }

    fn set_mode(&mut self, mode: PortMode) -> Result<(), WireError> {
        self.wire.lock().unwrap().mode = Some(mode);
        Ok(())
    }

    fn set_baud_rate(&mut self, baud_rate: u32) -> Result<(), WireError> {
        self.wire.lock().unwrap().baud_rate = baud_rate;
        Ok(())
    }

    fn bytes_waiting(&self) -> usize {
        self.wire.lock().unwrap().rx.len()
    }

    fn read_byte(&mut self) -> Result<u8, WireError> {
        self.wire.lock().unwrap().rx.pop_front().ok_or(WireError)
    }

    fn write_byte(&mut self, byte: u8) -> Result<(), WireError> {
        let mut wire = self.wire.lock().unwrap();
        wire.tx.push(byte);
        if wire.echo {
            wire.rx.push_back(byte);
        }
        Ok(())
    }
}

#[derive(Clone, Debug)]
#[allow(dead_code)]
/// Receiver end: injects requests and collects responses.
pub struct ReceiverHandle {
    wire: Arc<Mutex<Wire>>,
}

#[allow(dead_code)]
impl ReceiverHandle {
    pub fn request(&self, id: u8, address: u8) {
        self.wire.lock().unwrap().rx.extend([id, address]);
    }

    pub fn inject(&self, bytes: &[u8]) {
        self.wire.lock().unwrap().rx.extend(bytes.iter().copied());
    }

    pub fn set_echo(&self, echo: bool) {
        self.wire.lock().unwrap().echo = echo;
    }

    pub fn received(&self) -> Vec<u8> {
        self.wire.lock().unwrap().tx.clone()
    }

    pub fn mode(&self) -> Option<PortMode> {
        self.wire.lock().unwrap().mode
    }

    pub fn baud_rate(&self) -> u32 {
        self.wire.lock().unwrap().baud_rate
    }
}

#[allow(dead_code)]
/// Port provider handing out a single pre-built port.
pub struct MockProvider {
    pub port: Option<MockSerialPort>,
    pub already_open: bool,
    pub shared_with_msp: bool,
}

#[allow(dead_code)]
impl MockProvider {
    /// Provider opening `port` on demand (dedicated telemetry port).
    pub fn dedicated(port: MockSerialPort) -> Self {
        Self {
            port: Some(port),
            already_open: false,
            shared_with_msp: false,
        }
    }

    /// Provider where `port` already runs MSP and is shared with telemetry.
    pub fn shared(port: MockSerialPort) -> Self {
        Self {
            port: Some(port),
            already_open: true,
            shared_with_msp: true,
        }
    }
}

impl SerialPortProvider for MockProvider {
    type Port = MockSerialPort;

    fn find_open_port(&mut self, _function: SerialFunction) -> Option<MockSerialPort> {
        if self.already_open {
            self.port.clone()
        } else {
            None
        }
    }

    fn open_port(
        &mut self,
        _function: SerialFunction,
        baud_rate: u32,
        mode: PortMode,
    ) -> Result<MockSerialPort, WireError> {
        let mut port = self.port.clone().ok_or(WireError)?;
        port.set_baud_rate(baud_rate)?;
        port.set_mode(mode)?;
        Ok(port)
    }

    fn begin_function(&mut self, _port: &mut MockSerialPort, _function: SerialFunction) {}

    fn end_function(&mut self, _port: &mut MockSerialPort, _function: SerialFunction) {}

    fn can_open(&self, _function: SerialFunction) -> bool {
        self.port.is_some()
    }

    fn is_function_shared(&self, _function: SerialFunction, _other: SerialFunction) -> bool {
        self.shared_with_msp
    }
}

#[allow(dead_code)]
/// Timer based on `tokio::time` to drive the asynchronous runner.
pub struct MockTimer {
    start: tokio::time::Instant,
}

#[allow(dead_code)]
impl MockTimer {
    pub fn new() -> Self {
        Self {
            start: tokio::time::Instant::now(),
        }
    }
}

impl HottTimer for MockTimer {
    fn now(&self) -> embassy_time::Instant {
        embassy_time::Instant::from_micros(self.start.elapsed().as_micros() as u64)
    }

    async fn delay_us(&mut self, micros: u32) {
        sleep(Duration::from_micros(micros as u64)).await;
    }
}

#[allow(dead_code)]
/// Vehicle with a 3D fix over Lyon, 11.1 V pack.
pub fn flying_snapshot() -> VehicleSnapshot {
    VehicleSnapshot {
        gps_present: true,
        gps_fix: true,
        satellites: 9,
        latitude: 457_640_420,
        longitude: 48_357_100,
        ground_speed: 1_250,
        altitude: 23_400,
        distance_to_home: 120,
        direction_to_home: 45,
        battery_voltage: 111,
    }
}

#[allow(dead_code)]
/// Sum of the frame bytes, as the receiver verifies it.
pub fn wire_checksum(frame: &[u8]) -> u8 {
    frame.iter().fold(0u8, |acc, b| acc.wrapping_add(*b))
}
