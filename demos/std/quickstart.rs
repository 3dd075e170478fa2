//! # Quickstart Example
//!
//! Minimal example demonstrating the basics of hott-link:
//! - Acquire a telemetry port through a provider
//! - Feed vehicle state to the session
//! - Answer a receiver poll, one byte per tick
//!
//! This example uses `std` and an in-memory port for a quick trial run.
//!
//! ```bash
//! cargo run --example quickstart
//! ```

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use embassy_time::Instant;
use hott_link::core::VehicleSnapshot;
use hott_link::protocol::config::HottConfig;
use hott_link::protocol::messages::{FrameKind, FRAME_LEN};
use hott_link::protocol::session::{HottSession, SessionEvent};
use hott_link::protocol::transport::traits::serial_port::{
    PortMode, SerialFunction, SerialPort, SerialPortProvider,
};
use hott_link::protocol::transport::BINARY_MODE_REQUEST_ID;

#[derive(Default)]
struct Line {
    mode: Option<PortMode>,
    baud_rate: u32,
    rx: VecDeque<u8>,
    tx: Vec<u8>,
}

/// In-memory serial port; the demo keeps a second handle as the receiver.
#[derive(Clone, Default)]
struct DemoPort(Rc<RefCell<Line>>);

impl SerialPort for DemoPort {
    type Error = ();

    fn mode(&self) -> PortMode {
        self.0.borrow().mode.unwrap_or(PortMode::Rx)
    }
    fn baud_rate(&self) -> u32 {
        self.0.borrow().baud_rate
    }
    fn set_mode(&mut self, mode: PortMode) -> Result<(), ()> {
        self.0.borrow_mut().mode = Some(mode);
        Ok(())
    }
    fn set_baud_rate(&mut self, baud_rate: u32) -> Result<(), ()> {
        self.0.borrow_mut().baud_rate = baud_rate;
        Ok(())
    }
    fn bytes_waiting(&self) -> usize {
        self.0.borrow().rx.len()
    }
    fn read_byte(&mut self) -> Result<u8, ()> {
        self.0.borrow_mut().rx.pop_front().ok_or(())
    }
    fn write_byte(&mut self, byte: u8) -> Result<(), ()> {
        self.0.borrow_mut().tx.push(byte);
        Ok(())
    }
}

/// Provider with a single dedicated telemetry port.
struct DemoProvider(DemoPort);

impl SerialPortProvider for DemoProvider {
    type Port = DemoPort;

    fn find_open_port(&mut self, _function: SerialFunction) -> Option<DemoPort> {
        None
    }
    fn open_port(
        &mut self,
        _function: SerialFunction,
        baud_rate: u32,
        mode: PortMode,
    ) -> Result<DemoPort, ()> {
        let mut port = self.0.clone();
        port.set_baud_rate(baud_rate)?;
        port.set_mode(mode)?;
        Ok(port)
    }
    fn begin_function(&mut self, _port: &mut DemoPort, _function: SerialFunction) {}
    fn end_function(&mut self, _port: &mut DemoPort, _function: SerialFunction) {}
    fn can_open(&self, _function: SerialFunction) -> bool {
        true
    }
    fn is_function_shared(&self, _function: SerialFunction, _other: SerialFunction) -> bool {
        false
    }
}

fn main() {
    println!("=== hott-link Quickstart ===\n");

    // ======================================================================
    // 1. Acquire the telemetry port
    // ======================================================================
    println!("1. Acquiring the telemetry port");

    let line = DemoPort::default();
    let mut provider = DemoProvider(line.clone());
    let mut session: HottSession<DemoPort> = HottSession::new(HottConfig::default());
    if session.acquire_port(&mut provider).is_err() {
        println!("   Could not acquire the port");
        return;
    }
    println!("   Port at {} baud, mode {:?}\n", line.baud_rate(), line.mode());

    // ======================================================================
    // 2. Vehicle state
    // ======================================================================
    println!("2. Vehicle state");

    let snapshot = VehicleSnapshot {
        gps_present: true,
        gps_fix: true,
        satellites: 11,
        latitude: 477_223_000,   // 47.7223°N
        longitude: -40_022_000,  // 4.0022°W
        ground_speed: 83,        // 0.1 m/s
        altitude: 1_500,         // 0.1 m
        distance_to_home: 42,    // m
        direction_to_home: 270,  // degrees
        battery_voltage: 162,    // 0.1 V
    };
    println!("   {:?}\n", snapshot);

    // ======================================================================
    // 3. Receiver polls the GPS address
    // ======================================================================
    println!("3. Receiver polls the GPS module");

    line.0
        .borrow_mut()
        .rx
        .extend([BINARY_MODE_REQUEST_ID, FrameKind::Gps.sensor_id()]);

    let mut now_us = 0u64;
    loop {
        let event = match session.tick(Instant::from_micros(now_us), &snapshot) {
            Ok(event) => event,
            Err(err) => {
                println!("   Session error: {}", err);
                return;
            }
        };
        match event {
            SessionEvent::Idle | SessionEvent::InterByteWait => {}
            SessionEvent::ByteWritten(_) | SessionEvent::ChecksumWritten(_) => {}
            SessionEvent::SendCompleted(kind) => {
                println!("   t={:>6} µs  {:?} response complete", now_us, kind);
                break;
            }
            other => println!("   t={:>6} µs  {:?}", now_us, other),
        }
        now_us += 500;
    }

    // ======================================================================
    // 4. Bytes seen by the receiver
    // ======================================================================
    println!("\n4. Response on the wire");

    let wire = line.0.borrow().tx.clone();
    for chunk in wire.chunks(15) {
        let hex: Vec<String> = chunk.iter().map(|b| format!("{:02X}", b)).collect();
        println!("   {}", hex.join(" "));
    }
    let sum = wire[..FRAME_LEN]
        .iter()
        .fold(0u8, |acc, b| acc.wrapping_add(*b));
    println!(
        "   checksum {:02X} ({})",
        wire[FRAME_LEN],
        if sum == wire[FRAME_LEN] { "ok" } else { "mismatch" }
    );

    println!("\n=== Quickstart complete ===");
}
