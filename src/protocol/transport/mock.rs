//! In-memory serial port and provider shared by the unit tests.
extern crate std;

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::vec::Vec;

use crate::protocol::transport::traits::serial_port::{
    PortMode, SerialFunction, SerialPort, SerialPortProvider,
};

#[derive(Debug, PartialEq, Eq)]
pub struct MockError;

#[derive(Debug)]
pub struct PortState {
    pub mode: PortMode,
    pub baud_rate: u32,
    pub rx: VecDeque<u8>,
    pub tx: Vec<u8>,
    pub modes: Vec<PortMode>,
    /// Port direction at each successful write.
    pub write_modes: Vec<PortMode>,
    pub reads: usize,
    /// Bytes written while transmitting show up in the receive buffer.
    pub echo: bool,
    pub fail_writes: bool,
    pub fail_set_mode: bool,
}

/// Cloneable handle: the test keeps one clone, the arbiter owns another.
#[derive(Clone, Debug)]
pub struct MockPort {
    pub state: Rc<RefCell<PortState>>,
}

impl MockPort {
    pub fn new(mode: PortMode, baud_rate: u32) -> Self {
        Self {
            state: Rc::new(RefCell::new(PortState {
                mode,
                baud_rate,
                rx: VecDeque::new(),
                tx: Vec::new(),
                modes: Vec::new(),
                write_modes: Vec::new(),
                reads: 0,
                echo: false,
                fail_writes: false,
                fail_set_mode: false,
            })),
        }
    }

    pub fn inject(&self, bytes: &[u8]) {
        self.state.borrow_mut().rx.extend(bytes.iter().copied());
    }

    pub fn sent(&self) -> Vec<u8> {
        self.state.borrow().tx.clone()
    }

    pub fn set_echo(&self, echo: bool) {
        self.state.borrow_mut().echo = echo;
    }

    pub fn set_fail_set_mode(&self, fail: bool) {
        self.state.borrow_mut().fail_set_mode = fail;
    }

    pub fn write_modes(&self) -> Vec<PortMode> {
        self.state.borrow().write_modes.clone()
    }
}

impl SerialPort for MockPort {
    type Error = MockError;

    fn mode(&self) -> PortMode {
        self.state.borrow().mode
    }

    fn baud_rate(&self) -> u32 {
        self.state.borrow().baud_rate
    }

    fn set_mode(&mut self, mode: PortMode) -> Result<(), Self::Error> {
        let mut state = self.state.borrow_mut();
        if state.fail_set_mode {
            return Err(MockError);
        }
        state.mode = mode;
        state.modes.push(mode);
        Ok(())
    }

    fn set_baud_rate(&mut self, baud_rate: u32) -> Result<(), Self::Error> {
        self.state.borrow_mut().baud_rate = baud_rate;
        Ok(())
    }

    fn bytes_waiting(&self) -> usize {
        self.state.borrow().rx.len()
    }

    fn read_byte(&mut self) -> Result<u8, Self::Error> {
        let mut state = self.state.borrow_mut();
        state.reads += 1;
        state.rx.pop_front().ok_or(MockError)
    }

    fn write_byte(&mut self, byte: u8) -> Result<(), Self::Error> {
        let mut state = self.state.borrow_mut();
        if state.fail_writes {
            return Err(MockError);
        }
        state.tx.push(byte);
        let mode = state.mode;
        state.write_modes.push(mode);
        if state.echo {
            state.rx.push_back(byte);
        }
        Ok(())
    }
}

pub struct MockProvider {
    pub existing: Option<MockPort>,
    pub opened: Option<MockPort>,
    pub tags: Vec<(SerialFunction, bool)>,
    pub can_open: bool,
    pub shared: bool,
    pub fail_open: bool,
}

impl MockProvider {
    pub fn empty() -> Self {
        Self {
            existing: None,
            opened: None,
            tags: Vec::new(),
            can_open: true,
            shared: false,
            fail_open: false,
        }
    }

    pub fn with_existing(port: MockPort) -> Self {
        Self {
            existing: Some(port),
            ..Self::empty()
        }
    }
}

impl SerialPortProvider for MockProvider {
    type Port = MockPort;

    fn find_open_port(&mut self, _function: SerialFunction) -> Option<MockPort> {
        self.existing.clone()
    }

    fn open_port(
        &mut self,
        _function: SerialFunction,
        baud_rate: u32,
        mode: PortMode,
    ) -> Result<MockPort, MockError> {
        if self.fail_open {
            return Err(MockError);
        }
        let port = MockPort::new(mode, baud_rate);
        self.opened = Some(port.clone());
        Ok(port)
    }

    fn begin_function(&mut self, _port: &mut MockPort, function: SerialFunction) {
        self.tags.push((function, true));
    }

    fn end_function(&mut self, _port: &mut MockPort, function: SerialFunction) {
        self.tags.push((function, false));
    }

    fn can_open(&self, _function: SerialFunction) -> bool {
        self.can_open
    }

    fn is_function_shared(&self, _function: SerialFunction, _other: SerialFunction) -> bool {
        self.shared
    }
}
