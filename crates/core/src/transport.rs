//! HID transport abstraction for device communication.
//!
//! Provides a trait-based transport layer so that real HID devices and
//! mock devices share the same interface.

use crate::error::Result;
use crate::protocol::{Command, Response, REPORT_SIZE};
use crate::safety;
use tracing::trace;

/// Abstraction over raw HID read/write.
///
/// Both calls block until the underlying device completes or fails.
pub trait HidTransport: Send {
    /// Write one output report, returning the number of bytes written.
    fn write(&self, data: &[u8]) -> Result<usize>;

    /// Read one input report into `buf`, returning the number of bytes read.
    fn read(&self, buf: &mut [u8]) -> Result<usize>;

    /// Serial number string reported by the device, if any.
    fn serial_number(&self) -> Result<Option<String>>;
}

/// Perform one request/response cycle: write the command report, then read
/// exactly one response report.
///
/// No retry is attempted; transport errors propagate unchanged.
pub fn exchange(transport: &dyn HidTransport, command: &Command) -> Result<Response> {
    safety::validate_command(command)?;

    let encoded = command.encode();
    trace!(
        operation = command.operation.name(),
        opcode = format_args!("0x{:02X}", command.opcode),
        report_hex = format_args!("{:02X?}", &encoded[..2]),
        "YKUSH3 TX"
    );
    transport.write(&encoded)?;

    let mut buf = [0u8; REPORT_SIZE];
    let n = transport.read(&mut buf)?;
    let resp = Response::decode(&buf[..n.min(REPORT_SIZE)])?;

    trace!(
        len = n,
        status = format_args!("0x{:02X}", resp.status),
        code = format_args!("0x{:02X}", resp.code),
        "YKUSH3 RX"
    );

    Ok(resp)
}

/// A mock HID transport for testing.
///
/// Simulates a YKUSH3: remembers the power state of each port and answers
/// raise/lower/query commands the way the firmware does.
#[cfg(test)]
pub mod mock {
    use super::*;
    use crate::error::Error;
    use crate::protocol::{opcodes, STATUS_OK};
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct MockState {
        ports: [bool; 3],
        writes: Vec<Vec<u8>>,
        reads: usize,
        pending: Option<Vec<u8>>,
        fail_read: Vec<u8>,
        fail_write: Vec<u8>,
        canned: HashMap<u8, Vec<u8>>,
        serial: Option<String>,
    }

    /// Simulated switch. Clones share state, so a test can keep one clone
    /// and hand the other to a device handle.
    #[derive(Clone, Default)]
    pub struct MockTransport {
        state: Arc<Mutex<MockState>>,
    }

    impl MockTransport {
        pub fn new() -> Self {
            Self::default()
        }

        /// Simulated device reporting the given serial number.
        pub fn with_serial(serial: &str) -> Self {
            let mock = Self::new();
            mock.state.lock().unwrap().serial = Some(serial.to_string());
            mock
        }

        /// Fail the read that follows a write of `opcode`.
        pub fn fail_read_on(&self, opcode: u8) {
            self.state.lock().unwrap().fail_read.push(opcode);
        }

        /// Fail the write of `opcode` itself.
        pub fn fail_write_on(&self, opcode: u8) {
            self.state.lock().unwrap().fail_write.push(opcode);
        }

        /// Answer `opcode` with a fixed response instead of simulating it.
        pub fn on_request(&self, opcode: u8, response: &[u8]) {
            self.state
                .lock()
                .unwrap()
                .canned
                .insert(opcode, response.to_vec());
        }

        /// Force the simulated power state of an individual port (0-based).
        pub fn set_port(&self, index: usize, on: bool) {
            self.state.lock().unwrap().ports[index] = on;
        }

        pub fn port(&self, index: usize) -> bool {
            self.state.lock().unwrap().ports[index]
        }

        /// Every report written so far, in order.
        pub fn writes(&self) -> Vec<Vec<u8>> {
            self.state.lock().unwrap().writes.clone()
        }

        /// First byte of every report written so far.
        pub fn opcodes_written(&self) -> Vec<u8> {
            self.writes().iter().map(|w| w[0]).collect()
        }

        pub fn read_count(&self) -> usize {
            self.state.lock().unwrap().reads
        }

        fn simulate(ports: &mut [bool; 3], opcode: u8) -> Vec<u8> {
            let code = match opcode {
                opcodes::RAISE_PORT1..=opcodes::RAISE_PORT3 => {
                    ports[(opcode - opcodes::RAISE_PORT1) as usize] = true;
                    Some(opcode)
                }
                opcodes::LOWER_PORT1..=opcodes::LOWER_PORT3 => {
                    ports[(opcode - opcodes::LOWER_PORT1) as usize] = false;
                    Some(opcode)
                }
                opcodes::RAISE_ALL => {
                    *ports = [true; 3];
                    Some(opcode)
                }
                opcodes::LOWER_ALL => {
                    *ports = [false; 3];
                    Some(opcode)
                }
                opcodes::QUERY_PORT1..=opcodes::QUERY_PORT3 => {
                    let index = opcode - opcodes::QUERY_PORT1;
                    let base = if ports[index as usize] {
                        opcodes::RAISE_PORT1
                    } else {
                        opcodes::LOWER_PORT1
                    };
                    Some(base + index)
                }
                _ => None,
            };

            let mut resp = vec![0u8; REPORT_SIZE];
            match code {
                Some(code) => {
                    resp[0] = STATUS_OK;
                    resp[1] = code;
                }
                None => resp[1] = opcode,
            }
            resp
        }
    }

    impl HidTransport for MockTransport {
        fn write(&self, data: &[u8]) -> Result<usize> {
            let mut state = self.state.lock().unwrap();
            let opcode = data[0];
            if state.fail_write.contains(&opcode) {
                return Err(Error::Transport(format!("mock: write of 0x{opcode:02X} failed")));
            }
            state.writes.push(data.to_vec());

            let resp = match state.canned.get(&opcode).cloned() {
                Some(canned) => canned,
                None => Self::simulate(&mut state.ports, opcode),
            };
            state.pending = Some(resp);
            Ok(data.len())
        }

        fn read(&self, buf: &mut [u8]) -> Result<usize> {
            let mut state = self.state.lock().unwrap();
            state.reads += 1;
            let resp = state
                .pending
                .take()
                .ok_or_else(|| Error::Transport("mock: read without pending request".into()))?;

            let last = state.writes.last().map(|w| w[0]).unwrap_or_default();
            if state.fail_read.contains(&last) {
                return Err(Error::Transport(format!("mock: read after 0x{last:02X} failed")));
            }

            let n = resp.len().min(buf.len());
            buf[..n].copy_from_slice(&resp[..n]);
            Ok(n)
        }

        fn serial_number(&self) -> Result<Option<String>> {
            Ok(self.state.lock().unwrap().serial.clone())
        }
    }
}
