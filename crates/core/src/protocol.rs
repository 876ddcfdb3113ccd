//! YKUSH3 command protocol encoding and decoding.
//!
//! Every exchange is one 64-byte output report followed by one 64-byte input
//! report:
//! - Request: byte 0 = opcode, byte 1 = control (same value as the opcode), rest zero
//! - Response: byte 0 = status (0x01 on success), byte 1 = echoed opcode or port state
//!
//! Opcode table:
//!
//! | Operation  | Port 1 | Port 2 | Port 3 | All  |
//! |------------|--------|--------|--------|------|
//! | Raise      | 0x11   | 0x12   | 0x13   | 0x1A |
//! | Lower      | 0x01   | 0x02   | 0x03   | 0x0A |
//! | QueryState | 0x21   | 0x22   | 0x23   | -    |
//!
//! A state query answers with the Lower opcode of the port when it is off and
//! the Raise opcode when it is on. An answer that echoes the query opcode
//! itself is also decoded as off.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Size of every HID report exchanged with the device.
pub const REPORT_SIZE: usize = 64;

/// Status byte reported by the device for a successful command.
pub const STATUS_OK: u8 = 0x01;

/// Opcodes understood by the YKUSH3 firmware.
pub mod opcodes {
    pub const RAISE_PORT1: u8 = 0x11;
    pub const RAISE_PORT2: u8 = 0x12;
    pub const RAISE_PORT3: u8 = 0x13;
    pub const RAISE_ALL: u8 = 0x1A;

    pub const LOWER_PORT1: u8 = 0x01;
    pub const LOWER_PORT2: u8 = 0x02;
    pub const LOWER_PORT3: u8 = 0x03;
    pub const LOWER_ALL: u8 = 0x0A;

    pub const QUERY_PORT1: u8 = 0x21;
    pub const QUERY_PORT2: u8 = 0x22;
    pub const QUERY_PORT3: u8 = 0x23;
}

/// One of the switchable downstream ports, or all of them at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Port {
    Port1,
    Port2,
    Port3,
    /// Bulk target, only valid for raise/lower.
    All,
}

impl Port {
    /// Individually addressable ports, in polling order.
    pub const INDIVIDUAL: [Port; 3] = [Port::Port1, Port::Port2, Port::Port3];

    /// Raw port number: 1, 2, 3, or 10 for all ports.
    pub fn number(&self) -> u8 {
        match self {
            Self::Port1 => 1,
            Self::Port2 => 2,
            Self::Port3 => 3,
            Self::All => 10,
        }
    }
}

impl TryFrom<u8> for Port {
    type Error = Error;

    fn try_from(raw: u8) -> Result<Self> {
        match raw {
            1 => Ok(Self::Port1),
            2 => Ok(Self::Port2),
            3 => Ok(Self::Port3),
            10 => Ok(Self::All),
            other => Err(Error::invalid_argument("port number", other)),
        }
    }
}

impl std::fmt::Display for Port {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::All => write!(f, "All Ports"),
            port => write!(f, "Port {}", port.number()),
        }
    }
}

/// Power state of a single port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PortState {
    Off,
    On,
}

impl PortState {
    pub fn is_on(&self) -> bool {
        matches!(self, Self::On)
    }
}

impl From<bool> for PortState {
    fn from(on: bool) -> Self {
        if on {
            Self::On
        } else {
            Self::Off
        }
    }
}

impl std::fmt::Display for PortState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::On => write!(f, "ON"),
            Self::Off => write!(f, "OFF"),
        }
    }
}

/// Logical switch operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Power the port on.
    Raise,
    /// Power the port off.
    Lower,
    /// Read the current power state.
    QueryState,
}

impl Operation {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Raise => "raise",
            Self::Lower => "lower",
            Self::QueryState => "state query",
        }
    }
}

/// A YKUSH3 command: opcode plus the control byte the device echoes back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Command {
    pub operation: Operation,
    pub opcode: u8,
    pub control: u8,
}

impl Command {
    /// Look up the command for an operation on a port.
    ///
    /// Fails with [`Error::InvalidArgument`] for a state query on [`Port::All`].
    pub fn new(operation: Operation, port: Port) -> Result<Self> {
        use opcodes::*;

        let opcode = match (operation, port) {
            (Operation::Raise, Port::Port1) => RAISE_PORT1,
            (Operation::Raise, Port::Port2) => RAISE_PORT2,
            (Operation::Raise, Port::Port3) => RAISE_PORT3,
            (Operation::Raise, Port::All) => RAISE_ALL,
            (Operation::Lower, Port::Port1) => LOWER_PORT1,
            (Operation::Lower, Port::Port2) => LOWER_PORT2,
            (Operation::Lower, Port::Port3) => LOWER_PORT3,
            (Operation::Lower, Port::All) => LOWER_ALL,
            (Operation::QueryState, Port::Port1) => QUERY_PORT1,
            (Operation::QueryState, Port::Port2) => QUERY_PORT2,
            (Operation::QueryState, Port::Port3) => QUERY_PORT3,
            (Operation::QueryState, Port::All) => {
                return Err(Error::invalid_argument(operation.name(), port));
            }
        };

        Ok(Self {
            operation,
            opcode,
            control: opcode,
        })
    }

    /// Encode into a zero-padded output report.
    pub fn encode(&self) -> Vec<u8> {
        let mut buf = vec![0u8; REPORT_SIZE];
        buf[0] = self.opcode;
        buf[1] = self.control;
        buf
    }
}

/// The two meaningful bytes of a device response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Response {
    /// Status byte, [`STATUS_OK`] on success.
    pub status: u8,
    /// Echoed opcode for raise/lower, encoded port state for queries.
    pub code: u8,
}

impl Response {
    /// Decode a raw input report. Bytes past the first two are reserved.
    pub fn decode(data: &[u8]) -> Result<Self> {
        match data {
            [status, code, ..] => Ok(Self {
                status: *status,
                code: *code,
            }),
            _ => Err(Error::ShortResponse { len: data.len() }),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == STATUS_OK
    }

    /// Check a raise/lower acknowledgement: success status and echoed opcode.
    pub fn expect_ack(&self, command: &Command) -> Result<()> {
        if !self.is_success() || self.code != command.opcode {
            return Err(Error::Protocol {
                command: command.opcode,
                status: self.status,
                response: self.code,
            });
        }
        Ok(())
    }

    /// Decode the answer to a state query.
    pub fn port_state(&self, command: &Command) -> Result<PortState> {
        use opcodes::*;

        if !self.is_success() {
            return Err(Error::Protocol {
                command: command.opcode,
                status: self.status,
                response: self.code,
            });
        }

        match self.code {
            LOWER_PORT1 | LOWER_PORT2 | LOWER_PORT3 => Ok(PortState::Off),
            echo if echo == command.opcode => Ok(PortState::Off),
            RAISE_PORT1 | RAISE_PORT2 | RAISE_PORT3 => Ok(PortState::On),
            state => Err(Error::UnexpectedState {
                command: command.opcode,
                state,
            }),
        }
    }
}
