//! Safety layer: validates every command against the known opcode table
//! before it is written to the device.
//!
//! The YKUSH3 firmware has no framing or sequence numbers, so a stray byte
//! pattern on the wire is executed as whatever opcode it happens to match.
//!
//! ## Safety Invariants
//! 1. Only opcodes from the raise/lower/query table ever reach the device
//! 2. The control byte always equals the opcode
//! 3. Raw port numbers are checked against 1, 2, 3 and 10 (all ports)
//! 4. All validation happens BEFORE any HID communication

use crate::error::{Error, Result};
use crate::protocol::{opcodes, Command, Operation, Port};

/// Every opcode the driver is allowed to send.
const ALLOWED_OPCODES: &[u8] = &[
    opcodes::RAISE_PORT1,
    opcodes::RAISE_PORT2,
    opcodes::RAISE_PORT3,
    opcodes::RAISE_ALL,
    opcodes::LOWER_PORT1,
    opcodes::LOWER_PORT2,
    opcodes::LOWER_PORT3,
    opcodes::LOWER_ALL,
    opcodes::QUERY_PORT1,
    opcodes::QUERY_PORT2,
    opcodes::QUERY_PORT3,
];

/// Validate an outgoing command.
pub fn validate_command(command: &Command) -> Result<()> {
    if !ALLOWED_OPCODES.contains(&command.opcode) || command.control != command.opcode {
        return Err(Error::invalid_argument(
            command.operation.name(),
            format!(
                "opcode 0x{:02X} control 0x{:02X}",
                command.opcode, command.control
            ),
        ));
    }
    Ok(())
}

/// Validate a raw port number for an operation.
///
/// State queries only accept individual ports.
pub fn validate_port_number(operation: Operation, raw: u8) -> Result<Port> {
    let port = Port::try_from(raw).map_err(|_| Error::invalid_argument(operation.name(), raw))?;
    if operation == Operation::QueryState && port == Port::All {
        return Err(Error::invalid_argument(operation.name(), port));
    }
    Ok(port)
}
