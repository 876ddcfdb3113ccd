//! Error types for ykush3-core.

use thiserror::Error;

/// Core library error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Argument not valid for the requested operation: a port (or raw port
    /// number) the operation does not accept, or an opcode outside the
    /// command table. Always raised before any HID traffic.
    #[error("invalid argument for {operation}: {value}")]
    InvalidArgument {
        operation: &'static str,
        value: String,
    },

    /// Operation attempted on a handle that has been closed.
    #[error("device not connected")]
    NotConnected,

    /// HID transport failure (open, write, read, enumerate, serial lookup).
    #[error("HID error: {0}")]
    Transport(String),

    /// Bounded read elapsed without a response.
    #[error("timeout: {0}")]
    Timeout(String),

    /// Device answered, but status or echo byte did not match the command.
    #[error("unexpected response to 0x{command:02X}: status=0x{status:02X}, response=0x{response:02X}")]
    Protocol {
        command: u8,
        status: u8,
        response: u8,
    },

    /// State query answered with a byte that is neither an on nor an off code.
    #[error("unexpected state response to 0x{command:02X}: 0x{state:02X}")]
    UnexpectedState { command: u8, state: u8 },

    /// Response too short to carry a status and a response byte.
    #[error("response too short: {len} bytes (minimum 2)")]
    ShortResponse { len: usize },
}

impl Error {
    pub(crate) fn invalid_argument(
        operation: &'static str,
        value: impl std::fmt::Display,
    ) -> Self {
        Self::InvalidArgument {
            operation,
            value: value.to_string(),
        }
    }
}

/// Convenience Result alias.
pub type Result<T> = std::result::Result<T, Error>;
