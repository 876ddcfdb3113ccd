//! Error classification and connectivity probing.
//!
//! The driver never retries on its own. These helpers let a caller decide
//! what a failure means before choosing its own retry policy.

use crate::error::Error;
use crate::protocol::Port;
use crate::switch::Ykush3;
use tracing::debug;

/// Classification of driver errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Rejected before any I/O (invalid port or opcode).
    Argument,
    /// Handle already closed.
    NotConnected,
    /// HID layer failure: device gone, permission, I/O error.
    Transport,
    /// Configured read bound elapsed.
    Timeout,
    /// Device answered with something unexpected.
    Protocol,
}

impl ErrorClass {
    pub fn classify(err: &Error) -> Self {
        match err {
            Error::InvalidArgument { .. } => Self::Argument,
            Error::NotConnected => Self::NotConnected,
            Error::Transport(_) => Self::Transport,
            Error::Timeout(_) => Self::Timeout,
            Error::Protocol { .. } | Error::UnexpectedState { .. } | Error::ShortResponse { .. } => {
                Self::Protocol
            }
        }
    }

    /// Whether a caller might reasonably retry the same call.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Timeout)
    }
}

/// Device connection status for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceStatus {
    /// Device is connected and answering.
    Connected,
    /// Handle closed or HID link lost.
    Disconnected,
    /// Device reachable but answering incorrectly or too slowly.
    Error,
}

/// Probe the device with a single port 1 state query.
pub fn check_device_status(device: &mut Ykush3) -> DeviceStatus {
    match device.query_state(Port::Port1) {
        Ok(_) => DeviceStatus::Connected,
        Err(e) => {
            debug!(error = %e, "Device status probe failed");
            match ErrorClass::classify(&e) {
                ErrorClass::NotConnected | ErrorClass::Transport => DeviceStatus::Disconnected,
                _ => DeviceStatus::Error,
            }
        }
    }
}
