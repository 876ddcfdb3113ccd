//! Session configuration.
//!
//! The driver reads no configuration files; embedding applications can
//! deserialize a [`DeviceConfig`] from their own settings.

use crate::{PRODUCT_ID, VENDOR_ID};
use serde::{Deserialize, Serialize};

/// Parameters used to open a YKUSH3.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    /// USB vendor ID.
    pub vendor_id: u16,
    /// USB product ID.
    pub product_id: u16,
    /// Open the device with this serial number instead of the first match.
    pub serial: Option<String>,
    /// Bound on each response read, in milliseconds. `None` blocks until the
    /// device answers.
    pub read_timeout_ms: Option<i32>,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            vendor_id: VENDOR_ID,
            product_id: PRODUCT_ID,
            serial: None,
            read_timeout_ms: None,
        }
    }
}

impl DeviceConfig {
    pub fn with_serial(mut self, serial: impl Into<String>) -> Self {
        self.serial = Some(serial.into());
        self
    }

    pub fn with_read_timeout_ms(mut self, timeout_ms: i32) -> Self {
        self.read_timeout_ms = Some(timeout_ms);
        self
    }
}
