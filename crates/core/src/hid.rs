//! `hidapi`-backed transport.

use crate::config::DeviceConfig;
use crate::error::{Error, Result};
use crate::transport::HidTransport;
use tracing::{debug, info};

/// A YKUSH3 opened through hidapi. The device is closed when this is dropped.
pub struct HidapiTransport {
    device: hidapi::HidDevice,
    read_timeout_ms: Option<i32>,
}

impl HidapiTransport {
    /// Open the device described by `config`: by serial number when one is
    /// set, otherwise the first matching device.
    pub fn open(config: &DeviceConfig) -> Result<Self> {
        let api = hidapi::HidApi::new().map_err(|e| Error::Transport(format!("hidapi init: {e}")))?;

        let device = match config.serial.as_deref() {
            Some(serial) => api.open_serial(config.vendor_id, config.product_id, serial),
            None => api.open(config.vendor_id, config.product_id),
        }
        .map_err(|e| {
            Error::Transport(format!(
                "open HID device (VID=0x{:04X} PID=0x{:04X}): {e}",
                config.vendor_id, config.product_id
            ))
        })?;

        info!(
            vid = format_args!("0x{:04X}", config.vendor_id),
            pid = format_args!("0x{:04X}", config.product_id),
            serial = config.serial.as_deref().unwrap_or("-"),
            "Opened YKUSH3"
        );

        Ok(Self {
            device,
            read_timeout_ms: config.read_timeout_ms,
        })
    }
}

impl HidTransport for HidapiTransport {
    fn write(&self, data: &[u8]) -> Result<usize> {
        self.device
            .write(data)
            .map_err(|e| Error::Transport(format!("write: {e}")))
    }

    fn read(&self, buf: &mut [u8]) -> Result<usize> {
        match self.read_timeout_ms {
            None => self
                .device
                .read(buf)
                .map_err(|e| Error::Transport(format!("read: {e}"))),
            Some(timeout_ms) => {
                let n = self
                    .device
                    .read_timeout(buf, timeout_ms)
                    .map_err(|e| Error::Transport(format!("read_timeout: {e}")))?;
                timed_read_result(n, timeout_ms)
            }
        }
    }

    fn serial_number(&self) -> Result<Option<String>> {
        self.device
            .get_serial_number_string()
            .map_err(|e| Error::Transport(format!("get serial number: {e}")))
    }
}

/// hidapi reports an elapsed `read_timeout` as a zero-length read.
fn timed_read_result(n: usize, timeout_ms: i32) -> Result<usize> {
    if n == 0 {
        debug!(timeout_ms, "No response within read timeout");
        return Err(Error::Timeout(format!(
            "hid_read timed out after {timeout_ms}ms"
        )));
    }
    Ok(n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comm::ErrorClass;
    use crate::protocol::REPORT_SIZE;

    #[test]
    fn zero_byte_timed_read_is_timeout() {
        let err = timed_read_result(0, 250).unwrap_err();
        assert!(matches!(err, Error::Timeout(ref msg) if msg.contains("250ms")));
        assert!(ErrorClass::classify(&err).is_retryable());
    }

    #[test]
    fn full_timed_read_passes_length_through() {
        assert_eq!(timed_read_result(REPORT_SIZE, 250).unwrap(), 64);
        assert_eq!(timed_read_result(2, 1000).unwrap(), 2);
    }
}
