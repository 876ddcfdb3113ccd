//! Device discovery.

use crate::error::{Error, Result};
use crate::{PRODUCT_ID, VENDOR_ID};
use serde::Serialize;
use tracing::{debug, info};

/// Information about a discovered YKUSH3.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceInfo {
    pub vendor_id: u16,
    pub product_id: u16,
    pub path: String,
    pub serial: Option<String>,
    pub manufacturer: Option<String>,
    pub product: Option<String>,
    pub release_number: u16,
    pub interface_number: i32,
}

impl DeviceInfo {
    fn from_hidapi(info: &hidapi::DeviceInfo) -> Self {
        Self {
            vendor_id: info.vendor_id(),
            product_id: info.product_id(),
            path: info.path().to_string_lossy().into_owned(),
            serial: info.serial_number().map(|s| s.to_string()),
            manufacturer: info.manufacturer_string().map(|s| s.to_string()),
            product: info.product_string().map(|s| s.to_string()),
            release_number: info.release_number(),
            interface_number: info.interface_number(),
        }
    }
}

/// Whether a vendor/product pair identifies a YKUSH3.
pub fn is_ykush3(vendor_id: u16, product_id: u16) -> bool {
    vendor_id == VENDOR_ID && product_id == PRODUCT_ID
}

/// Discover all connected YKUSH3 switches.
pub fn discover_devices() -> Result<Vec<DeviceInfo>> {
    debug!("Starting HID device enumeration");
    let api = hidapi::HidApi::new().map_err(|e| Error::Transport(e.to_string()))?;

    let devices: Vec<DeviceInfo> = api
        .device_list()
        .filter(|info| is_ykush3(info.vendor_id(), info.product_id()))
        .map(DeviceInfo::from_hidapi)
        .inspect(|dev| {
            info!(
                serial = dev.serial.as_deref().unwrap_or("-"),
                path = %dev.path,
                "Found YKUSH3"
            )
        })
        .collect();

    debug!(count = devices.len(), "Device enumeration complete");
    Ok(devices)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_ykush3_ids() {
        assert!(is_ykush3(0x04D8, 0xF11B));
        assert!(!is_ykush3(0x04D8, 0xF2F7));
        assert!(!is_ykush3(0x046D, 0xF11B));
    }

    #[test]
    fn device_info_serializes() {
        let info = DeviceInfo {
            vendor_id: VENDOR_ID,
            product_id: PRODUCT_ID,
            path: "/dev/hidraw3".into(),
            serial: Some("YK30001".into()),
            manufacturer: Some("Yepkit Lda.".into()),
            product: Some("YKUSH3".into()),
            release_number: 0x0100,
            interface_number: 0,
        };
        let json = serde_json::to_value(&info).unwrap();
        assert_eq!(json["serial"], "YK30001");
        assert_eq!(json["vendor_id"], 0x04D8);
        assert_eq!(json["product"], "YKUSH3");
    }
}
