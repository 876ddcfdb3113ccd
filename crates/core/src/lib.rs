//! ykush3-core: command protocol, device discovery, and port control for the
//! Yepkit YKUSH3 three-port USB switch.
//!
//! The device speaks a tiny request/response protocol over 64-byte HID
//! reports. [`switch::Ykush3`] owns one open device and exposes the port
//! operations; [`transport::HidTransport`] is the seam between the protocol
//! engine and hidapi.

pub mod comm;
pub mod config;
pub mod device;
pub mod error;
pub mod hid;
pub mod protocol;
pub mod safety;
pub mod switch;
pub mod transport;

pub use error::{Error, Result};
pub use protocol::{Port, PortState};
pub use switch::{PortStates, Ykush3};

/// Yepkit (Microchip) USB Vendor ID.
pub const VENDOR_ID: u16 = 0x04D8;

/// YKUSH3 USB Product ID.
pub const PRODUCT_ID: u16 = 0xF11B;
