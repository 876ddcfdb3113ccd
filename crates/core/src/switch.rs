//! YKUSH3 device handle: session lifecycle and port operations.

use crate::config::DeviceConfig;
use crate::error::{Error, Result};
use crate::hid::HidapiTransport;
use crate::protocol::{Command, Operation, Port, PortState};
use crate::transport::{exchange, HidTransport};
use serde::Serialize;
use tracing::{debug, info, warn};

/// Power state of every individual port, captured in polling order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PortStates {
    pub port1: PortState,
    pub port2: PortState,
    pub port3: PortState,
}

impl PortStates {
    /// State of an individual port; `None` for [`Port::All`].
    pub fn get(&self, port: Port) -> Option<PortState> {
        match port {
            Port::Port1 => Some(self.port1),
            Port::Port2 => Some(self.port2),
            Port::Port3 => Some(self.port3),
            Port::All => None,
        }
    }

    /// `(port, state)` pairs in port order.
    pub fn iter(&self) -> impl Iterator<Item = (Port, PortState)> + '_ {
        Port::INDIVIDUAL
            .into_iter()
            .zip([self.port1, self.port2, self.port3])
    }
}

/// An open connection to one YKUSH3.
///
/// Every operation takes `&mut self`: the switch has no request IDs, so a
/// handle must never have two exchanges in flight.
pub struct Ykush3 {
    transport: Option<Box<dyn HidTransport>>,
    serial: Option<String>,
}

impl Ykush3 {
    /// Open the first available YKUSH3.
    pub fn open() -> Result<Self> {
        Self::open_with_config(&DeviceConfig::default())
    }

    /// Open the YKUSH3 with the given serial number.
    pub fn open_serial(serial: &str) -> Result<Self> {
        Self::open_with_config(&DeviceConfig::default().with_serial(serial))
    }

    /// Open a YKUSH3 as described by `config`, by serial number when one is set.
    pub fn open_with_config(config: &DeviceConfig) -> Result<Self> {
        let transport = HidapiTransport::open(config)?;
        Ok(Self::from_transport(
            Box::new(transport),
            config.serial.clone(),
        ))
    }

    /// Wrap an already-open transport.
    pub fn from_transport(transport: Box<dyn HidTransport>, serial: Option<String>) -> Self {
        Self {
            transport: Some(transport),
            serial,
        }
    }

    /// Whether the handle is still open.
    pub fn is_connected(&self) -> bool {
        self.transport.is_some()
    }

    /// Release the device. Closing an already-closed handle is a no-op.
    pub fn close(&mut self) -> Result<()> {
        if self.transport.take().is_some() {
            info!(serial = self.serial.as_deref().unwrap_or("-"), "Closed YKUSH3");
        }
        Ok(())
    }

    /// Serial number of the connected device.
    ///
    /// Returns the serial the handle was opened with, otherwise asks the
    /// device once and caches the answer.
    pub fn serial(&mut self) -> Result<String> {
        let transport = self.transport()?;
        if let Some(serial) = &self.serial {
            return Ok(serial.clone());
        }

        let serial = transport
            .serial_number()?
            .ok_or_else(|| Error::Transport("device reported no serial number".into()))?;
        debug!(serial = %serial, "Read device serial number");
        self.serial = Some(serial.clone());
        Ok(serial)
    }

    fn transport(&self) -> Result<&dyn HidTransport> {
        self.transport.as_deref().ok_or(Error::NotConnected)
    }

    fn actuate(&mut self, operation: Operation, port: Port) -> Result<()> {
        let cmd = Command::new(operation, port)?;
        let resp = exchange(self.transport()?, &cmd)?;
        if let Err(e) = resp.expect_ack(&cmd) {
            warn!(%port, operation = operation.name(), error = %e, "Command not acknowledged");
            return Err(e);
        }
        info!(%port, operation = operation.name(), "Port switched");
        Ok(())
    }

    /// Power a port on.
    pub fn raise(&mut self, port: Port) -> Result<()> {
        self.actuate(Operation::Raise, port)
    }

    /// Power a port off.
    pub fn lower(&mut self, port: Port) -> Result<()> {
        self.actuate(Operation::Lower, port)
    }

    /// Power a port on or off.
    pub fn set_state(&mut self, port: Port, state: PortState) -> Result<()> {
        match state {
            PortState::On => self.raise(port),
            PortState::Off => self.lower(port),
        }
    }

    /// Power all ports on with a single command.
    pub fn raise_all(&mut self) -> Result<()> {
        self.raise(Port::All)
    }

    /// Power all ports off with a single command.
    pub fn lower_all(&mut self) -> Result<()> {
        self.lower(Port::All)
    }

    /// Read the power state of an individual port.
    pub fn query_state(&mut self, port: Port) -> Result<PortState> {
        let cmd = Command::new(Operation::QueryState, port)?;
        let resp = exchange(self.transport()?, &cmd)?;
        let state = resp.port_state(&cmd).inspect_err(|e| {
            warn!(%port, error = %e, "State query failed");
        })?;
        debug!(%port, %state, "Port state");
        Ok(state)
    }

    /// Query ports 1, 2 and 3 in that order. The first failure aborts the
    /// whole snapshot.
    pub fn query_all_states(&mut self) -> Result<PortStates> {
        Ok(PortStates {
            port1: self.query_state(Port::Port1)?,
            port2: self.query_state(Port::Port2)?,
            port3: self.query_state(Port::Port3)?,
        })
    }
}

impl std::fmt::Debug for Ykush3 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ykush3")
            .field("connected", &self.is_connected())
            .field("serial", &self.serial)
            .finish()
    }
}
