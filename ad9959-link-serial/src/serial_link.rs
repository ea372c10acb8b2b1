use std::io::Write;

use ad9959_core::link::{Link, LinkError};
use serialport::SerialPort;

use crate::{error::SerialError, option::SerialOption};

/// A [`Link`] to the bridge over a serial port.
///
/// Each byte of a frame is written individually, then the port is flushed. A write error closes
/// the port.
#[derive(derive_more::Debug)]
pub struct SerialLink {
    path: String,
    option: SerialOption,
    #[debug(skip)]
    port: Option<Box<dyn SerialPort>>,
}

impl SerialLink {
    /// Creates a new [`SerialLink`]. The port is opened by [`Link::open`].
    #[must_use]
    pub fn new(path: impl Into<String>, option: SerialOption) -> Self {
        Self {
            path: path.into(),
            option,
            port: None,
        }
    }

    /// Returns the path of the serial port.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the port settings.
    #[must_use]
    pub const fn option(&self) -> &SerialOption {
        &self.option
    }

    fn open_port(&self) -> Result<Box<dyn SerialPort>, SerialError> {
        let port = serialport::new(&self.path, self.option.baud_rate)
            .timeout(self.option.timeout)
            .data_bits(self.option.data_bits)
            .parity(self.option.parity)
            .stop_bits(self.option.stop_bits)
            .flow_control(self.option.flow_control)
            .open()?;
        Ok(port)
    }
}

impl Link for SerialLink {
    fn open(&mut self) -> Result<(), LinkError> {
        if self.port.is_some() {
            return Ok(());
        }
        tracing::info!("Opening {} at {} baud", self.path, self.option.baud_rate);
        self.port = Some(self.open_port()?);
        Ok(())
    }

    fn close(&mut self) -> Result<(), LinkError> {
        if let Some(mut port) = self.port.take() {
            port.flush().map_err(SerialError::from)?;
            tracing::info!("Closed {}", self.path);
        }
        Ok(())
    }

    fn send(&mut self, frame: &[u8]) -> Result<(), LinkError> {
        let port = self.port.as_mut().ok_or_else(LinkError::closed)?;
        let res = frame
            .iter()
            .try_for_each(|b| port.write_all(std::slice::from_ref(b)))
            .and_then(|_| port.flush());
        if let Err(e) = res {
            tracing::warn!("Dropping {} after write error", self.path);
            self.port = None;
            return Err(SerialError::from(e).into());
        }
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.port.is_some()
    }
}
