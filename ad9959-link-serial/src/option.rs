use std::time::Duration;

use serialport::{DataBits, FlowControl, Parity, StopBits};

/// Serial port settings of the bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SerialOption {
    /// The baud rate. The default is 115 200.
    pub baud_rate: u32,
    /// The write timeout. The default is 100 ms.
    pub timeout: Duration,
    /// The number of data bits. The default is eight.
    pub data_bits: DataBits,
    /// The parity. The default is none.
    pub parity: Parity,
    /// The number of stop bits. The default is one.
    pub stop_bits: StopBits,
    /// The flow control. The default is none.
    pub flow_control: FlowControl,
}

impl Default for SerialOption {
    fn default() -> Self {
        Self {
            baud_rate: ad9959_core::common::DEFAULT_BAUD_RATE,
            timeout: Duration::from_millis(100),
            data_bits: DataBits::Eight,
            parity: Parity::None,
            stop_bits: StopBits::One,
            flow_control: FlowControl::None,
        }
    }
}

impl SerialOption {
    /// Sets the baud rate.
    #[must_use]
    pub const fn with_baud_rate(self, baud_rate: u32) -> Self {
        Self { baud_rate, ..self }
    }

    /// Sets the write timeout.
    #[must_use]
    pub const fn with_timeout(self, timeout: Duration) -> Self {
        Self { timeout, ..self }
    }
}
