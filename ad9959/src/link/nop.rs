use ad9959_core::link::{Link, LinkError};
use ad9959_firmware_emulator::BridgeEmulator;

/// A [`Link`] that feeds every frame into an emulated bridge.
///
/// This link is mainly used for explanation.
#[derive(Debug, Default)]
pub struct Nop {
    is_open: bool,
    bridge: BridgeEmulator,
}

impl Nop {
    /// Creates a new [`Nop`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Link for Nop {
    fn open(&mut self) -> Result<(), LinkError> {
        self.is_open = true;
        self.bridge = BridgeEmulator::new();
        Ok(())
    }

    fn close(&mut self) -> Result<(), LinkError> {
        self.is_open = false;
        Ok(())
    }

    fn send(&mut self, frame: &[u8]) -> Result<(), LinkError> {
        self.ensure_is_open()?;
        self.bridge.receive(frame);
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.is_open
    }
}
