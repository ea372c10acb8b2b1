use ad9959_core::link::{Link, LinkError};
use ad9959_firmware_emulator::BridgeEmulator;

#[derive(Debug, Default, Clone, Copy)]
#[doc(hidden)]
pub struct AuditOption {
    pub broken: bool,
}

/// A [`Link`] that records every frame and feeds it into an emulated bridge.
#[doc(hidden)]
#[derive(Debug, Default)]
pub struct Audit {
    option: AuditOption,
    is_open: bool,
    bridge: BridgeEmulator,
    frames: Vec<Vec<u8>>,
    broken: bool,
}

impl std::ops::Deref for Audit {
    type Target = BridgeEmulator;

    fn deref(&self) -> &Self::Target {
        &self.bridge
    }
}

impl std::ops::DerefMut for Audit {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.bridge
    }
}

impl Audit {
    pub fn new(option: AuditOption) -> Self {
        Self {
            option,
            ..Default::default()
        }
    }

    /// Returns every frame written since the link was opened, in order.
    pub fn frames(&self) -> &[Vec<u8>] {
        &self.frames
    }

    pub fn clear_frames(&mut self) {
        self.frames.clear();
    }

    pub fn break_down(&mut self) {
        self.broken = true;
    }

    pub fn repair(&mut self) {
        self.broken = false;
    }
}

impl Link for Audit {
    fn open(&mut self) -> Result<(), LinkError> {
        self.is_open = true;
        self.bridge = BridgeEmulator::new();
        self.frames.clear();
        self.broken = self.option.broken;
        Ok(())
    }

    fn close(&mut self) -> Result<(), LinkError> {
        self.is_open = false;
        Ok(())
    }

    fn send(&mut self, frame: &[u8]) -> Result<(), LinkError> {
        if self.broken {
            return Err(LinkError::new("broken"));
        }
        self.ensure_is_open()?;

        self.frames.push(frame.to_vec());
        self.bridge.receive(frame);

        Ok(())
    }

    fn is_open(&self) -> bool {
        self.is_open
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn broken() -> anyhow::Result<()> {
        let mut link = Audit::new(AuditOption { broken: true });
        link.open()?;
        assert_eq!(Err(LinkError::new("broken")), link.send(&[0x00, 0x02, 0x01, 0x00, 0x00]));
        link.repair();
        link.send(&[0x00, 0x02, 0x01, 0x10, 0x00])?;
        assert_eq!(1, link.frames().len());
        assert_eq!(4096, link.channel(ad9959_core::channel::Channel::CH0).phase_word());
        link.close()?;
        assert_eq!(Err(LinkError::closed()), link.send(&[0x00]));
        Ok(())
    }
}
