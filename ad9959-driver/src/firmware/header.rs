use ad9959_core::channel::Channel;
use thiserror::Error;
use zerocopy::{Immutable, IntoBytes};

use super::Frame;

/// The size of [`FrameHeader`] in bytes.
pub const HEADER_SIZE: usize = size_of::<FrameHeader>();

/// The second byte of a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoBytes, Immutable)]
#[repr(u8)]
#[non_exhaustive]
pub enum Opcode {
    /// Programs a frequency list.
    SetFrequency = 0x01,
    /// Sets a phase offset.
    SetPhase = 0x02,
    /// Programs a linear sweep.
    SetRamp = 0x03,
    /// Sets an amplitude.
    SetAmplitude = 0x04,
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Unknown opcode ({0:#04X})")]
/// An error produced when a byte is not a known [`Opcode`].
pub struct UnknownOpcode(pub u8);

impl TryFrom<u8> for Opcode {
    type Error = UnknownOpcode;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0x01 => Ok(Self::SetFrequency),
            0x02 => Ok(Self::SetPhase),
            0x03 => Ok(Self::SetRamp),
            0x04 => Ok(Self::SetAmplitude),
            v => Err(UnknownOpcode(v)),
        }
    }
}

/// The first three bytes of every frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoBytes, Immutable)]
#[repr(C)]
pub struct FrameHeader {
    /// The channel the frame is addressed to.
    pub address: u8,
    /// The opcode.
    pub opcode: Opcode,
    /// The number of elements in the payload.
    pub count: u8,
}

impl FrameHeader {
    pub(crate) const fn new(channel: Channel, opcode: Opcode, count: u8) -> Self {
        Self {
            address: channel.idx(),
            opcode,
            count,
        }
    }
}

impl Frame for FrameHeader {
    fn required_size(&self) -> usize {
        HEADER_SIZE
    }

    fn pack(&self, tx: &mut [u8]) -> usize {
        tx[..HEADER_SIZE].copy_from_slice(self.as_bytes());
        HEADER_SIZE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size() {
        assert_eq!(3, HEADER_SIZE);
    }

    #[rstest::rstest]
    #[case(Ok(Opcode::SetFrequency), 1)]
    #[case(Ok(Opcode::SetPhase), 2)]
    #[case(Ok(Opcode::SetRamp), 3)]
    #[case(Ok(Opcode::SetAmplitude), 4)]
    #[case(Err(UnknownOpcode(0)), 0)]
    #[case(Err(UnknownOpcode(5)), 5)]
    fn try_from(#[case] expect: Result<Opcode, UnknownOpcode>, #[case] v: u8) {
        assert_eq!(expect, Opcode::try_from(v));
    }

    #[test]
    fn pack() {
        let mut tx = [0x00; HEADER_SIZE];
        assert_eq!(
            HEADER_SIZE,
            FrameHeader::new(Channel::CH3, Opcode::SetAmplitude, 1).pack(&mut tx)
        );
        assert_eq!([0x03, 0x04, 0x01], tx);
    }

    #[test]
    fn display() {
        assert_eq!("Unknown opcode (0x07)", UnknownOpcode(0x07).to_string());
    }
}
