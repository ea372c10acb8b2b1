mod amplitude;
mod divider;
mod frequency;
mod header;
mod phase;
mod ramp;

pub use amplitude::Amplitude;
pub use divider::Divider;
pub use frequency::FrequencyList;
pub use header::{FrameHeader, Opcode, UnknownOpcode, HEADER_SIZE};
pub use phase::Phase;
pub use ramp::{RampFrame, RAMP_PAYLOAD_SIZE};

use ad9959_core::channel::Channel;
use derive_more::Display;

use crate::ramp::RampRegisters;

/// Rounds to the nearest integer, with halves rounded up.
#[inline]
pub(crate) fn round_half_up(x: f64) -> f64 {
    (x + 0.5).floor()
}

pub(crate) trait Frame {
    #[must_use]
    fn required_size(&self) -> usize;
    fn pack(&self, tx: &mut [u8]) -> usize;
}

/// One instruction to the bridge. Each command is encoded into exactly one frame.
#[derive(Debug, Clone, PartialEq, Display)]
pub enum Command {
    /// Programs the frequency list of a channel. The output starts at the first element.
    #[display("SetFrequency({channel}, {} values)", values.len())]
    SetFrequency {
        /// The target channel.
        channel: Channel,
        /// The device-side frequency words.
        values: FrequencyList,
    },
    /// Sets the phase offset of a channel.
    #[display("SetPhase({channel}, {phase})")]
    SetPhase {
        /// The target channel.
        channel: Channel,
        /// The phase offset.
        phase: Phase,
    },
    /// Sets the amplitude of a channel.
    #[display("SetAmplitude({channel}, {amplitude})")]
    SetAmplitude {
        /// The target channel.
        channel: Channel,
        /// The amplitude.
        amplitude: Amplitude,
    },
    /// Programs a linear frequency sweep.
    #[display("SetRamp({channel})")]
    SetRamp {
        /// The target channel.
        channel: Channel,
        /// The ramp registers.
        registers: RampRegisters,
    },
}

impl Command {
    /// Returns the channel the command is addressed to.
    #[must_use]
    pub const fn channel(&self) -> Channel {
        match self {
            Self::SetFrequency { channel, .. }
            | Self::SetPhase { channel, .. }
            | Self::SetAmplitude { channel, .. }
            | Self::SetRamp { channel, .. } => *channel,
        }
    }

    /// Returns the opcode of the frame.
    #[must_use]
    pub const fn opcode(&self) -> Opcode {
        match self {
            Self::SetFrequency { .. } => Opcode::SetFrequency,
            Self::SetPhase { .. } => Opcode::SetPhase,
            Self::SetAmplitude { .. } => Opcode::SetAmplitude,
            Self::SetRamp { .. } => Opcode::SetRamp,
        }
    }

    /// Encodes the command into the bytes of one frame.
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        let mut tx = vec![0x00; self.required_size()];
        let size = self.pack(&mut tx);
        debug_assert_eq!(size, tx.len());
        tx
    }
}

impl Frame for Command {
    fn required_size(&self) -> usize {
        match self {
            Self::SetFrequency { values, .. } => values.required_size(),
            Self::SetPhase { phase, .. } => phase.required_size(),
            Self::SetAmplitude { amplitude, .. } => amplitude.required_size(),
            Self::SetRamp { registers, .. } => RampFrame::from(*registers).required_size(),
        }
    }

    fn pack(&self, tx: &mut [u8]) -> usize {
        let header = FrameHeader::new(self.channel(), self.opcode(), self.count());
        let offset = header.pack(tx);
        offset
            + match self {
                Self::SetFrequency { values, .. } => values.pack(&mut tx[offset..]),
                Self::SetPhase { phase, .. } => phase.pack(&mut tx[offset..]),
                Self::SetAmplitude { amplitude, .. } => amplitude.pack(&mut tx[offset..]),
                Self::SetRamp { registers, .. } => {
                    RampFrame::from(*registers).pack(&mut tx[offset..])
                }
            }
    }
}

impl Command {
    fn count(&self) -> u8 {
        match self {
            Self::SetFrequency { values, .. } => values.count(),
            Self::SetPhase { .. } | Self::SetAmplitude { .. } => 1,
            Self::SetRamp { .. } => 0,
        }
    }
}
