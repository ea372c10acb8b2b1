use ad9959_driver::{
    firmware::{Opcode, RampFrame, HEADER_SIZE, RAMP_PAYLOAD_SIZE},
    Channel,
};
use zerocopy::{
    byteorder::big_endian::{U16, U32},
    FromBytes,
};

use crate::{channel::ChannelEmulator, error::EmulatorError};

/// A model of the bridge that consumes the serial byte stream.
///
/// Bytes are buffered until a complete frame is available, so a frame may arrive in any number of
/// pieces.
#[derive(Debug, Clone, Default)]
pub struct BridgeEmulator {
    channels: [ChannelEmulator; Channel::NUM],
    pending: Vec<u8>,
    frames: usize,
    errors: Vec<EmulatorError>,
}

impl BridgeEmulator {
    /// Creates a bridge in its power-on state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the state of `channel`.
    #[must_use]
    pub fn channel(&self, channel: Channel) -> &ChannelEmulator {
        &self.channels[channel.idx() as usize]
    }

    /// Returns the state of all channels in ascending order.
    #[must_use]
    pub fn channels(&self) -> &[ChannelEmulator] {
        &self.channels
    }

    /// Returns the number of frames applied.
    #[must_use]
    pub const fn frames(&self) -> usize {
        self.frames
    }

    /// Returns the malformed frames seen so far.
    #[must_use]
    pub fn errors(&self) -> &[EmulatorError] {
        &self.errors
    }

    /// Returns the number of bytes waiting for the rest of their frame.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// A rising edge on the step pin of `channel`.
    pub fn step(&mut self, channel: Channel) {
        self.channels[channel.idx() as usize].step();
    }

    /// A rising edge on the reset pin of `channel`.
    pub fn reset(&mut self, channel: Channel) {
        self.channels[channel.idx() as usize].reset();
    }

    /// Consumes bytes from the serial port.
    pub fn receive(&mut self, data: &[u8]) {
        self.pending.extend_from_slice(data);
        while let Some(size) = self.try_apply() {
            self.pending.drain(..size);
        }
    }

    fn try_apply(&mut self) -> Option<usize> {
        let (address, opcode, count) = match self.pending[..] {
            [address, opcode, count, ..] => (address, opcode, count as usize),
            _ => return None,
        };
        let opcode = match Opcode::try_from(opcode) {
            Ok(opcode) => opcode,
            Err(e) => {
                self.errors.push(e.into());
                return Some(self.pending.len());
            }
        };
        let payload_size = match opcode {
            Opcode::SetFrequency => count * size_of::<U32>(),
            Opcode::SetPhase | Opcode::SetAmplitude => count * size_of::<U16>(),
            _ => RAMP_PAYLOAD_SIZE,
        };
        let size = HEADER_SIZE + payload_size;
        if self.pending.len() < size {
            return None;
        }

        let Ok(channel) = Channel::new(address) else {
            self.errors.push(EmulatorError::InvalidAddress(address));
            return Some(size);
        };
        let payload = &self.pending[HEADER_SIZE..size];
        let ch = &mut self.channels[channel.idx() as usize];
        match opcode {
            Opcode::SetFrequency => {
                if count == 0 {
                    self.errors.push(EmulatorError::EmptyFrequencyList(channel));
                    return Some(size);
                }
                ch.set_freq_list(
                    payload
                        .chunks_exact(size_of::<U32>())
                        .filter_map(|b| U32::read_from_bytes(b).ok())
                        .map(U32::get)
                        .collect(),
                );
            }
            Opcode::SetPhase => {
                if let Some(w) = last_u16(payload) {
                    ch.phase_word = w & (ad9959_driver::PHASE_RESOLUTION - 1);
                }
            }
            Opcode::SetAmplitude => {
                if let Some(w) = last_u16(payload) {
                    ch.amplitude_word = w.min(ad9959_driver::AMPLITUDE_FULL_SCALE);
                }
            }
            _ => {
                ch.ramp = RampFrame::read_from_bytes(payload).ok().map(Into::into);
            }
        }
        self.frames += 1;
        Some(size)
    }
}

fn last_u16(payload: &[u8]) -> Option<u16> {
    payload
        .chunks_exact(size_of::<U16>())
        .last()
        .and_then(|b| U16::read_from_bytes(b).ok())
        .map(U16::get)
}
