use zerocopy::{byteorder::big_endian::U32, FromBytes, Immutable, IntoBytes, KnownLayout};

use super::{Frame, HEADER_SIZE};
use crate::ramp::RampRegisters;

/// The size of the payload of a ramp frame in bytes.
pub const RAMP_PAYLOAD_SIZE: usize = size_of::<RampFrame>();

/// The payload of a ramp frame, in wire order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoBytes, FromBytes, KnownLayout, Immutable)]
#[repr(C)]
pub struct RampFrame {
    start: U32,
    stop: U32,
    rate_up: U32,
    cycles_up: U32,
    rate_down: U32,
    cycles_down: U32,
}

impl From<RampRegisters> for RampFrame {
    fn from(r: RampRegisters) -> Self {
        Self {
            start: U32::new(r.start_word),
            stop: U32::new(r.stop_word),
            rate_up: U32::new(r.rate_up_word),
            cycles_up: U32::new(r.cycles_up),
            rate_down: U32::new(r.rate_down_word),
            cycles_down: U32::new(r.cycles_down),
        }
    }
}

impl From<RampFrame> for RampRegisters {
    fn from(f: RampFrame) -> Self {
        Self {
            start_word: f.start.get(),
            stop_word: f.stop.get(),
            rate_up_word: f.rate_up.get(),
            cycles_up: f.cycles_up.get(),
            rate_down_word: f.rate_down.get(),
            cycles_down: f.cycles_down.get(),
        }
    }
}

impl Frame for RampFrame {
    fn required_size(&self) -> usize {
        HEADER_SIZE + RAMP_PAYLOAD_SIZE
    }

    fn pack(&self, tx: &mut [u8]) -> usize {
        tx[..RAMP_PAYLOAD_SIZE].copy_from_slice(self.as_bytes());
        RAMP_PAYLOAD_SIZE
    }
}
