use ad9959_core::common::PHASE_RESOLUTION;
use derive_more::Display;
use zerocopy::{byteorder::big_endian::U16, IntoBytes};

use super::{round_half_up, Frame, HEADER_SIZE};
use crate::{
    error::DriverError,
    limits::{finite, Quantity},
};

/// A phase offset in degrees, wrapped into `[0, 360)`.
#[derive(Debug, Clone, Copy, PartialEq, Display)]
#[display("{}°", degrees)]
pub struct Phase {
    degrees: f64,
}

impl Phase {
    /// Zero phase offset.
    pub const ZERO: Self = Self { degrees: 0. };

    /// Creates a new [`Phase`]. `degrees` is wrapped into `[0, 360)`.
    pub fn from_degrees(degrees: f64) -> Result<Self, DriverError> {
        Ok(Self {
            degrees: finite(Quantity::Phase, degrees)?.rem_euclid(360.),
        })
    }

    /// Returns the wrapped phase in degrees.
    #[must_use]
    pub const fn degrees(&self) -> f64 {
        self.degrees
    }

    /// Returns the 14-bit phase offset word.
    #[must_use]
    pub fn word(&self) -> u16 {
        (round_half_up(self.degrees / 360. * PHASE_RESOLUTION as f64) as u16)
            & (PHASE_RESOLUTION - 1)
    }

    /// Returns the phase realized by [`Phase::word`].
    #[must_use]
    pub fn realized(&self) -> f64 {
        self.word() as f64 / PHASE_RESOLUTION as f64 * 360.
    }
}

impl Frame for Phase {
    fn required_size(&self) -> usize {
        HEADER_SIZE + size_of::<U16>()
    }

    fn pack(&self, tx: &mut [u8]) -> usize {
        tx[..size_of::<U16>()].copy_from_slice(U16::new(self.word()).as_bytes());
        size_of::<U16>()
    }
}
