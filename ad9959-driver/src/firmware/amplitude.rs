use ad9959_core::common::AMPLITUDE_FULL_SCALE;
use derive_more::Display;
use zerocopy::{byteorder::big_endian::U16, IntoBytes};

use super::{round_half_up, Frame, HEADER_SIZE};
use crate::{
    error::DriverError,
    limits::{finite, Quantity},
};

/// An output amplitude as a fraction of full scale.
#[derive(Debug, Clone, Copy, PartialEq, Display)]
#[display("{}", fraction)]
pub struct Amplitude {
    fraction: f64,
}

impl Amplitude {
    /// Creates a new [`Amplitude`].
    ///
    /// # Errors
    ///
    /// Returns [`DriverError::AmplitudeOutOfRange`] if `fraction` is not in `[0, 1]`.
    pub fn new(fraction: f64) -> Result<Self, DriverError> {
        let fraction = finite(Quantity::Amplitude, fraction)?;
        if (0.0..=1.0).contains(&fraction) {
            Ok(Self { fraction })
        } else {
            Err(DriverError::AmplitudeOutOfRange(fraction))
        }
    }

    /// Returns the fraction of full scale.
    #[must_use]
    pub const fn fraction(&self) -> f64 {
        self.fraction
    }

    /// Returns the 10-bit amplitude scale factor word.
    #[must_use]
    pub fn word(&self) -> u16 {
        round_half_up(self.fraction * AMPLITUDE_FULL_SCALE as f64) as u16
    }

    /// Returns the amplitude realized by [`Amplitude::word`].
    #[must_use]
    pub fn realized(&self) -> f64 {
        self.word() as f64 / AMPLITUDE_FULL_SCALE as f64
    }
}

impl Frame for Amplitude {
    fn required_size(&self) -> usize {
        HEADER_SIZE + size_of::<U16>()
    }

    fn pack(&self, tx: &mut [u8]) -> usize {
        tx[..size_of::<U16>()].copy_from_slice(U16::new(self.word()).as_bytes());
        size_of::<U16>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[rstest::rstest]
    #[case(0, 0.)]
    #[case(512, 0.5)]
    #[case(1023, 1.)]
    #[case(1, 0.001)]
    fn word(#[case] expect: u16, #[case] fraction: f64) -> anyhow::Result<()> {
        assert_eq!(expect, Amplitude::new(fraction)?.word());
        Ok(())
    }

    #[rstest::rstest]
    #[case(DriverError::AmplitudeOutOfRange(1.5), 1.5)]
    #[case(DriverError::AmplitudeOutOfRange(-0.1), -0.1)]
    #[case(DriverError::NonFinite(Quantity::Amplitude, f64::NEG_INFINITY), f64::NEG_INFINITY)]
    fn out_of_range(#[case] expect: DriverError, #[case] fraction: f64) {
        assert_eq!(Err(expect), Amplitude::new(fraction));
    }

    #[test]
    fn realized() -> anyhow::Result<()> {
        approx::assert_abs_diff_eq!(512. / 1023., Amplitude::new(0.5)?.realized());
        Ok(())
    }
}
