use ad9959_core::common::{Freq, Hz, FREQ_LIST_LEN_MAX};
use zerocopy::{byteorder::big_endian::U32, IntoBytes};

use super::{round_half_up, Divider, Frame};
use crate::{
    error::DriverError,
    limits::{finite, Quantity},
};

/// A device-side frequency list: the words written to the tuning registers, in Hz.
///
/// The list always holds between 1 and [`FREQ_LIST_LEN_MAX`] words.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyList {
    words: Vec<u32>,
}

impl FrequencyList {
    /// Creates a new [`FrequencyList`] from raw register words.
    pub fn new(words: Vec<u32>) -> Result<Self, DriverError> {
        match words.len() {
            0 => Err(DriverError::EmptyFrequencyList),
            n if n > FREQ_LIST_LEN_MAX => Err(DriverError::FrequencyListTooLong(n)),
            _ => Ok(Self { words }),
        }
    }

    /// Converts the requested frequencies into register words.
    ///
    /// With an active divider each value is divided by the ratio before rounding, so the divided
    /// output matches the request.
    pub fn from_hz(values: &[Freq<f64>], divider: Divider) -> Result<Self, DriverError> {
        let ratio = divider.ratio() as f64;
        values
            .iter()
            .map(|f| {
                let word = round_half_up(finite(Quantity::Frequency, f.hz())? / ratio);
                if (0.0..=u32::MAX as f64).contains(&word) {
                    Ok(word as u32)
                } else {
                    Err(DriverError::FrequencyNotRepresentable(f.hz()))
                }
            })
            .collect::<Result<Vec<_>, _>>()
            .and_then(Self::new)
    }

    /// Returns the register words.
    #[must_use]
    pub fn words(&self) -> &[u32] {
        &self.words
    }

    /// Returns the number of words.
    #[must_use]
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Returns `true` if the list holds no word, which a constructed list never does.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Returns the frequencies the consumer sees after `divider`.
    #[must_use]
    pub fn realized(&self, divider: Divider) -> Vec<Freq<f64>> {
        self.words
            .iter()
            .map(|&w| (w as f64 * divider.ratio() as f64) * Hz)
            .collect()
    }

    pub(crate) fn count(&self) -> u8 {
        self.words.len() as u8
    }
}

impl Frame for FrequencyList {
    fn required_size(&self) -> usize {
        super::HEADER_SIZE + self.words.len() * size_of::<U32>()
    }

    fn pack(&self, tx: &mut [u8]) -> usize {
        self.words
            .iter()
            .map(|&w| U32::new(w))
            .zip(tx.chunks_exact_mut(size_of::<U32>()))
            .for_each(|(w, dst)| dst.copy_from_slice(w.as_bytes()));
        self.words.len() * size_of::<U32>()
    }
}
