use ad9959_core::{
    channel::{Channel, ChannelError},
    common::FREQ_LIST_LEN_MAX,
};
use thiserror::Error;

use crate::{limits::Quantity, trigger::SequencingFault};

/// A interface for error handling in ad9959-driver.
///
/// Every variant except [`DriverError::Sequencing`] is a domain error: the input is rejected
/// before any byte of a frame is produced.
#[derive(Error, Debug, PartialEq, Clone)]
#[non_exhaustive]
pub enum DriverError {
    /// The value is NaN or infinite.
    #[error("{0} ({1}) is not a finite number")]
    NonFinite(Quantity, f64),
    /// The frequency cannot be stored in a 32-bit register.
    #[error("Frequency ({0} Hz) cannot be represented by a 32-bit register")]
    FrequencyNotRepresentable(f64),
    /// The frequency list is empty.
    #[error("Frequency list must not be empty")]
    EmptyFrequencyList,
    /// The frequency list does not fit in the count byte.
    #[error("Frequency list length ({0}) is out of range ([1, {max}])", max = FREQ_LIST_LEN_MAX)]
    FrequencyListTooLong(usize),
    /// The amplitude is outside of the full scale.
    #[error("Amplitude ({0}) is out of range ([0, 1])")]
    AmplitudeOutOfRange(f64),
    /// The ramp time is zero, negative or not finite.
    #[error("Ramp time (up: {0} s, down: {1} s) must be positive")]
    InvalidRampTime(f64, f64),
    /// A ramp cannot increment every zero cycles.
    #[error("Clock cycles per increment must be positive")]
    InvalidCyclesPerIncrement,
    /// Channel error.
    #[error("{0}")]
    Channel(#[from] ChannelError),
    /// The channel name is not in the channel mappings.
    #[error("Channel name ({0:?}) is not in the channel mappings")]
    UnknownChannelName(String),
    /// A triggered step was appended to a channel without a trigger line.
    #[error("Channel ({0}) has no trigger line")]
    NoTriggerLine(Channel),
    /// The configuration cannot be loaded.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    /// The compiled timeline cannot be realized on the hardware.
    #[error("{0}")]
    Sequencing(#[from] SequencingFault),
}

impl From<serde_json::Error> for DriverError {
    fn from(e: serde_json::Error) -> Self {
        DriverError::InvalidConfig(e.to_string())
    }
}
