use ad9959_driver::{firmware::UnknownOpcode, Channel};
use thiserror::Error;

/// A malformed frame observed by the emulator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EmulatorError {
    /// The opcode is not known. The rest of the pending bytes are dropped.
    #[error(transparent)]
    UnknownOpcode(#[from] UnknownOpcode),
    /// The address byte does not refer to a channel. The frame is dropped.
    #[error("Invalid channel address ({0})")]
    InvalidAddress(u8),
    /// A frequency frame without any frequency.
    #[error("Empty frequency list on {0}")]
    EmptyFrequencyList(Channel),
}
