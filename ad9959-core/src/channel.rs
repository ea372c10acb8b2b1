use std::str::FromStr;

use derive_more::Display;
use thiserror::Error;

/// An error produced when a channel identifier is invalid.
#[derive(Error, Debug, PartialEq, Eq, Clone)]
pub enum ChannelError {
    /// The channel number is not one of the physical channels.
    #[error("Channel ({0}) is out of range ([0, {max}])", max = Channel::NUM - 1)]
    OutOfRange(u8),
    /// The channel descriptor cannot be parsed.
    #[error("Invalid channel descriptor: {0:?}")]
    InvalidDescriptor(String),
}

/// A physical channel of the DDS.
///
/// A channel can only be constructed through [`Channel::new`] or the [`TryFrom`]/[`FromStr`] conversions,
/// so a value of this type always refers to an existing channel.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Display)]
#[display("ch{}", _0)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "ChannelRepr", into = "u8")
)]
pub struct Channel(u8);

impl Channel {
    /// The number of physical channels.
    pub const NUM: usize = 4;

    /// Channel 0
    pub const CH0: Channel = Channel(0);
    /// Channel 1
    pub const CH1: Channel = Channel(1);
    /// Channel 2
    pub const CH2: Channel = Channel(2);
    /// Channel 3
    pub const CH3: Channel = Channel(3);

    /// Creates a new [`Channel`].
    pub const fn new(idx: u8) -> Result<Self, ChannelError> {
        if (idx as usize) < Self::NUM {
            Ok(Self(idx))
        } else {
            Err(ChannelError::OutOfRange(idx))
        }
    }

    /// Returns the channel number, which is also the address byte of a frame.
    #[must_use]
    pub const fn idx(self) -> u8 {
        self.0
    }

    /// Returns an iterator over all physical channels in ascending order.
    pub fn all() -> impl Iterator<Item = Channel> {
        (0..Self::NUM as u8).map(Channel)
    }
}

impl TryFrom<u8> for Channel {
    type Error = ChannelError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Channel> for u8 {
    fn from(value: Channel) -> Self {
        value.0
    }
}

/// Accepts either a bare number (`"2"`) or a `ch`-prefixed descriptor (`"ch2"`).
impl FromStr for Channel {
    type Err = ChannelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let digits = s
            .strip_prefix("ch")
            .or_else(|| s.strip_prefix("CH"))
            .unwrap_or(s);
        digits
            .parse::<u8>()
            .map_err(|_| ChannelError::InvalidDescriptor(s.to_string()))
            .and_then(Self::new)
    }
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
#[serde(untagged)]
enum ChannelRepr {
    Number(u8),
    Descriptor(String),
}

#[cfg(feature = "serde")]
impl TryFrom<ChannelRepr> for Channel {
    type Error = ChannelError;

    fn try_from(value: ChannelRepr) -> Result<Self, Self::Error> {
        match value {
            ChannelRepr::Number(n) => Self::new(n),
            ChannelRepr::Descriptor(s) => s.parse(),
        }
    }
}
