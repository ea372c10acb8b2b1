use ad9959_core::common::DIVIDER_RATIO;
use serde::{Deserialize, Serialize};

/// An external frequency divider between the DDS output and the consumer.
///
/// Serialized as a boolean flag: `true` means the ÷32 divider is present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "bool", into = "bool")]
pub enum Divider {
    /// The DDS output is used directly.
    #[default]
    None,
    /// The DDS output is divided by [`DIVIDER_RATIO`].
    By32,
}

impl Divider {
    /// Returns the division ratio.
    #[must_use]
    pub const fn ratio(self) -> u32 {
        match self {
            Self::None => 1,
            Self::By32 => DIVIDER_RATIO,
        }
    }

    /// Returns `true` if the divider is present.
    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::By32)
    }
}

impl From<bool> for Divider {
    fn from(value: bool) -> Self {
        if value {
            Self::By32
        } else {
            Self::None
        }
    }
}

impl From<Divider> for bool {
    fn from(value: Divider) -> Self {
        value.is_active()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ratio() {
        assert_eq!(1, Divider::None.ratio());
        assert_eq!(32, Divider::By32.ratio());
    }

    #[test]
    fn serde() -> anyhow::Result<()> {
        assert_eq!(Divider::By32, serde_json::from_str::<Divider>("true")?);
        assert_eq!(Divider::None, serde_json::from_str::<Divider>("false")?);
        assert_eq!("true", serde_json::to_string(&Divider::By32)?);
        Ok(())
    }
}
