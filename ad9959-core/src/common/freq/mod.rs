mod float;
mod int;

/// \[Hz\]
pub struct Hz;

/// \[kHz\]
#[allow(non_camel_case_types)]
pub struct kHz;

/// \[MHz\]
pub struct MHz;

/// Frequency
#[derive(Clone, Copy, PartialEq, PartialOrd)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct Freq<T: Copy> {
    pub(crate) freq: T,
}

impl<T: Copy> core::fmt::Debug for Freq<T>
where
    T: core::fmt::Display,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{} Hz", self.freq)
    }
}

impl<T: Copy> Freq<T> {
    #[inline]
    /// Returns the frequency in Hz.
    pub const fn hz(&self) -> T {
        self.freq
    }
}

impl<T> core::ops::Add<Freq<T>> for Freq<T>
where
    T: core::ops::Add<Output = T> + Copy,
{
    type Output = Freq<T>;

    fn add(self, rhs: Freq<T>) -> Self::Output {
        Freq {
            freq: self.freq + rhs.freq,
        }
    }
}

impl<T> core::ops::Sub<Freq<T>> for Freq<T>
where
    T: core::ops::Sub<Output = T> + Copy,
{
    type Output = Freq<T>;

    fn sub(self, rhs: Freq<T>) -> Self::Output {
        Freq {
            freq: self.freq - rhs.freq,
        }
    }
}

impl<T, U> core::ops::Mul<U> for Freq<T>
where
    T: core::ops::Mul<U, Output = T> + Copy,
{
    type Output = Freq<T>;

    fn mul(self, rhs: U) -> Self::Output {
        Freq {
            freq: self.freq * rhs,
        }
    }
}

impl<T, U> core::ops::Div<U> for Freq<T>
where
    T: core::ops::Div<U, Output = T> + Copy,
{
    type Output = Freq<T>;

    fn div(self, rhs: U) -> Self::Output {
        Freq {
            freq: self.freq / rhs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ops() {
        assert_eq!(200 * Hz, 100 * Hz + 100 * Hz);
        assert_eq!(0 * Hz, 100 * Hz - 100 * Hz);
        assert_eq!(200 * Hz, 100 * Hz * 2);
        assert_eq!(50 * Hz, 100 * Hz / 2);
        assert_eq!(1.25e6 * Hz, 40e6 * Hz / 32.);
    }

    #[test]
    fn units() {
        assert_eq!(10_000 * Hz, 10 * kHz);
        assert_eq!(35_500_000 * Hz, 35 * MHz + 500 * kHz);
        assert_eq!(35.5e6 * Hz, 35.5 * MHz);
        assert_eq!(Freq::<f64>::from(400 * MHz), 400e6 * Hz);
    }

    #[test]
    fn clamp() {
        assert_eq!(10. * Hz, (5. * Hz).clamp(10. * Hz, 20. * Hz));
        assert_eq!(20. * Hz, (25. * Hz).clamp(10. * Hz, 20. * Hz));
        assert!(!(f64::NAN * Hz).is_finite());
    }

    #[test]
    fn dbg() {
        assert_eq!(format!("{:?}", 100 * Hz), "100 Hz");
        assert_eq!(format!("{:?}", 100 * kHz), "100000 Hz");
        assert_eq!(format!("{:?}", 1.5 * kHz), "1500 Hz");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serde_transparent() -> anyhow::Result<()> {
        assert_eq!("35500000.0", serde_json::to_string(&(35.5 * MHz))?);
        assert_eq!(
            1250e6 * Hz,
            serde_json::from_str::<Freq<f64>>("1250000000.0")?
        );
        Ok(())
    }
}
