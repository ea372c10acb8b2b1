use super::{Freq, Hz, MHz, kHz};

impl core::ops::Mul<Hz> for f64 {
    type Output = Freq<f64>;

    fn mul(self, _rhs: Hz) -> Self::Output {
        Self::Output { freq: self }
    }
}

impl core::ops::Mul<kHz> for f64 {
    type Output = Freq<f64>;

    fn mul(self, _rhs: kHz) -> Self::Output {
        Self::Output { freq: self * 1e3 }
    }
}

impl core::ops::Mul<MHz> for f64 {
    type Output = Freq<f64>;

    fn mul(self, _rhs: MHz) -> Self::Output {
        Self::Output { freq: self * 1e6 }
    }
}

impl Freq<f64> {
    /// Returns `true` if the frequency is neither NaN nor infinite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.freq.is_finite()
    }

    /// Clamps the frequency into `[min, max]`.
    #[must_use]
    pub fn clamp(self, min: Freq<f64>, max: Freq<f64>) -> Self {
        Self {
            freq: self.freq.clamp(min.freq, max.freq),
        }
    }
}
