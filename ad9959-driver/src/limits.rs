use ad9959_core::common::{Freq, LOWER_FREQ_LIMIT, UPPER_FREQ_LIMIT};
use derive_more::Display;
use derive_new::new;
use getset::{CopyGetters, Getters};
use serde::{Deserialize, Serialize};

use crate::{error::DriverError, firmware::Divider};

/// The kind of value a limit is applied to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Quantity {
    /// Frequency in Hz.
    Frequency,
    /// Phase offset in degrees.
    Phase,
    /// Amplitude as a fraction of full scale.
    Amplitude,
}

/// The frequency range a channel can be commanded to.
#[derive(Debug, Clone, Copy, PartialEq, CopyGetters)]
pub struct DeviceLimits {
    /// The lowest frequency.
    #[getset(get_copy = "pub")]
    lower: Freq<f64>,
    /// The highest frequency.
    #[getset(get_copy = "pub")]
    upper: Freq<f64>,
}

impl DeviceLimits {
    /// Limits of a channel connected directly to the DDS output.
    pub const DIRECT: Self = Self {
        lower: LOWER_FREQ_LIMIT,
        upper: UPPER_FREQ_LIMIT,
    };

    /// Creates a new [`DeviceLimits`].
    ///
    /// Fails unless both limits are finite and `lower` is at most `upper`.
    pub fn new(lower: Freq<f64>, upper: Freq<f64>) -> Result<Self, DriverError> {
        if !lower.is_finite() || !upper.is_finite() || lower > upper {
            return Err(DriverError::InvalidConfig(format!(
                "invalid frequency limits [{:?}, {:?}]",
                lower, upper
            )));
        }
        Ok(Self { lower, upper })
    }

    /// Limits of a channel whose signal path goes through `divider`.
    ///
    /// The limits are expressed in the frequency the caller asks for, i.e. before the divider.
    #[must_use]
    pub fn with_divider(divider: Divider) -> Self {
        let ratio = divider.ratio() as f64;
        Self {
            lower: LOWER_FREQ_LIMIT * ratio,
            upper: UPPER_FREQ_LIMIT * ratio,
        }
    }

    /// Returns `true` if `freq` lies in `[lower, upper]`.
    #[must_use]
    pub fn contains(&self, freq: Freq<f64>) -> bool {
        self.lower <= freq && freq <= self.upper
    }
}

impl Default for DeviceLimits {
    fn default() -> Self {
        Self::DIRECT
    }
}

/// A value that a limit was applied to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    /// The value supplied by the caller.
    pub requested: f64,
    /// The value after clipping.
    pub coerced: f64,
}

/// A non-fatal notice that values were clipped to the limits of a device.
#[derive(new, Debug, Clone, PartialEq, Getters)]
#[getset(get = "pub")]
pub struct LimitWarning {
    /// The name of the device.
    #[new(into)]
    device: String,
    /// The kind of value that was clipped.
    quantity: Quantity,
    /// Every value that changed.
    violations: Vec<Violation>,
}

impl std::fmt::Display for LimitWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} input into DDS {} is not within limits: ",
            self.quantity, self.device
        )?;
        self.violations.iter().enumerate().try_for_each(|(i, v)| {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{} -> {}", v.requested, v.coerced)
        })
    }
}

/// The result of applying a limit.
#[derive(Debug, Clone, PartialEq)]
pub struct Coerced<T> {
    /// The value after clipping.
    pub value: T,
    /// [`Some`] if any value was clipped.
    pub warning: Option<LimitWarning>,
}

impl<T> Coerced<T> {
    fn new(value: T, warning: Option<LimitWarning>) -> Self {
        if let Some(w) = &warning {
            tracing::warn!(device = %w.device, quantity = %w.quantity, "{}", w);
        }
        Self { value, warning }
    }

    /// Returns the value, discarding the warning.
    pub fn into_inner(self) -> T {
        self.value
    }

    /// Returns `true` if any value was clipped.
    #[must_use]
    pub const fn is_clipped(&self) -> bool {
        self.warning.is_some()
    }
}

/// Returns `true` if every value lies in the limits.
#[must_use]
pub fn check_frequency(values: &[Freq<f64>], limits: &DeviceLimits) -> bool {
    values.iter().all(|&f| limits.contains(f))
}

/// Validates and clips values against the limits of one device.
///
/// Clipping is a recoverable correction: every `coerce_*` method returns the corrected value and
/// emits at most one warning per call.
#[derive(Debug, Clone, PartialEq, Getters, CopyGetters)]
pub struct LimitPolicy {
    /// The name of the device used in warnings.
    #[getset(get = "pub")]
    device: String,
    /// The frequency limits.
    #[getset(get_copy = "pub")]
    limits: DeviceLimits,
}

impl LimitPolicy {
    /// Creates a new [`LimitPolicy`].
    pub fn new(device: impl Into<String>, limits: DeviceLimits) -> Self {
        Self {
            device: device.into(),
            limits,
        }
    }

    /// See [`check_frequency`].
    #[must_use]
    pub fn check_frequency(&self, values: &[Freq<f64>]) -> bool {
        check_frequency(values, &self.limits)
    }

    /// Clamps every frequency into the limits.
    pub fn coerce_frequency(&self, values: &[Freq<f64>]) -> Coerced<Vec<Freq<f64>>> {
        let coerced = values
            .iter()
            .map(|&f| f.clamp(self.limits.lower, self.limits.upper))
            .collect::<Vec<_>>();
        let violations = values
            .iter()
            .zip(coerced.iter())
            .filter(|(requested, coerced)| requested != coerced)
            .map(|(requested, coerced)| Violation {
                requested: requested.hz(),
                coerced: coerced.hz(),
            })
            .collect::<Vec<_>>();
        self.coerced(coerced, Quantity::Frequency, violations)
    }

    /// Clamps the phase in degrees into `[0, 360]`.
    ///
    /// Any value outside of `[0, 360)` is reported, so `360` itself passes through unchanged but
    /// with a warning. The encoder wraps it to `0`.
    pub fn coerce_phase(&self, degrees: f64) -> Coerced<f64> {
        self.coerce_scalar(degrees, Quantity::Phase, 0.0, 360.0, |v| {
            (0.0..360.0).contains(&v)
        })
    }

    /// Clamps the amplitude into `[0, 1]`.
    ///
    /// Only values in the open interval `(0, 1)` pass silently.
    pub fn coerce_amplitude(&self, fraction: f64) -> Coerced<f64> {
        self.coerce_scalar(fraction, Quantity::Amplitude, 0.0, 1.0, |v| 0.0 < v && v < 1.0)
    }

    /// Fails if any frequency is not finite.
    pub fn validate_frequency(&self, values: &[Freq<f64>]) -> Result<(), DriverError> {
        values
            .iter()
            .try_for_each(|f| finite(Quantity::Frequency, f.hz()).map(|_| ()))
    }

    fn coerce_scalar(
        &self,
        value: f64,
        quantity: Quantity,
        min: f64,
        max: f64,
        in_range: impl Fn(f64) -> bool,
    ) -> Coerced<f64> {
        if in_range(value) {
            return Coerced::new(value, None);
        }
        let coerced = value.clamp(min, max);
        self.coerced(
            coerced,
            quantity,
            vec![Violation {
                requested: value,
                coerced,
            }],
        )
    }

    fn coerced<T>(&self, value: T, quantity: Quantity, violations: Vec<Violation>) -> Coerced<T> {
        let warning =
            (!violations.is_empty()).then(|| LimitWarning::new(&self.device, quantity, violations));
        Coerced::new(value, warning)
    }
}

/// Fails with [`DriverError::NonFinite`] if `value` is NaN or infinite.
pub fn finite(quantity: Quantity, value: f64) -> Result<f64, DriverError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(DriverError::NonFinite(quantity, value))
    }
}
