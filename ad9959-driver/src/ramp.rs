use ad9959_core::common::{Freq, SYS_CLK_PERIOD};
use derive_new::new;
use serde::{Deserialize, Serialize};

use crate::{error::DriverError, firmware::round_half_up};

/// The number of clock cycles between increments used for ramps slower than one word per clock.
pub const SLOW_RAMP_CYCLES: u32 = 255 * 4;

/// What to do with a ramp too slow to advance at least one frequency word per increment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlowRampPolicy {
    /// Keep the requested cycles per increment and let the rate word clamp to 1.
    ///
    /// The widened interval of [`SLOW_RAMP_CYCLES`] is reported in the log only.
    #[default]
    Compatible,
    /// Increment every [`SLOW_RAMP_CYCLES`] clock cycles on the slow side and scale its rate word
    /// accordingly.
    Widen,
}

/// A linear frequency sweep between two frequencies.
#[derive(new, Debug, Clone, Copy, PartialEq)]
pub struct RampSpec {
    /// The frequency at the beginning of the ramp.
    pub start: Freq<u32>,
    /// The frequency at the end of the ramp.
    pub stop: Freq<u32>,
    /// The sweep time from `start` to `stop` in seconds.
    pub time_up: f64,
    /// The sweep time from `stop` back to `start` in seconds.
    pub time_down: f64,
}

/// Options for [`RampSpec::registers`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RampOption {
    /// The number of clock cycles between two frequency increments.
    pub cycles_per_increment: u32,
    /// See [`SlowRampPolicy`].
    pub policy: SlowRampPolicy,
    /// The period of one clock cycle in seconds.
    pub sys_clk_period: f64,
}

impl Default for RampOption {
    fn default() -> Self {
        Self {
            cycles_per_increment: 1,
            policy: SlowRampPolicy::default(),
            sys_clk_period: SYS_CLK_PERIOD,
        }
    }
}

/// The register values of a linear sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RampRegisters {
    /// The start frequency word.
    pub start_word: u32,
    /// The stop frequency word.
    pub stop_word: u32,
    /// The frequency increment of the rising sweep.
    pub rate_up_word: u32,
    /// The clock cycles between increments of the rising sweep.
    pub cycles_up: u32,
    /// The frequency decrement of the falling sweep.
    pub rate_down_word: u32,
    /// The clock cycles between decrements of the falling sweep.
    pub cycles_down: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Up,
    Down,
}

impl RampSpec {
    /// Derives the ramp registers.
    ///
    /// The start and stop words are the requested frequencies, unaffected by any divider.
    ///
    /// # Errors
    ///
    /// Returns [`DriverError::InvalidRampTime`] if either time is not a positive finite number and
    /// [`DriverError::InvalidCyclesPerIncrement`] if `option.cycles_per_increment` is zero.
    #[tracing::instrument(level = "debug", skip(option), fields(policy = ?option.policy))]
    pub fn registers(&self, option: &RampOption) -> Result<RampRegisters, DriverError> {
        let valid = |t: f64| t.is_finite() && t > 0.;
        if !valid(self.time_up) || !valid(self.time_down) {
            return Err(DriverError::InvalidRampTime(self.time_up, self.time_down));
        }
        if option.cycles_per_increment == 0 {
            return Err(DriverError::InvalidCyclesPerIncrement);
        }

        let delta = self.start.hz().abs_diff(self.stop.hz()) as f64;
        let (rate_up_word, cycles_up) = rate_word(delta / self.time_up, Side::Up, option);
        let (rate_down_word, cycles_down) = rate_word(delta / self.time_down, Side::Down, option);

        Ok(RampRegisters {
            start_word: self.start.hz(),
            stop_word: self.stop.hz(),
            rate_up_word,
            cycles_up,
            rate_down_word,
            cycles_down,
        })
    }
}

fn rate_word(rate: f64, side: Side, option: &RampOption) -> (u32, u32) {
    let cycles = if rate * option.sys_clk_period < 1. {
        match option.policy {
            SlowRampPolicy::Compatible => {
                tracing::debug!(
                    ?side,
                    rate,
                    "Ramp is slower than one word per clock; {} cycles per increment is not applied",
                    SLOW_RAMP_CYCLES
                );
                option.cycles_per_increment
            }
            SlowRampPolicy::Widen => SLOW_RAMP_CYCLES,
        }
    } else {
        option.cycles_per_increment
    };

    let word = round_half_up(rate * cycles as f64 * option.sys_clk_period);
    let word = if word < 1. {
        tracing::warn!(?side, rate, "Ramp rate word {} too slow, rounding up to 1", word);
        1
    } else if word > u32::MAX as f64 {
        tracing::warn!(?side, rate, "Ramp rate word {} too fast, saturating", word);
        u32::MAX
    } else {
        word as u32
    };
    (word, cycles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ad9959_core::common::{Hz, MHz};

    #[test]
    fn default_option() {
        let option = RampOption::default();
        assert_eq!(1, option.cycles_per_increment);
        assert_eq!(SlowRampPolicy::Compatible, option.policy);
        assert_eq!(SYS_CLK_PERIOD, option.sys_clk_period);
    }

    #[test]
    fn one_word_per_clock() -> anyhow::Result<()> {
        let registers =
            RampSpec::new(100 * MHz, 200 * MHz, 1., 1.).registers(&RampOption::default())?;
        assert_eq!(
            RampRegisters {
                start_word: 100_000_000,
                stop_word: 200_000_000,
                rate_up_word: 1,
                cycles_up: 1,
                rate_down_word: 1,
                cycles_down: 1,
            },
            registers
        );
        Ok(())
    }

    #[rstest::rstest]
    #[case(10_000, 1_000_000, 1e-6)]
    #[case(100, 1_000_000, 1e-4)]
    #[case(10, 10_000, 1e-5)]
    fn fast(#[case] expect: u32, #[case] delta: u32, #[case] time: f64) -> anyhow::Result<()> {
        let registers = RampSpec::new(10 * MHz, 10 * MHz + delta * Hz, time, time)
            .registers(&RampOption::default())?;
        assert_eq!(expect, registers.rate_up_word);
        assert_eq!(expect, registers.rate_down_word);
        Ok(())
    }

    #[test]
    fn descending_uses_absolute_delta() -> anyhow::Result<()> {
        let registers =
            RampSpec::new(200 * MHz, 100 * MHz, 1e-3, 2e-3).registers(&RampOption::default())?;
        assert_eq!(1000, registers.rate_up_word);
        assert_eq!(500, registers.rate_down_word);
        assert_eq!(200_000_000, registers.start_word);
        assert_eq!(100_000_000, registers.stop_word);
        Ok(())
    }

    #[test]
    fn slow_compatible() -> anyhow::Result<()> {
        let registers =
            RampSpec::new(10 * MHz, 11 * MHz, 1., 1e-6).registers(&RampOption::default())?;
        assert_eq!(1, registers.rate_up_word);
        assert_eq!(1, registers.cycles_up);
        assert_eq!(10_000, registers.rate_down_word);
        assert_eq!(1, registers.cycles_down);
        Ok(())
    }

    #[test]
    fn slow_widen() -> anyhow::Result<()> {
        let option = RampOption {
            policy: SlowRampPolicy::Widen,
            ..Default::default()
        };
        let registers = RampSpec::new(10 * MHz, 11 * MHz, 1., 1e-6).registers(&option)?;
        assert_eq!(10, registers.rate_up_word);
        assert_eq!(SLOW_RAMP_CYCLES, registers.cycles_up);
        assert_eq!(10_000, registers.rate_down_word);
        assert_eq!(1, registers.cycles_down);
        Ok(())
    }

    #[test]
    fn zero_delta_is_never_zero() -> anyhow::Result<()> {
        let registers =
            RampSpec::new(10 * MHz, 10 * MHz, 1., 1.).registers(&RampOption::default())?;
        assert_eq!(1, registers.rate_up_word);
        assert_eq!(1, registers.rate_down_word);
        Ok(())
    }

    #[test]
    fn saturate() -> anyhow::Result<()> {
        let registers = RampSpec::new(0 * Hz, 4_000 * MHz, 1e-12, 1.)
            .registers(&RampOption::default())?;
        assert_eq!(u32::MAX, registers.rate_up_word);
        assert_eq!(40, registers.rate_down_word);
        Ok(())
    }

    #[test]
    fn cycles_per_increment() -> anyhow::Result<()> {
        let option = RampOption {
            cycles_per_increment: 4,
            ..Default::default()
        };
        let registers = RampSpec::new(100 * MHz, 200 * MHz, 1e-3, 1e-3).registers(&option)?;
        assert_eq!(4000, registers.rate_up_word);
        assert_eq!(4, registers.cycles_up);
        assert_eq!(4, registers.cycles_down);
        Ok(())
    }

    #[rstest::rstest]
    #[case(0., 1.)]
    #[case(1., 0.)]
    #[case(-1., 1.)]
    #[case(f64::NAN, 1.)]
    #[case(1., f64::INFINITY)]
    fn invalid_time(#[case] up: f64, #[case] down: f64) {
        let err = RampSpec::new(100 * MHz, 200 * MHz, up, down)
            .registers(&RampOption::default())
            .unwrap_err();
        assert_eq!(
            DriverError::InvalidRampTime(up, down).to_string(),
            err.to_string()
        );
    }

    #[test]
    fn zero_cycles_per_increment() {
        let option = RampOption {
            cycles_per_increment: 0,
            ..Default::default()
        };
        assert_eq!(
            Err(DriverError::InvalidCyclesPerIncrement),
            RampSpec::new(100 * MHz, 200 * MHz, 1., 1.).registers(&option)
        );
    }
}
