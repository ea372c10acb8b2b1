use ad9959_core::channel::Channel;
use getset::{CopyGetters, Getters};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The minimum spacing of pulses on a digital trigger line in seconds.
pub const DIGITAL_MIN_PULSE_WIDTH: f64 = 250e-6;
/// The minimum spacing of pulses on an analog trigger line in seconds.
pub const ANALOG_MIN_PULSE_WIDTH: f64 = 100e-6;
/// The voltage of an analog trigger pulse.
pub const ANALOG_HIGH_LEVEL: f64 = 3.3;

/// Absorbs float rounding of times produced by the sequence compiler.
pub const TIME_TOLERANCE: f64 = 1e-9;

/// The kind of output that drives a trigger line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerModality {
    /// A digital output.
    #[default]
    Digital,
    /// An analog output driven to [`ANALOG_HIGH_LEVEL`].
    Analog,
}

impl TriggerModality {
    /// Returns the minimum spacing of two pulses in seconds.
    #[must_use]
    pub const fn min_pulse_width(self) -> f64 {
        match self {
            Self::Digital => DIGITAL_MIN_PULSE_WIDTH,
            Self::Analog => ANALOG_MIN_PULSE_WIDTH,
        }
    }

    /// Returns the output level while the pulse is high. A digital line reports `1`.
    #[must_use]
    pub const fn high_level(self) -> f64 {
        match self {
            Self::Digital => 1.,
            Self::Analog => ANALOG_HIGH_LEVEL,
        }
    }
}

/// The timing of one trigger pulse.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriggerPulse {
    /// The time the line goes high in seconds.
    pub go_high_at: f64,
    /// The time the line goes low in seconds.
    pub go_low_at: f64,
    /// The output level while high.
    pub high_level: f64,
}

/// Pulse history of one trigger line during a shot.
#[derive(Debug, Clone, Copy, PartialEq, Default, CopyGetters)]
#[getset(get_copy = "pub")]
pub struct TriggerState {
    /// The time of the last pulse, [`None`] while idle.
    previous_trigger_time: Option<f64>,
    /// The number of pulses issued.
    pulse_count: usize,
}

impl TriggerState {
    /// Returns `true` once a pulse has been issued.
    #[must_use]
    pub const fn is_armed(&self) -> bool {
        self.previous_trigger_time.is_some()
    }
}

/// A compiled timeline that the trigger line cannot realize.
#[derive(Error, Debug, Clone, PartialEq)]
pub struct SequencingFault {
    line: String,
    channel: Option<Channel>,
    time: f64,
    previous: Option<f64>,
    min_pulse_width: f64,
}

impl SequencingFault {
    /// Attaches the channel the trigger was issued for.
    #[must_use]
    pub fn with_channel(mut self, channel: Channel) -> Self {
        self.channel = Some(channel);
        self
    }

    /// Returns the trigger line name.
    #[must_use]
    pub fn line(&self) -> &str {
        &self.line
    }

    /// Returns the channel the trigger was issued for, if known.
    #[must_use]
    pub const fn channel(&self) -> Option<Channel> {
        self.channel
    }

    /// Returns the time of the rejected pulse in seconds.
    #[must_use]
    pub const fn time(&self) -> f64 {
        self.time
    }
}

impl std::fmt::Display for SequencingFault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Invalid triggering sequence on {}", self.line)?;
        if let Some(ch) = self.channel {
            write!(f, " ({})", ch)?;
        }
        match self.previous {
            Some(prev) => write!(
                f,
                ": trigger at {} s is {} s after the previous one at {} s (minimum {} s)",
                self.time,
                self.time - prev,
                prev,
                self.min_pulse_width
            ),
            None => write!(f, ": trigger time ({}) is not finite", self.time),
        }
    }
}

/// Checks the spacing of pulses on one trigger line and produces their timing.
#[derive(Debug, Clone, PartialEq, Getters, CopyGetters)]
pub struct TriggerGuard {
    #[getset(get = "pub")]
    line: String,
    #[getset(get_copy = "pub")]
    modality: TriggerModality,
    #[getset(get_copy = "pub")]
    state: TriggerState,
}

impl TriggerGuard {
    /// Creates a new idle [`TriggerGuard`].
    pub fn new(line: impl Into<String>, modality: TriggerModality) -> Self {
        Self {
            line: line.into(),
            modality,
            state: TriggerState::default(),
        }
    }

    /// Issues a pulse at `time` seconds.
    ///
    /// # Errors
    ///
    /// Returns [`SequencingFault`] if `time` is not finite or is closer than the minimum pulse
    /// width to the previous pulse. The state is left unchanged on error.
    pub fn trigger(&mut self, time: f64) -> Result<TriggerPulse, SequencingFault> {
        let min_pulse_width = self.modality.min_pulse_width();
        let fault = |previous| SequencingFault {
            line: self.line.clone(),
            channel: None,
            time,
            previous,
            min_pulse_width,
        };
        if !time.is_finite() {
            return Err(fault(None));
        }
        if let Some(prev) = self.state.previous_trigger_time {
            if time - prev < min_pulse_width - TIME_TOLERANCE {
                return Err(fault(Some(prev)));
            }
        }

        self.state.previous_trigger_time = Some(time);
        self.state.pulse_count += 1;
        tracing::trace!(line = %self.line, time, count = self.state.pulse_count, "trigger");

        Ok(TriggerPulse {
            go_high_at: time,
            go_low_at: time + min_pulse_width / 2.,
            high_level: self.modality.high_level(),
        })
    }

    /// Returns the guard to idle for the next shot.
    pub fn reset(&mut self) {
        self.state = TriggerState::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const W: f64 = DIGITAL_MIN_PULSE_WIDTH;

    #[test]
    fn spacing() -> anyhow::Result<()> {
        let mut guard = TriggerGuard::new("dds_trigger", TriggerModality::Digital);
        assert!(!guard.state().is_armed());

        let pulse = guard.trigger(1.0)?;
        assert_eq!(1.0, pulse.go_high_at);
        approx::assert_abs_diff_eq!(1.0 + W / 2., pulse.go_low_at);
        assert!(guard.state().is_armed());

        let fault = guard.trigger(1.0 + 0.5 * W).unwrap_err();
        assert_eq!(1.0 + 0.5 * W, fault.time());
        assert_eq!(Some(1.0), guard.state().previous_trigger_time());
        assert_eq!(1, guard.state().pulse_count());

        guard.trigger(1.0 + 2. * W)?;
        assert_eq!(2, guard.state().pulse_count());
        Ok(())
    }

    #[rstest::rstest]
    #[case(true, 1.0 + DIGITAL_MIN_PULSE_WIDTH, TriggerModality::Digital)]
    #[case(true, 1.0 + DIGITAL_MIN_PULSE_WIDTH - 0.5e-9, TriggerModality::Digital)]
    #[case(false, 1.0 + DIGITAL_MIN_PULSE_WIDTH - 2e-9, TriggerModality::Digital)]
    #[case(false, 1.0 + 200e-6, TriggerModality::Digital)]
    #[case(true, 1.0 + 200e-6, TriggerModality::Analog)]
    #[case(false, 1.0 + 50e-6, TriggerModality::Analog)]
    #[case(false, 0.5, TriggerModality::Analog)]
    fn min_pulse_width(#[case] ok: bool, #[case] second: f64, #[case] modality: TriggerModality) {
        let mut guard = TriggerGuard::new("line", modality);
        assert!(guard.trigger(1.0).is_ok());
        assert_eq!(ok, guard.trigger(second).is_ok());
    }

    #[test]
    fn analog_pulse() -> anyhow::Result<()> {
        let mut guard = TriggerGuard::new("ao0", TriggerModality::Analog);
        let pulse = guard.trigger(0.25)?;
        assert_eq!(0.25, pulse.go_high_at);
        approx::assert_abs_diff_eq!(0.25 + 50e-6, pulse.go_low_at);
        assert_eq!(ANALOG_HIGH_LEVEL, pulse.high_level);
        Ok(())
    }

    #[test]
    fn non_finite() {
        let mut guard = TriggerGuard::new("line", TriggerModality::Digital);
        let fault = guard.trigger(f64::NAN).unwrap_err();
        assert_eq!(
            "Invalid triggering sequence on line: trigger time (NaN) is not finite",
            fault.to_string()
        );
        assert!(!guard.state().is_armed());
    }

    #[test]
    fn no_upper_bound_on_count() -> anyhow::Result<()> {
        let mut guard = TriggerGuard::new("line", TriggerModality::Digital);
        (0..1000).try_for_each(|i| guard.trigger(i as f64 * W).map(|_| ()))?;
        assert_eq!(1000, guard.state().pulse_count());
        Ok(())
    }

    #[test]
    fn reset() -> anyhow::Result<()> {
        let mut guard = TriggerGuard::new("line", TriggerModality::Digital);
        guard.trigger(1.0)?;
        guard.reset();
        assert_eq!(TriggerState::default(), guard.state());
        guard.trigger(1.0)?;
        Ok(())
    }

    #[test]
    fn display() {
        let fault = SequencingFault {
            line: "trig".to_string(),
            channel: None,
            time: 1.5,
            previous: Some(1.0),
            min_pulse_width: 1.0,
        }
        .with_channel(Channel::CH1);
        assert_eq!(Some(Channel::CH1), fault.channel());
        assert_eq!("trig", fault.line());
        assert_eq!(
            "Invalid triggering sequence on trig (ch1): trigger at 1.5 s is 0.5 s after the previous one at 1 s (minimum 1 s)",
            fault.to_string()
        );
    }
}
