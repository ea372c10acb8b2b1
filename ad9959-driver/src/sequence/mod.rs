mod description;

use std::collections::BTreeMap;

use ad9959_core::{
    channel::Channel,
    common::{Freq, FREQ_LIST_LEN_MAX},
};
use serde::{Deserialize, Serialize};

pub use description::{ChannelDescription, FrequencyStep, SequenceDescription};

use crate::{
    config::DeviceConfig,
    error::DriverError,
    limits::{finite, Quantity},
    trigger::{SequencingFault, TriggerGuard, TriggerPulse},
};

/// The phase programmed on a channel with a frequency list but without an explicit phase.
pub const DEFAULT_PHASE: f64 = 0.;
/// The amplitude programmed on a channel with a frequency list but without an explicit amplitude.
pub const DEFAULT_AMPLITUDE: f64 = 0.5;

/// The values programmed on one channel for a shot.
///
/// Frequencies are in Hz as requested, i.e. before the divider.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ChannelProgram {
    /// The frequency steps consumed one per trigger pulse.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequencies: Option<Vec<Freq<f64>>>,
    /// The phase offset in degrees.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phase: Option<f64>,
    /// The amplitude as a fraction of full scale.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amplitude: Option<f64>,
}

/// The validated per-channel programs of one device for one shot.
///
/// A table is only produced by [`SequenceBuilder::build`] or deserialized from a table produced by
/// it, and is read-only afterwards.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ChannelSequenceTable {
    device: String,
    channels: BTreeMap<Channel, ChannelProgram>,
}

impl ChannelSequenceTable {
    /// Returns the name of the device the table was built for.
    #[must_use]
    pub fn device(&self) -> &str {
        &self.device
    }

    /// Returns the program of `channel`.
    #[must_use]
    pub fn get(&self, channel: Channel) -> Option<&ChannelProgram> {
        self.channels.get(&channel)
    }

    /// Returns the programs in ascending channel order.
    pub fn iter(&self) -> impl Iterator<Item = (Channel, &ChannelProgram)> {
        self.channels.iter().map(|(&ch, p)| (ch, p))
    }

    /// Returns the number of programmed channels.
    #[must_use]
    pub fn len(&self) -> usize {
        self.channels.len()
    }

    /// Returns `true` if no channel is programmed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }
}

/// A trigger pulse to be emitted by the timed output driving `line`.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduledPulse {
    /// The channel whose frequency list the pulse advances.
    pub channel: Channel,
    /// The name of the trigger line.
    pub line: String,
    /// The pulse timing.
    pub pulse: TriggerPulse,
}

/// Collects the programmed values of a shot and compiles them into a [`ChannelSequenceTable`].
#[derive(Debug)]
pub struct SequenceBuilder<'a> {
    config: &'a DeviceConfig,
    frequencies: BTreeMap<Channel, Vec<Freq<f64>>>,
    phases: BTreeMap<Channel, f64>,
    amplitudes: BTreeMap<Channel, f64>,
    guards: BTreeMap<String, TriggerGuard>,
    pulses: Vec<ScheduledPulse>,
    fault: Option<SequencingFault>,
}

impl<'a> SequenceBuilder<'a> {
    /// Creates an empty builder.
    #[must_use]
    pub fn new(config: &'a DeviceConfig) -> Self {
        Self {
            config,
            frequencies: BTreeMap::new(),
            phases: BTreeMap::new(),
            amplitudes: BTreeMap::new(),
            guards: BTreeMap::new(),
            pulses: Vec::new(),
            fault: None,
        }
    }

    /// Replaces the frequency list of the channel named `name`.
    pub fn program_frequency(
        &mut self,
        name: &str,
        values: impl IntoIterator<Item = Freq<f64>>,
    ) -> Result<&mut Self, DriverError> {
        let channel = self.config.channel(name)?;
        let values = values.into_iter().collect::<Vec<_>>();
        self.config.limit_policy().validate_frequency(&values)?;
        self.frequencies.insert(channel, values);
        Ok(self)
    }

    /// Appends a frequency step to the channel named `name`.
    ///
    /// With `trigger`, a pulse at `time` on the channel's trigger line advances the bridge to this
    /// step; the first step of a list is normally appended without one.
    ///
    /// # Errors
    ///
    /// Returns [`DriverError::Sequencing`] if the pulse violates the spacing of its line. The
    /// fault is sticky: [`SequenceBuilder::build`] fails with it as well.
    pub fn jump_frequency(
        &mut self,
        time: f64,
        name: &str,
        frequency: Freq<f64>,
        trigger: bool,
    ) -> Result<Option<TriggerPulse>, DriverError> {
        let channel = self.config.channel(name)?;
        self.config.limit_policy().validate_frequency(&[frequency])?;

        let pulse = if trigger {
            let mapping = self
                .config
                .trigger(name)
                .ok_or(DriverError::NoTriggerLine(channel))?;
            let guard = self
                .guards
                .entry(mapping.line.clone())
                .or_insert_with(|| TriggerGuard::new(&mapping.line, mapping.modality));
            match guard.trigger(time) {
                Ok(pulse) => {
                    self.pulses.push(ScheduledPulse {
                        channel,
                        line: mapping.line.clone(),
                        pulse,
                    });
                    Some(pulse)
                }
                Err(fault) => {
                    let fault = fault.with_channel(channel);
                    tracing::error!(%fault);
                    if self.fault.is_none() {
                        self.fault = Some(fault.clone());
                    }
                    return Err(fault.into());
                }
            }
        } else {
            None
        };

        self.frequencies.entry(channel).or_default().push(frequency);
        Ok(pulse)
    }

    /// Sets the phase of the channel named `name` in degrees.
    pub fn program_phase(&mut self, name: &str, degrees: f64) -> Result<&mut Self, DriverError> {
        let channel = self.config.channel(name)?;
        self.phases.insert(channel, finite(Quantity::Phase, degrees)?);
        Ok(self)
    }

    /// Sets the amplitude of the channel named `name` as a fraction of full scale.
    pub fn program_amplitude(
        &mut self,
        name: &str,
        fraction: f64,
    ) -> Result<&mut Self, DriverError> {
        let channel = self.config.channel(name)?;
        self.amplitudes
            .insert(channel, finite(Quantity::Amplitude, fraction)?);
        Ok(self)
    }

    /// Returns the trigger pulses issued so far, in the order they were issued.
    #[must_use]
    pub fn pulses(&self) -> &[ScheduledPulse] {
        &self.pulses
    }

    /// Returns the guard of the trigger line named `line`, once it has been used.
    #[must_use]
    pub fn guard(&self, line: &str) -> Option<&TriggerGuard> {
        self.guards.get(line)
    }

    /// Compiles the table.
    ///
    /// Out-of-range values are clipped with a warning. A channel with a frequency list but
    /// without a phase or amplitude gets [`DEFAULT_PHASE`] and [`DEFAULT_AMPLITUDE`].
    #[tracing::instrument(level = "debug", skip(self), fields(device = %self.config.name))]
    pub fn build(&self) -> Result<ChannelSequenceTable, DriverError> {
        if let Some(fault) = &self.fault {
            return Err(fault.clone().into());
        }

        let policy = self.config.limit_policy();
        let channels = Channel::all()
            .filter_map(|ch| {
                let frequencies = self.frequencies.get(&ch);
                let phase = self.phases.get(&ch).copied();
                let amplitude = self.amplitudes.get(&ch).copied();
                if frequencies.is_none() && phase.is_none() && amplitude.is_none() {
                    return None;
                }
                let program = || -> Result<ChannelProgram, DriverError> {
                    let frequencies = frequencies
                        .map(|values| match values.len() {
                            0 => Err(DriverError::EmptyFrequencyList),
                            n if n > FREQ_LIST_LEN_MAX => Err(DriverError::FrequencyListTooLong(n)),
                            _ if policy.check_frequency(values) => Ok(values.clone()),
                            _ => Ok(policy.coerce_frequency(values).into_inner()),
                        })
                        .transpose()?;
                    let (phase, amplitude) = if frequencies.is_some() {
                        (
                            Some(phase.unwrap_or(DEFAULT_PHASE)),
                            Some(amplitude.unwrap_or(DEFAULT_AMPLITUDE)),
                        )
                    } else {
                        (phase, amplitude)
                    };
                    Ok(ChannelProgram {
                        frequencies,
                        phase: phase.map(|p| policy.coerce_phase(p).into_inner()),
                        amplitude: amplitude.map(|a| policy.coerce_amplitude(a).into_inner()),
                    })
                };
                Some(program().map(|p| (ch, p)))
            })
            .collect::<Result<BTreeMap<_, _>, _>>()?;

        tracing::debug!(channels = channels.len(), "built sequence table");
        Ok(ChannelSequenceTable {
            device: self.config.name.clone(),
            channels,
        })
    }
}
