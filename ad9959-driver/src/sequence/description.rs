use std::collections::BTreeMap;

use ad9959_core::common::Freq;
use serde::{Deserialize, Serialize};

use super::SequenceBuilder;
use crate::{config::DeviceConfig, error::DriverError};

/// One frequency step handed over by the sequence compiler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FrequencyStep {
    /// The time of the step in seconds.
    pub time: f64,
    /// The frequency in Hz.
    pub frequency: Freq<f64>,
    /// Whether a trigger pulse advances the bridge to this step.
    #[serde(default = "default_trigger")]
    pub trigger: bool,
}

fn default_trigger() -> bool {
    true
}

/// The programmed values of one channel.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChannelDescription {
    /// The frequency steps.
    #[serde(default)]
    pub steps: Vec<FrequencyStep>,
    /// The phase in degrees.
    #[serde(default)]
    pub phase: Option<f64>,
    /// The amplitude as a fraction of full scale.
    #[serde(default)]
    pub amplitude: Option<f64>,
}

/// A description of one shot keyed by channel name.
///
/// ```json
/// {
///   "MOT": {
///     "steps": [
///       { "time": 0.0, "frequency": 90e6, "trigger": false },
///       { "time": 0.5, "frequency": 92e6 }
///     ],
///     "amplitude": 0.8
///   }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SequenceDescription {
    /// Channel name to its programmed values.
    pub channels: BTreeMap<String, ChannelDescription>,
}

impl SequenceDescription {
    /// Parses a description from JSON.
    pub fn from_json(json: &str) -> Result<Self, DriverError> {
        Ok(serde_json::from_str(json)?)
    }
}

impl<'a> SequenceBuilder<'a> {
    /// Replays `description` into a new builder.
    ///
    /// Steps of all channels are replayed in time order, so channels sharing a trigger line are
    /// checked against each other. Steps at the same time keep their per-channel order.
    pub fn from_description(
        config: &'a DeviceConfig,
        description: &SequenceDescription,
    ) -> Result<Self, DriverError> {
        let mut builder = Self::new(config);

        let mut steps = description
            .channels
            .iter()
            .flat_map(|(name, ch)| ch.steps.iter().map(move |s| (name.as_str(), s)))
            .collect::<Vec<_>>();
        steps.sort_by(|(_, a), (_, b)| a.time.total_cmp(&b.time));
        steps.into_iter().try_for_each(|(name, step)| {
            builder
                .jump_frequency(step.time, name, step.frequency, step.trigger)
                .map(|_| ())
        })?;

        description.channels.iter().try_for_each(|(name, ch)| {
            if let Some(phase) = ch.phase {
                builder.program_phase(name, phase)?;
            }
            if let Some(amplitude) = ch.amplitude {
                builder.program_amplitude(name, amplitude)?;
            }
            Ok::<_, DriverError>(())
        })?;

        Ok(builder)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::tests::create_config, sequence::ChannelProgram};
    use ad9959_core::{channel::Channel, common::MHz};

    #[test]
    fn from_description() -> anyhow::Result<()> {
        let config = create_config();
        let description = SequenceDescription::from_json(
            r#"{
                "MOT": {
                    "steps": [
                        { "time": 0.5, "frequency": 92e6 },
                        { "time": 0.0, "frequency": 90e6, "trigger": false },
                        { "time": 0.25, "frequency": 91e6 }
                    ],
                    "amplitude": 0.8
                },
                "Probe": { "phase": 45.0 }
            }"#,
        )?;
        let builder = SequenceBuilder::from_description(&config, &description)?;
        let table = builder.build()?;
        assert_eq!(
            Some(&ChannelProgram {
                frequencies: Some(vec![90. * MHz, 91. * MHz, 92. * MHz]),
                phase: Some(0.),
                amplitude: Some(0.8),
            }),
            table.get(Channel::CH1)
        );
        assert_eq!(Some(45.), table.get(Channel::CH0).and_then(|p| p.phase));
        assert_eq!(2, builder.pulses().len());
        Ok(())
    }

    #[test]
    fn shared_trigger_line() -> anyhow::Result<()> {
        let config = create_config()
            .with_trigger("Repump", "mot_trigger", crate::trigger::TriggerModality::Digital);
        let description = SequenceDescription::from_json(
            r#"{
                "MOT": { "steps": [ { "time": 1.0, "frequency": 90e6 } ] },
                "Repump": { "steps": [ { "time": 1.0001, "frequency": 80e6 } ] }
            }"#,
        )?;
        let err = SequenceBuilder::from_description(&config, &description).unwrap_err();
        assert!(matches!(err, DriverError::Sequencing(_)));
        Ok(())
    }

    #[test]
    fn unknown_field() {
        assert!(SequenceDescription::from_json(r#"{ "MOT": { "freq": [] } }"#).is_err());
    }
}
