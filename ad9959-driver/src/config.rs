use std::{collections::BTreeMap, time::Duration};

use ad9959_core::{
    channel::Channel,
    common::{Freq, BOOT_DELAY, DEFAULT_BAUD_RATE},
};
use serde::{Deserialize, Serialize};

use crate::{
    error::DriverError,
    firmware::Divider,
    limits::{DeviceLimits, LimitPolicy},
    ramp::{RampOption, SlowRampPolicy},
    trigger::TriggerModality,
};

/// The trigger line that advances the frequency list of a channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TriggerMapping {
    /// The name of the output driving the line.
    pub line: String,
    /// The kind of output.
    #[serde(default)]
    pub modality: TriggerModality,
}

/// Static configuration of one bridge.
///
/// ```
/// # use ad9959_driver::config::DeviceConfig;
/// let config = DeviceConfig::from_json(
///     r#"{
///         "name": "dds0",
///         "port": "/dev/ttyACM0",
///         "channel_mappings": { "MOT": "ch1", "Repump": 2 },
///         "trigger_mappings": { "MOT": { "line": "mot_trigger" } },
///         "divider": true,
///         "default_values": { "MOT": 1250e6 }
///     }"#,
/// )?;
/// assert_eq!(115_200, config.baud_rate);
/// # Ok::<(), ad9959_driver::error::DriverError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeviceConfig {
    /// The name of the device used in logs and warnings.
    pub name: String,
    /// The serial port of the bridge.
    pub port: String,
    /// The baud rate of the serial port.
    #[serde(default = "default_baud_rate")]
    pub baud_rate: u32,
    /// Channel name to physical channel.
    pub channel_mappings: BTreeMap<String, Channel>,
    /// Channel name to the trigger line that steps it.
    #[serde(default)]
    pub trigger_mappings: BTreeMap<String, TriggerMapping>,
    /// The external divider in the signal path of every channel.
    #[serde(default)]
    pub divider: Divider,
    /// Channel name to the frequency programmed when the device is opened.
    #[serde(default)]
    pub default_values: BTreeMap<String, Freq<f64>>,
    /// The time the bridge needs to boot after the port is opened.
    #[serde(default = "default_boot_delay", with = "millis")]
    pub boot_delay: Duration,
    /// See [`SlowRampPolicy`].
    #[serde(default)]
    pub slow_ramp_policy: SlowRampPolicy,
}

fn default_baud_rate() -> u32 {
    DEFAULT_BAUD_RATE
}

fn default_boot_delay() -> Duration {
    BOOT_DELAY
}

mod millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_millis)
    }
}

impl DeviceConfig {
    /// Creates a configuration without any channel mapping.
    pub fn new(name: impl Into<String>, port: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            port: port.into(),
            baud_rate: DEFAULT_BAUD_RATE,
            channel_mappings: BTreeMap::new(),
            trigger_mappings: BTreeMap::new(),
            divider: Divider::default(),
            default_values: BTreeMap::new(),
            boot_delay: BOOT_DELAY,
            slow_ramp_policy: SlowRampPolicy::default(),
        }
    }

    /// Maps `name` to `channel`.
    #[must_use]
    pub fn with_channel(mut self, name: impl Into<String>, channel: Channel) -> Self {
        self.channel_mappings.insert(name.into(), channel);
        self
    }

    /// Assigns a trigger line to the channel named `name`.
    #[must_use]
    pub fn with_trigger(
        mut self,
        name: impl Into<String>,
        line: impl Into<String>,
        modality: TriggerModality,
    ) -> Self {
        self.trigger_mappings.insert(
            name.into(),
            TriggerMapping {
                line: line.into(),
                modality,
            },
        );
        self
    }

    /// Sets the frequency programmed on open for the channel named `name`.
    #[must_use]
    pub fn with_default(mut self, name: impl Into<String>, freq: Freq<f64>) -> Self {
        self.default_values.insert(name.into(), freq);
        self
    }

    /// Sets the divider.
    #[must_use]
    pub fn with_divider(mut self, divider: Divider) -> Self {
        self.divider = divider;
        self
    }

    /// Sets the boot delay.
    #[must_use]
    pub fn with_boot_delay(mut self, boot_delay: Duration) -> Self {
        self.boot_delay = boot_delay;
        self
    }

    /// Loads and validates a configuration.
    pub fn from_json(json: &str) -> Result<Self, DriverError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that every name refers to a mapped channel and that no channel is mapped twice.
    pub fn validate(&self) -> Result<(), DriverError> {
        let mut seen = [false; Channel::NUM];
        self.channel_mappings.iter().try_for_each(|(name, ch)| {
            let slot = &mut seen[ch.idx() as usize];
            if *slot {
                return Err(DriverError::InvalidConfig(format!(
                    "{} is mapped more than once ({:?})",
                    ch, name
                )));
            }
            *slot = true;
            Ok(())
        })?;
        self.trigger_mappings
            .keys()
            .chain(self.default_values.keys())
            .try_for_each(|name| self.channel(name).map(|_| ()))?;
        self.default_values
            .values()
            .try_for_each(|f| self.limit_policy().validate_frequency(&[*f]))
    }

    /// Resolves a channel name.
    pub fn channel(&self, name: &str) -> Result<Channel, DriverError> {
        self.channel_mappings
            .get(name)
            .copied()
            .ok_or_else(|| DriverError::UnknownChannelName(name.to_string()))
    }

    /// Returns the trigger line of the channel named `name`.
    #[must_use]
    pub fn trigger(&self, name: &str) -> Option<&TriggerMapping> {
        self.trigger_mappings.get(name)
    }

    /// Returns the frequency limits, before the divider.
    #[must_use]
    pub fn limits(&self) -> DeviceLimits {
        DeviceLimits::with_divider(self.divider)
    }

    /// Returns the limit policy of this device.
    #[must_use]
    pub fn limit_policy(&self) -> LimitPolicy {
        LimitPolicy::new(&self.name, self.limits())
    }

    /// Returns the ramp options of this device.
    #[must_use]
    pub fn ramp_option(&self) -> RampOption {
        RampOption {
            policy: self.slow_ramp_policy,
            ..Default::default()
        }
    }

    /// Returns the default frequencies in ascending channel order.
    pub fn default_frequencies(&self) -> Result<Vec<(Channel, Freq<f64>)>, DriverError> {
        let mut defaults = self
            .default_values
            .iter()
            .map(|(name, &f)| self.channel(name).map(|ch| (ch, f)))
            .collect::<Result<Vec<_>, _>>()?;
        defaults.sort_by_key(|(ch, _)| *ch);
        Ok(defaults)
    }
}
