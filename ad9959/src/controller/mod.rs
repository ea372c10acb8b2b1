mod builder;
mod playback;

use std::{collections::BTreeMap, time::Duration};

use ad9959_core::{channel::Channel, common::Freq, link::Link, sleep::Sleep};
use ad9959_driver::{
    config::DeviceConfig,
    firmware::{Amplitude, Command, FrequencyList, Phase},
    limits::{finite, Quantity},
    ramp::{RampRegisters, RampSpec},
};
use derive_more::Display;
use getset::{CopyGetters, Getters, MutGetters};
use itertools::Itertools;

use crate::error::Ad9959Error;

pub use builder::ControllerBuilder;

/// Who may issue commands to the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Mode {
    /// Commands come from the manual front end.
    Manual,
    /// A shot owns the device.
    Buffered,
}

/// The result of aborting a shot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum AbortOutcome {
    /// No frame of the shot had been written.
    Clean,
    /// Some frames of the shot were written and are not rolled back.
    MayBeIncomplete,
}

/// The values a channel outputs after quantisation by its registers.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RealizedValues {
    /// The frequency list as seen after the divider.
    pub frequencies: Option<Vec<Freq<f64>>>,
    /// The phase offset in degrees.
    pub phase: Option<f64>,
    /// The amplitude as a fraction of full scale.
    pub amplitude: Option<f64>,
}

/// The realized values of every channel programmed by a shot.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FinalValues(BTreeMap<Channel, RealizedValues>);

impl FinalValues {
    /// Returns the realized values of `channel`.
    #[must_use]
    pub fn get(&self, channel: Channel) -> Option<&RealizedValues> {
        self.0.get(&channel)
    }

    /// Returns the realized values in ascending channel order.
    pub fn iter(&self) -> impl Iterator<Item = (Channel, &RealizedValues)> {
        self.0.iter().map(|(&ch, v)| (ch, v))
    }

    /// Returns the number of channels.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if no channel was programmed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// The single owner of the link to one bridge.
///
/// Every command takes `&mut self`, so frames are never interleaved.
#[derive(Getters, MutGetters, CopyGetters)]
pub struct Controller<L: Link> {
    /// The link to the bridge.
    #[getset(get = "pub", get_mut = "pub")]
    link: L,
    /// The device configuration.
    #[getset(get = "pub")]
    config: DeviceConfig,
    sleeper: Box<dyn Sleep + Send>,
    /// The delay after each frame.
    #[getset(get_copy = "pub")]
    settle_delay: Duration,
    /// The current mode.
    #[getset(get_copy = "pub")]
    mode: Mode,
    shot_frames: usize,
    realized: [RealizedValues; Channel::NUM],
}

impl<L: Link> Controller<L> {
    /// Opens `link` with the default sleeper and settle delay.
    pub fn open(config: DeviceConfig, link: L) -> Result<Self, Ad9959Error> {
        ControllerBuilder::new(config).open(link)
    }

    /// Returns the values `channel` currently outputs, as far as this controller knows.
    #[must_use]
    pub fn realized(&self, channel: Channel) -> &RealizedValues {
        &self.realized[channel.idx() as usize]
    }

    /// Programs the frequency list of `channel`.
    ///
    /// Out-of-range values are clipped with a warning. Returns the realized frequencies.
    #[tracing::instrument(level = "debug", skip(self, values), fields(device = %self.config.name))]
    pub fn set_frequency(
        &mut self,
        channel: Channel,
        values: &[Freq<f64>],
    ) -> Result<Vec<Freq<f64>>, Ad9959Error> {
        self.ensure_manual()?;
        self.write_frequency(channel, values)
    }

    /// Sets the phase of `channel` in degrees. Returns the realized phase.
    #[tracing::instrument(level = "debug", skip(self), fields(device = %self.config.name))]
    pub fn set_phase(&mut self, channel: Channel, degrees: f64) -> Result<f64, Ad9959Error> {
        self.ensure_manual()?;
        self.write_phase(channel, degrees)
    }

    /// Sets the amplitude of `channel`. Returns the realized amplitude.
    #[tracing::instrument(level = "debug", skip(self), fields(device = %self.config.name))]
    pub fn set_amplitude(&mut self, channel: Channel, fraction: f64) -> Result<f64, Ad9959Error> {
        self.ensure_manual()?;
        self.write_amplitude(channel, fraction)
    }

    /// Programs a linear sweep on `channel`. Returns the transmitted registers.
    #[tracing::instrument(level = "debug", skip(self), fields(device = %self.config.name))]
    pub fn set_ramp(
        &mut self,
        channel: Channel,
        spec: &RampSpec,
    ) -> Result<RampRegisters, Ad9959Error> {
        self.ensure_manual()?;
        let registers = spec.registers(&self.config.ramp_option())?;
        self.send(&Command::SetRamp { channel, registers })?;
        Ok(registers)
    }

    /// Closes the link.
    pub fn close(&mut self) -> Result<(), Ad9959Error> {
        if !self.link.is_open() {
            return Ok(());
        }
        self.link.close()?;
        Ok(())
    }

    fn ensure_manual(&self) -> Result<(), Ad9959Error> {
        match self.mode {
            Mode::Manual => Ok(()),
            Mode::Buffered => Err(Ad9959Error::NotInManualMode),
        }
    }

    pub(crate) fn write_frequency(
        &mut self,
        channel: Channel,
        values: &[Freq<f64>],
    ) -> Result<Vec<Freq<f64>>, Ad9959Error> {
        let policy = self.config.limit_policy();
        policy.validate_frequency(values)?;
        let list = if policy.check_frequency(values) {
            FrequencyList::from_hz(values, self.config.divider)?
        } else {
            FrequencyList::from_hz(&policy.coerce_frequency(values).value, self.config.divider)?
        };
        self.send(&Command::SetFrequency {
            channel,
            values: list.clone(),
        })?;
        let realized = list.realized(self.config.divider);
        self.realized[channel.idx() as usize].frequencies = Some(realized.clone());
        Ok(realized)
    }

    pub(crate) fn write_phase(
        &mut self,
        channel: Channel,
        degrees: f64,
    ) -> Result<f64, Ad9959Error> {
        let degrees = finite(Quantity::Phase, degrees)?;
        let phase = Phase::from_degrees(self.config.limit_policy().coerce_phase(degrees).value)?;
        self.send(&Command::SetPhase { channel, phase })?;
        let realized = phase.realized();
        self.realized[channel.idx() as usize].phase = Some(realized);
        Ok(realized)
    }

    pub(crate) fn write_amplitude(
        &mut self,
        channel: Channel,
        fraction: f64,
    ) -> Result<f64, Ad9959Error> {
        let fraction = finite(Quantity::Amplitude, fraction)?;
        let amplitude =
            Amplitude::new(self.config.limit_policy().coerce_amplitude(fraction).value)?;
        self.send(&Command::SetAmplitude { channel, amplitude })?;
        let realized = amplitude.realized();
        self.realized[channel.idx() as usize].amplitude = Some(realized);
        Ok(realized)
    }

    fn send(&mut self, cmd: &Command) -> Result<(), Ad9959Error> {
        if !self.link.is_open() {
            return Err(Ad9959Error::LinkClosed);
        }
        let tx = cmd.encode();

        tracing::debug!("send: {}", cmd);
        // GRCOV_EXCL_START
        tracing::trace!(
            "frame: {}",
            tx.iter()
                .format_with(" ", |b, f| f(&format_args!("{:02X}", b)))
        );
        // GRCOV_EXCL_STOP

        if let Err(e) = self.link.send(&tx) {
            // The bridge cannot resynchronize after a partial frame.
            tracing::error!("Closing link after failing to send {}: {}", cmd, e);
            let _ = self.link.close();
            return Err(e.into());
        }
        if self.mode == Mode::Buffered {
            self.shot_frames += 1;
        }
        self.sleeper.sleep(self.settle_delay);
        Ok(())
    }
}

impl<L: Link> Drop for Controller<L> {
    fn drop(&mut self) {
        if !self.link.is_open() {
            return;
        }
        let _ = self.close();
    }
}
