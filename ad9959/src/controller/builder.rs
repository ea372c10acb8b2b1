use std::time::Duration;

use ad9959_core::{
    common::SETTLE_DELAY,
    link::Link,
    sleep::{Sleep, SpinSleeper},
};
use ad9959_driver::config::DeviceConfig;

use super::{Controller, Mode};
use crate::error::Ad9959Error;

/// A builder for [`Controller`].
#[derive(Debug)]
pub struct ControllerBuilder {
    config: DeviceConfig,
    sleeper: Box<dyn Sleep + Send>,
    settle_delay: Duration,
}

impl ControllerBuilder {
    /// Creates a builder with a [`SpinSleeper`] and the default settle delay.
    #[must_use]
    pub fn new(config: DeviceConfig) -> Self {
        Self {
            config,
            sleeper: Box::new(SpinSleeper::default()),
            settle_delay: SETTLE_DELAY,
        }
    }

    /// Sets the sleeper used for the boot delay and the settle delay between frames.
    #[must_use]
    pub fn with_sleeper(mut self, sleeper: impl Sleep + Send + 'static) -> Self {
        self.sleeper = Box::new(sleeper);
        self
    }

    /// Sets the delay after each frame.
    #[must_use]
    pub fn with_settle_delay(mut self, settle_delay: Duration) -> Self {
        self.settle_delay = settle_delay;
        self
    }

    /// Opens `link`, waits for the bridge to boot and programs the default frequencies.
    #[tracing::instrument(level = "debug", skip(self, link), fields(device = %self.config.name, port = %self.config.port))]
    pub fn open<L: Link>(self, mut link: L) -> Result<Controller<L>, Ad9959Error> {
        self.config.validate()?;
        let defaults = self.config.default_frequencies()?;

        link.open()?;
        tracing::debug!("Waiting {:?} for the bridge to boot", self.config.boot_delay);
        self.sleeper.sleep(self.config.boot_delay);

        let mut cnt = Controller {
            link,
            config: self.config,
            sleeper: self.sleeper,
            settle_delay: self.settle_delay,
            mode: Mode::Manual,
            shot_frames: 0,
            realized: Default::default(),
        };
        defaults
            .into_iter()
            .try_for_each(|(ch, f)| cnt.set_frequency(ch, &[f]).map(|_| ()))?;
        Ok(cnt)
    }
}
