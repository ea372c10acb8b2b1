pub use crate::{
    controller::{AbortOutcome, Controller, ControllerBuilder, FinalValues, Mode, RealizedValues},
    error::Ad9959Error,
};

#[cfg(feature = "link-nop")]
pub use crate::link::Nop;

pub use ad9959_core::{
    link::{Link, LinkError},
    sleep::{Sleep, SpinSleeper, SpinWaitSleeper, StdSleeper},
};
pub use ad9959_driver::{
    config::DeviceConfig,
    error::DriverError,
    firmware::Divider,
    ramp::{RampRegisters, RampSpec, SlowRampPolicy},
    sequence::{ChannelSequenceTable, SequenceBuilder, SequenceDescription},
    trigger::TriggerModality,
    Channel, Freq, Hz, MHz, kHz,
};
