#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::unescaped_backticks)]

//! A driver for the AD9959 DDS behind a serial microcontroller bridge.
//!
//! ```
//! use ad9959::prelude::*;
//!
//! let config = DeviceConfig::new("dds0", "/dev/ttyACM0")
//!     .with_channel("MOT", Channel::CH1)
//!     .with_boot_delay(std::time::Duration::ZERO);
//! let mut dds = Controller::open(config, Nop::new())?;
//! let mot = dds.config().channel("MOT")?;
//! dds.set_frequency(mot, &[80. * MHz])?;
//! dds.set_amplitude(mot, 0.5)?;
//! dds.close()?;
//! # Ok::<(), Ad9959Error>(())
//! ```

/// [`Controller`] and the shot lifecycle.
pub mod controller;
/// Error definitions.
pub mod error;
/// Emulator-backed links.
pub mod link;
/// Commonly used types.
pub mod prelude;

pub use ad9959_driver as driver;

pub use controller::Controller;
