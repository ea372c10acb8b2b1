#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::unescaped_backticks)]

//! This crate provides a link to the AD9959 bridge over a serial port using [serialport](https://github.com/serialport/serialport-rs).

mod error;
mod option;
mod serial_link;

pub use error::SerialError;
pub use option::SerialOption;
pub use serial_link::SerialLink;
pub use serialport::{DataBits, FlowControl, Parity, StopBits};
