#![warn(missing_docs)]

//! An in-process model of the AD9959 bridge firmware.
//!
//! [`BridgeEmulator`] consumes the byte stream exactly as the bridge does and exposes the
//! register state of each channel.

mod channel;
mod emulator;
/// Error definitions.
pub mod error;

pub use channel::ChannelEmulator;
pub use emulator::BridgeEmulator;
