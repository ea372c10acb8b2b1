#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::unescaped_backticks)]

//! A protocol and sequencing layer for the AD9959 serial bridge.
//!
//! Physical values flow through [`limits`] (validation and clipping), [`ramp`] (register
//! derivation, ramps only) and [`firmware`] (frame encoding). Buffered runs are described by a
//! [`sequence::ChannelSequenceTable`] whose trigger timing is checked by [`trigger`].

/// Device configuration.
pub mod config;
/// Error definitions.
pub mod error;
/// Frame definitions of the bridge firmware.
pub mod firmware;
/// Frequency, phase and amplitude limits.
pub mod limits;
/// Ramp register calculation.
pub mod ramp;
/// Per-channel programming for buffered runs.
pub mod sequence;
/// Trigger pulse timing.
pub mod trigger;

pub use ad9959_core as core;
pub use ad9959_core::{channel::Channel, common::*};
