#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::unescaped_backticks)]

//! Core traits and types for the AD9959 bridge.

/// The channel identifier.
pub mod channel;
/// Common constants and units.
pub mod common;
/// A interface to the bridge.
pub mod link;
/// Utilities for blocking waits.
pub mod sleep;
