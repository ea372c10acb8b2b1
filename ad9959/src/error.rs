use ad9959_core::link::LinkError;
use ad9959_driver::error::DriverError;
use thiserror::Error;

/// A interface for error handling in ad9959.
#[derive(Error, Debug, PartialEq, Clone)]
#[non_exhaustive]
pub enum Ad9959Error {
    /// Invalid input rejected before any byte is written.
    #[error("{0}")]
    Driver(#[from] DriverError),
    /// The link failed to write a frame.
    #[error("{0}")]
    Link(#[from] LinkError),
    /// A frame was about to be sent through a closed link.
    #[error("Link is closed")]
    LinkClosed,
    /// A manual command was issued while a shot is in progress.
    #[error("Manual commands are rejected while in buffered mode")]
    NotInManualMode,
    /// The controller is not in buffered mode.
    #[error("Not in buffered mode")]
    NotInBufferedMode,
}
