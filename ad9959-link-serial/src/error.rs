use ad9959_core::link::LinkError;
use thiserror::Error;

/// An error produced by [`SerialLink`](crate::SerialLink).
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum SerialError {
    /// The port could not be opened or configured.
    #[error("{0}")]
    Serial(#[from] serialport::Error),
    /// Writing to the port failed.
    #[error("{0}")]
    Io(#[from] std::io::Error),
}

impl From<SerialError> for LinkError {
    fn from(val: SerialError) -> LinkError {
        LinkError::new(val.to_string())
    }
}
