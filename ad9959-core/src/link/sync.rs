use super::error::LinkError;

/// A trait that provides the interface with the bridge.
///
/// A frame passed to [`Link::send`] must reach the bridge with its bytes in order and without
/// interleaving bytes of another frame. An implementation reports [`LinkError`] if it cannot write
/// the frame.
pub trait Link: Send {
    /// Opens the link.
    fn open(&mut self) -> Result<(), LinkError>;

    /// Closes the link.
    fn close(&mut self) -> Result<(), LinkError>;

    /// Writes one complete frame to the bridge.
    fn send(&mut self, frame: &[u8]) -> Result<(), LinkError>;

    /// Checks if the link is open.
    #[must_use]
    fn is_open(&self) -> bool;

    /// Ensures the link is open.
    fn ensure_is_open(&self) -> Result<(), LinkError> {
        if self.is_open() {
            Ok(())
        } else {
            Err(LinkError::closed())
        }
    }
}

impl Link for Box<dyn Link> {
    fn open(&mut self) -> Result<(), LinkError> {
        self.as_mut().open()
    }

    fn close(&mut self) -> Result<(), LinkError> {
        self.as_mut().close()
    }

    fn send(&mut self, frame: &[u8]) -> Result<(), LinkError> {
        self.as_mut().send(frame)
    }

    fn is_open(&self) -> bool {
        self.as_ref().is_open()
    }

    fn ensure_is_open(&self) -> Result<(), LinkError> {
        self.as_ref().ensure_is_open()
    }
}
