use derive_more::Display;
use derive_new::new;
use thiserror::Error;

#[derive(new, Error, Debug, Display, PartialEq, Clone)]
#[display("{}", msg)]
/// An error produced by the link.
pub struct LinkError {
    #[new(into)]
    msg: String,
}

impl LinkError {
    /// The error returned when a frame is sent through a link that is not open.
    #[must_use]
    pub fn closed() -> Self {
        Self::new("Link is closed")
    }
}

impl From<std::io::Error> for LinkError {
    fn from(e: std::io::Error) -> Self {
        Self::new(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display() {
        assert_eq!("broken", LinkError::new("broken").to_string());
        assert_eq!("Link is closed", LinkError::closed().to_string());
        assert_eq!(
            "pipe",
            LinkError::from(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe")).to_string()
        );
    }
}
