//! The error type lifecycle callbacks return.

use thiserror::Error;

/// A failure inside a layer's own code.
///
/// Opaque on purpose: the reconciler isolates the failing layer and
/// reports the first error per pass, it never branches on the cause.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct LayerError {
    message: String,
}

impl LayerError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<&str> for LayerError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

impl From<String> for LayerError {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}
