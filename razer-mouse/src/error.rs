//! Mouse backend error types

use razer_transport::{ErrorKind, TransportError};
use thiserror::Error;

/// Errors from mouse backend operations
#[derive(Error, Debug)]
pub enum MouseError {
    /// Transport layer error
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Value outside what this model accepts
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Device returned a well-framed but meaningless response
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),

    /// Backend has no open transport
    #[error("Device not claimed")]
    NotClaimed,
}

impl MouseError {
    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            MouseError::Transport(e) => e.kind(),
            MouseError::InvalidParameter(_) => ErrorKind::InvalidArgument,
            MouseError::UnexpectedResponse(_) => ErrorKind::Protocol,
            MouseError::NotClaimed => ErrorKind::ContractViolation,
        }
    }

    /// Negative errno-style code
    pub fn code(&self) -> i32 {
        self.kind().code()
    }

    /// True if the underlying device is gone
    pub fn is_disconnect(&self) -> bool {
        matches!(self, MouseError::Transport(e) if e.is_disconnect())
    }
}
