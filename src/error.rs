//! HAL error types

use razer_mouse::MouseError;
use razer_transport::{ErrorKind, TransportError};
use thiserror::Error;

/// Errors returned by the registry and lifecycle layer
#[derive(Error, Debug)]
pub enum HalError {
    /// Backend operation failed
    #[error(transparent)]
    Mouse(#[from] MouseError),

    /// Opening a transport failed (permission, busy, gone)
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// HID stack unusable or enumeration failed
    #[error("Transport unavailable: {0}")]
    TransportUnavailable(String),

    /// Identity not present in the registry
    #[error("No such device: {0}")]
    StaleDevice(String),

    #[error("Device already claimed: {0}")]
    AlreadyClaimed(String),

    #[error("Device not claimed: {0}")]
    NotClaimed(String),

    /// Device vanished while claimed; release it
    #[error("Claim on {0} is broken, device is gone")]
    ClaimBroken(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl HalError {
    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            HalError::Mouse(e) => e.kind(),
            HalError::Transport(e) => e.kind(),
            HalError::TransportUnavailable(_) => ErrorKind::TransportUnavailable,
            HalError::StaleDevice(_) | HalError::Config(_) => ErrorKind::InvalidArgument,
            HalError::AlreadyClaimed(_) | HalError::ClaimBroken(_) => ErrorKind::Unreachable,
            HalError::NotClaimed(_) => ErrorKind::ContractViolation,
        }
    }

    /// Negative errno-style code
    pub fn code(&self) -> i32 {
        self.kind().code()
    }
}

impl From<toml::de::Error> for HalError {
    fn from(e: toml::de::Error) -> Self {
        HalError::Config(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds() {
        assert_eq!(
            HalError::TransportUnavailable("no hidraw".into()).kind(),
            ErrorKind::TransportUnavailable
        );
        assert_eq!(
            HalError::AlreadyClaimed("m".into()).code(),
            ErrorKind::Unreachable.code()
        );
        assert_eq!(
            HalError::ClaimBroken("m".into()).kind(),
            ErrorKind::Unreachable
        );
        assert_eq!(
            HalError::NotClaimed("m".into()).kind(),
            ErrorKind::ContractViolation
        );
        assert_eq!(
            HalError::from(MouseError::InvalidParameter("2400 DPI".into())).kind(),
            ErrorKind::InvalidArgument
        );
    }
}
