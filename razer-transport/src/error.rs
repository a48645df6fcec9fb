//! Transport error types and the error taxonomy shared by all layers

use thiserror::Error;

/// Coarse classification of a failure
///
/// Every error raised anywhere in the stack maps onto one of these, so
/// callers can decide retry policy without matching on concrete variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The bus itself cannot be reached (no HID backend, enumeration failed)
    TransportUnavailable,
    /// Claim contention, OS-level busy, or the device went away
    Unreachable,
    /// The device answered, but with malformed or unexpected data
    Protocol,
    /// Caller passed a value outside the device's advertised capabilities
    InvalidArgument,
    /// Operation invoked in a state where it is not allowed (e.g. unclaimed)
    ContractViolation,
}

impl ErrorKind {
    /// Negative errno-style code for this kind
    pub fn code(self) -> i32 {
        match self {
            ErrorKind::TransportUnavailable => -libc::ENODEV,
            ErrorKind::Unreachable => -libc::EBUSY,
            ErrorKind::Protocol => -libc::EPROTO,
            ErrorKind::InvalidArgument => -libc::EINVAL,
            ErrorKind::ContractViolation => -libc::EPERM,
        }
    }
}

/// Errors that can occur during transport operations
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Transport unavailable: {0}")]
    Unavailable(String),

    #[error("Device not found: {0}")]
    DeviceNotFound(String),

    #[error("Device disconnected")]
    Disconnected,

    #[error("Device busy")]
    Busy,

    #[error("Communication timeout")]
    Timeout,

    #[error("Invalid response: expected cmd 0x{expected:02X}, got 0x{actual:02X}")]
    InvalidResponse { expected: u8, actual: u8 },

    #[error("Checksum mismatch")]
    ChecksumError,

    #[error("Command 0x{cmd:02X} failed with status 0x{status:02X}")]
    CommandFailed { cmd: u8, status: u8 },

    #[error("Malformed response: {0}")]
    Malformed(String),

    // HID-specific errors
    #[error("HID error: {0}")]
    HidError(String),

    #[error("HID permission denied: {0}")]
    HidPermissionDenied(String),
}

impl TransportError {
    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            TransportError::Unavailable(_) => ErrorKind::TransportUnavailable,
            TransportError::DeviceNotFound(_)
            | TransportError::Disconnected
            | TransportError::Busy
            | TransportError::Timeout
            | TransportError::HidError(_)
            | TransportError::HidPermissionDenied(_) => ErrorKind::Unreachable,
            TransportError::InvalidResponse { .. }
            | TransportError::ChecksumError
            | TransportError::CommandFailed { .. }
            | TransportError::Malformed(_) => ErrorKind::Protocol,
        }
    }

    /// True if the device is physically gone
    pub fn is_disconnect(&self) -> bool {
        matches!(
            self,
            TransportError::Disconnected | TransportError::DeviceNotFound(_)
        )
    }
}

impl From<hidapi::HidError> for TransportError {
    fn from(e: hidapi::HidError) -> Self {
        let msg = e.to_string();
        if msg.contains("Permission denied") || msg.contains("EPERM") {
            TransportError::HidPermissionDenied(msg)
        } else if msg.contains("No such device") || msg.contains("ENODEV") {
            TransportError::Disconnected
        } else if msg.contains("resource busy") || msg.contains("EBUSY") {
            TransportError::Busy
        } else {
            TransportError::HidError(msg)
        }
    }
}
