//! Transport abstraction layer for Razer mouse communication
//!
//! This crate provides the bus side of the stack:
//!
//! - [`DeviceDiscovery`]: the enumeration feed (hidapi-backed [`HidDiscovery`])
//! - [`Transport`]: raw feature-report I/O to one opened device
//! - [`TransportExt`]: one request/response exchange with framing and checksum
//! - [`ErrorKind`]: the error taxonomy every layer above classifies into

pub mod command;
pub mod device_registry;
pub mod error;
pub mod protocol;
pub mod types;

mod discovery;
mod hid_wired;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use command::{Ack, HidCommand, HidResponse, ParseError, TransportExt};
pub use device_registry::{is_known_mouse_pid, MOUSE_PIDS, VENDOR_ID};
pub use discovery::{DeviceDiscovery, HidDiscovery};
pub use error::{ErrorKind, TransportError};
pub use hid_wired::HidWiredTransport;
pub use types::{DiscoveredDevice, TransportDeviceInfo};

use std::sync::Arc;

/// The core transport trait - all backends implement this
///
/// Implementations only move whole feature reports; framing, checksums and
/// echo matching are handled by [`TransportExt`]. All calls block until the
/// OS completes or fails the transfer.
pub trait Transport: Send + Sync {
    /// Write one feature report (report ID in byte 0)
    fn send_report(&self, buf: &[u8]) -> Result<(), TransportError>;

    /// Read one feature report for `report_id`
    fn read_report(&self, report_id: u8) -> Result<Vec<u8>, TransportError>;

    /// Get device information
    fn device_info(&self) -> &TransportDeviceInfo;

    /// Pause between a request and reading its response
    fn command_delay_ms(&self) -> u64 {
        0
    }
}

/// Type alias for a shared transport
pub type BoxedTransport = Arc<dyn Transport>;
