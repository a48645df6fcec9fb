//! HID transport implementation for USB-connected mice

use hidapi::HidDevice;
use parking_lot::Mutex;
use tracing::debug;

use crate::error::TransportError;
use crate::protocol::{timing, REPORT_SIZE};
use crate::types::TransportDeviceInfo;
use crate::Transport;

/// HID transport for a wired USB mouse
///
/// Commands travel as feature reports on the control interface. The device
/// handle is closed when the last reference to the transport is dropped.
pub struct HidWiredTransport {
    /// Control interface
    device: Mutex<HidDevice>,
    /// Device information
    info: TransportDeviceInfo,
    /// Delay between request and response (ms)
    command_delay_ms: u64,
}

impl HidWiredTransport {
    /// Create a new wired transport from an opened HID device
    pub fn new(device: HidDevice, info: TransportDeviceInfo) -> Self {
        Self {
            device: Mutex::new(device),
            info,
            command_delay_ms: timing::DEFAULT_COMMAND_DELAY_MS,
        }
    }

    /// Set delay between request and response (default 15ms)
    pub fn set_command_delay(&mut self, ms: u64) {
        self.command_delay_ms = ms;
    }
}

impl Transport for HidWiredTransport {
    fn send_report(&self, buf: &[u8]) -> Result<(), TransportError> {
        let device = self.device.lock();
        device.send_feature_report(buf)?;
        Ok(())
    }

    fn read_report(&self, report_id: u8) -> Result<Vec<u8>, TransportError> {
        let device = self.device.lock();
        let mut buf = vec![0u8; REPORT_SIZE];
        buf[0] = report_id;
        let n = device.get_feature_report(&mut buf)?;
        if n < REPORT_SIZE {
            debug!("Short feature report: {} of {} bytes", n, REPORT_SIZE);
            buf.truncate(n);
        }
        Ok(buf)
    }

    fn device_info(&self) -> &TransportDeviceInfo {
        &self.info
    }

    fn command_delay_ms(&self) -> u64 {
        self.command_delay_ms
    }
}

impl Drop for HidWiredTransport {
    fn drop(&mut self) {
        debug!("HidWiredTransport dropped for {}", self.info.device_path);
    }
}
