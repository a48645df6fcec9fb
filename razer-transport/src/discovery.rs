//! Device discovery for Razer mice

use std::ffi::CString;
use std::sync::Arc;

use hidapi::HidApi;
use tracing::{debug, info};

use crate::device_registry;
use crate::error::TransportError;
use crate::hid_wired::HidWiredTransport;
use crate::protocol::timing;
use crate::types::{DiscoveredDevice, TransportDeviceInfo};
use crate::Transport;

/// Device discovery abstraction
///
/// This is the enumeration feed the registry consumes: it reports which
/// supported devices are currently attached and opens transports to them.
pub trait DeviceDiscovery: Send + Sync {
    /// List currently available devices
    fn list_devices(&self) -> Result<Vec<DiscoveredDevice>, TransportError>;

    /// Open a specific device
    fn open_device(&self, device: &DiscoveredDevice)
        -> Result<Arc<dyn Transport>, TransportError>;
}

/// HID device discovery over hidapi
pub struct HidDiscovery {
    /// Known VID/PID pairs to look for
    known_devices: Vec<(u16, u16)>,
    /// Command delay applied to every opened transport
    command_delay_ms: u64,
}

impl HidDiscovery {
    /// Create a new HID discovery instance
    ///
    /// Fails with [`TransportError::Unavailable`] if the HID backend cannot
    /// be initialised at all.
    pub fn new() -> Result<Self, TransportError> {
        // Probe once so an unusable HID stack is reported at init time
        HidApi::new().map_err(|e| TransportError::Unavailable(e.to_string()))?;
        Ok(Self {
            known_devices: device_registry::default_vid_pids(),
            command_delay_ms: timing::DEFAULT_COMMAND_DELAY_MS,
        })
    }

    /// Add a VID/PID pair to discover
    pub fn add_device(&mut self, vid: u16, pid: u16) {
        if !self.known_devices.contains(&(vid, pid)) {
            self.known_devices.push((vid, pid));
        }
    }

    /// Set the delay between request and response on opened transports
    pub fn set_command_delay(&mut self, ms: u64) {
        self.command_delay_ms = ms;
    }

    /// Check if a device matches our known devices
    fn is_known_device(&self, vid: u16, pid: u16) -> bool {
        self.known_devices.contains(&(vid, pid))
    }

    fn is_control_interface(device_info: &hidapi::DeviceInfo) -> bool {
        device_info.interface_number() == device_registry::CONTROL_INTERFACE
    }
}

impl DeviceDiscovery for HidDiscovery {
    fn list_devices(&self) -> Result<Vec<DiscoveredDevice>, TransportError> {
        let api = HidApi::new().map_err(|e| TransportError::Unavailable(e.to_string()))?;
        let mut devices: Vec<DiscoveredDevice> = Vec::new();

        for device_info in api.device_list() {
            let vid = device_info.vendor_id();
            let pid = device_info.product_id();

            if !self.is_known_device(vid, pid) || !Self::is_control_interface(device_info) {
                continue;
            }

            let path = device_info.path().to_string_lossy().to_string();
            if devices.iter().any(|d| d.info.device_path == path) {
                continue;
            }

            debug!("Found device: VID={:04X} PID={:04X} path={}", vid, pid, path);

            devices.push(DiscoveredDevice {
                info: TransportDeviceInfo {
                    vid,
                    pid,
                    interface_number: device_info.interface_number(),
                    device_path: path,
                },
            });
        }

        info!("Found {} devices", devices.len());
        Ok(devices)
    }

    fn open_device(
        &self,
        device: &DiscoveredDevice,
    ) -> Result<Arc<dyn Transport>, TransportError> {
        let api = HidApi::new().map_err(|e| TransportError::Unavailable(e.to_string()))?;

        let present = api
            .device_list()
            .any(|d| d.path().to_string_lossy() == device.info.device_path.as_str());
        if !present {
            return Err(TransportError::DeviceNotFound(device.info.device_path.clone()));
        }

        let path = CString::new(device.info.device_path.as_str())
            .map_err(|_| TransportError::DeviceNotFound(device.info.device_path.clone()))?;
        let hid = api.open_path(&path).map_err(TransportError::from)?;

        let mut transport = HidWiredTransport::new(hid, device.info.clone());
        transport.set_command_delay(self.command_delay_ms);

        info!(
            "Opened transport for {:04X}:{:04X} at {}",
            device.info.vid, device.info.pid, device.info.device_path
        );
        Ok(Arc::new(transport))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[ignore] // requires a HID backend
    fn test_list_devices() {
        // Passes without any mouse attached
        let discovery = HidDiscovery::new().unwrap();
        assert!(discovery.list_devices().is_ok());
    }
}
