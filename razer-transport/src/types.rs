//! Common types for transport layer

/// Device identification information
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportDeviceInfo {
    /// USB Vendor ID
    pub vid: u16,
    /// USB Product ID
    pub pid: u16,
    /// HID interface number (-1 if the platform does not report one)
    pub interface_number: i32,
    /// Device path or bus topology string (transport-specific)
    pub device_path: String,
}

/// Discovered device that can be opened
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredDevice {
    /// Device information
    pub info: TransportDeviceInfo,
}

impl DiscoveredDevice {
    /// Shorthand for the bus path
    pub fn path(&self) -> &str {
        &self.info.device_path
    }
}
