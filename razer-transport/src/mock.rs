//! In-memory bus for exercising the stack without hardware
//!
//! A [`MockBus`] stands in for [`HidDiscovery`](crate::HidDiscovery). Devices
//! are plugged in with a [`MockFirmware`] that answers decoded requests.
//! Switches on the bus simulate unplugging, OS-level busy devices, an
//! unreachable enumeration backend and corrupted replies.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::discovery::DeviceDiscovery;
use crate::error::TransportError;
use crate::protocol::{self, status};
use crate::types::{DiscoveredDevice, TransportDeviceInfo};
use crate::Transport;

/// Device-side behaviour of a simulated mouse
pub trait MockFirmware: Send {
    /// Handle one decoded request
    ///
    /// `Ok(payload)` answers with status OK, `Err(status)` with that status.
    fn handle(&mut self, cmd: u8, data: &[u8]) -> Result<Vec<u8>, u8>;
}

/// Shared state of one plugged-in device
struct MockDeviceState {
    info: TransportDeviceInfo,
    firmware: Mutex<Box<dyn MockFirmware>>,
    pending: Mutex<Option<Vec<u8>>>,
    present: AtomicBool,
    corrupt: AtomicBool,
    writes: AtomicUsize,
}

/// A simulated device, ready to be plugged into a [`MockBus`]
pub struct MockDevice {
    state: Arc<MockDeviceState>,
}

impl MockDevice {
    /// Create a device with the given identity and firmware
    pub fn new(info: TransportDeviceInfo, firmware: Box<dyn MockFirmware>) -> Self {
        Self {
            state: Arc::new(MockDeviceState {
                info,
                firmware: Mutex::new(firmware),
                pending: Mutex::new(None),
                present: AtomicBool::new(true),
                corrupt: AtomicBool::new(false),
                writes: AtomicUsize::new(0),
            }),
        }
    }

    /// Convenience constructor for a Razer device at `path`
    pub fn razer(pid: u16, path: &str, firmware: Box<dyn MockFirmware>) -> Self {
        Self::new(
            TransportDeviceInfo {
                vid: crate::device_registry::VENDOR_ID,
                pid,
                interface_number: crate::device_registry::CONTROL_INTERFACE,
                device_path: path.to_string(),
            },
            firmware,
        )
    }
}

#[derive(Default)]
struct BusState {
    devices: Vec<Arc<MockDeviceState>>,
    busy: Vec<String>,
}

/// Simulated enumeration feed
#[derive(Clone, Default)]
pub struct MockBus {
    state: Arc<Mutex<BusState>>,
    unavailable: Arc<AtomicBool>,
    opens: Arc<AtomicUsize>,
}

impl MockBus {
    /// Create an empty bus
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a device
    pub fn plug(&self, device: MockDevice) {
        self.state.lock().devices.push(device.state);
    }

    /// Detach the device at `path`; open transports start failing
    pub fn unplug(&self, path: &str) -> bool {
        let mut state = self.state.lock();
        match state.devices.iter().position(|d| d.info.device_path == path) {
            Some(pos) => {
                let dev = state.devices.remove(pos);
                dev.present.store(false, Ordering::SeqCst);
                true
            }
            None => false,
        }
    }

    /// Make `open_device` fail for `path` as if another process held it
    pub fn set_busy(&self, path: &str, busy: bool) {
        let mut state = self.state.lock();
        state.busy.retain(|p| p != path);
        if busy {
            state.busy.push(path.to_string());
        }
    }

    /// Make the device at `path` answer with a broken checksum
    pub fn set_corrupt(&self, path: &str, corrupt: bool) {
        let state = self.state.lock();
        if let Some(dev) = state.devices.iter().find(|d| d.info.device_path == path) {
            dev.corrupt.store(corrupt, Ordering::SeqCst);
        }
    }

    /// Make enumeration fail as a whole
    pub fn set_available(&self, available: bool) {
        self.unavailable.store(!available, Ordering::SeqCst);
    }

    /// Number of successful `open_device` calls so far
    pub fn open_count(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }

    /// Number of requests written to the device at `path`
    pub fn write_count(&self, path: &str) -> usize {
        let state = self.state.lock();
        state
            .devices
            .iter()
            .find(|d| d.info.device_path == path)
            .map(|d| d.writes.load(Ordering::SeqCst))
            .unwrap_or(0)
    }

    fn check_available(&self) -> Result<(), TransportError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(TransportError::Unavailable("mock bus offline".into()));
        }
        Ok(())
    }
}

impl DeviceDiscovery for MockBus {
    fn list_devices(&self) -> Result<Vec<DiscoveredDevice>, TransportError> {
        self.check_available()?;
        let state = self.state.lock();
        Ok(state
            .devices
            .iter()
            .map(|d| DiscoveredDevice {
                info: d.info.clone(),
            })
            .collect())
    }

    fn open_device(
        &self,
        device: &DiscoveredDevice,
    ) -> Result<Arc<dyn Transport>, TransportError> {
        self.check_available()?;
        let state = self.state.lock();
        if state.busy.iter().any(|p| p == device.path()) {
            return Err(TransportError::Busy);
        }
        let dev = state
            .devices
            .iter()
            .find(|d| d.info.device_path == device.info.device_path)
            .ok_or_else(|| TransportError::DeviceNotFound(device.info.device_path.clone()))?;
        self.opens.fetch_add(1, Ordering::SeqCst);
        Ok(Arc::new(MockTransport {
            state: Arc::clone(dev),
        }))
    }
}

/// Transport to a simulated device
pub struct MockTransport {
    state: Arc<MockDeviceState>,
}

impl MockTransport {
    fn check_present(&self) -> Result<(), TransportError> {
        if !self.state.present.load(Ordering::SeqCst) {
            return Err(TransportError::Disconnected);
        }
        Ok(())
    }
}

impl Transport for MockTransport {
    fn send_report(&self, buf: &[u8]) -> Result<(), TransportError> {
        self.check_present()?;
        self.state.writes.fetch_add(1, Ordering::SeqCst);
        let request = protocol::parse_request(buf)?;
        let reply = self.state.firmware.lock().handle(request.cmd, &request.data);
        let mut resp = match reply {
            Ok(payload) => protocol::build_response(request.cmd, status::OK, &payload),
            Err(code) => protocol::build_response(request.cmd, code, &[]),
        };
        if self.state.corrupt.load(Ordering::SeqCst) {
            resp[protocol::REPORT_SIZE - 1] ^= 0x5A;
        }
        *self.state.pending.lock() = Some(resp);
        Ok(())
    }

    fn read_report(&self, report_id: u8) -> Result<Vec<u8>, TransportError> {
        self.check_present()?;
        match self.state.pending.lock().take() {
            Some(resp) => Ok(resp),
            None => {
                // Nothing was asked; a real device returns an all-zero report
                let mut buf = vec![0u8; protocol::REPORT_SIZE];
                buf[0] = report_id;
                Ok(buf)
            }
        }
    }

    fn device_info(&self) -> &TransportDeviceInfo {
        &self.state.info
    }
}
