//! One registered mouse and its claim

use std::fmt;

use razer_mouse::{
    FirmwareVersion, Frequency, FrequencyList, Led, LedList, LedState, MouseBackend, MouseError,
    MouseId, MouseType, Resolution, ResolutionList,
};
use razer_transport::{BoxedTransport, DiscoveredDevice, TransportDeviceInfo};
use tracing::{debug, warn};

use crate::error::HalError;

/// Claim state of a registered mouse
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClaimState {
    Released,
    Claimed,
    /// Claimed, but the device has gone away
    Broken,
}

impl fmt::Display for ClaimState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ClaimState::Released => "released",
            ClaimState::Claimed => "claimed",
            ClaimState::Broken => "broken",
        })
    }
}

/// A mouse known to the registry
///
/// Live-state operations need a claim. On a released mouse they fail with
/// [`HalError::NotClaimed`]; on a broken claim with [`HalError::ClaimBroken`].
pub struct Mouse {
    id: MouseId,
    mouse_type: MouseType,
    device: DiscoveredDevice,
    state: ClaimState,
    /// Seen by the most recent rescan
    present: bool,
    backend: Box<dyn MouseBackend>,
}

impl Mouse {
    pub(crate) fn new(id: MouseId, device: DiscoveredDevice, backend: Box<dyn MouseBackend>) -> Self {
        Self {
            id,
            mouse_type: backend.mouse_type(),
            device,
            state: ClaimState::Released,
            present: true,
            backend,
        }
    }

    /// Identity string, unique among live mice
    pub fn id(&self) -> &MouseId {
        &self.id
    }

    pub fn mouse_type(&self) -> MouseType {
        self.mouse_type
    }

    pub fn claim_state(&self) -> ClaimState {
        self.state
    }

    pub fn is_claimed(&self) -> bool {
        self.state == ClaimState::Claimed
    }

    /// What the bus reported for this mouse
    pub fn device_info(&self) -> &TransportDeviceInfo {
        &self.device.info
    }

    pub(crate) fn device(&self) -> &DiscoveredDevice {
        &self.device
    }

    pub(crate) fn is_present(&self) -> bool {
        self.present
    }

    pub(crate) fn set_present(&mut self, present: bool) {
        self.present = present;
    }

    pub(crate) fn matches(&self, device: &DiscoveredDevice) -> bool {
        let info = &self.device.info;
        info.vid == device.info.vid
            && info.pid == device.info.pid
            && info.device_path == device.info.device_path
    }

    pub(crate) fn claim(&mut self, transport: BoxedTransport) -> Result<(), HalError> {
        match self.state {
            ClaimState::Claimed => return Err(HalError::AlreadyClaimed(self.id.to_string())),
            ClaimState::Broken => return Err(HalError::ClaimBroken(self.id.to_string())),
            ClaimState::Released => {}
        }
        self.backend.claim(transport)?;
        self.state = ClaimState::Claimed;
        debug!("Claimed {}", self.id);
        Ok(())
    }

    pub(crate) fn release(&mut self) {
        if self.state == ClaimState::Released {
            return;
        }
        self.backend.release();
        debug!("Released {} ({})", self.id, self.state);
        self.state = ClaimState::Released;
    }

    pub(crate) fn mark_broken(&mut self) {
        if self.state == ClaimState::Claimed {
            warn!("{} vanished while claimed", self.id);
            self.state = ClaimState::Broken;
        }
    }

    /// Run `op` on the backend of a live claim
    ///
    /// A disconnect reported by the backend breaks the claim.
    fn with_backend<T>(
        &mut self,
        op: impl FnOnce(&mut dyn MouseBackend) -> Result<T, MouseError>,
    ) -> Result<T, HalError> {
        match self.state {
            ClaimState::Released => return Err(HalError::NotClaimed(self.id.to_string())),
            ClaimState::Broken => return Err(HalError::ClaimBroken(self.id.to_string())),
            ClaimState::Claimed => {}
        }
        op(self.backend.as_mut()).map_err(|e| {
            if e.is_disconnect() {
                self.mark_broken();
            }
            HalError::from(e)
        })
    }

    pub fn firmware_version(&mut self) -> Result<FirmwareVersion, HalError> {
        self.with_backend(|b| b.firmware_version())
    }

    /// Frequencies accepted by [`set_frequency`](Self::set_frequency)
    pub fn supported_frequencies(&mut self) -> Result<FrequencyList, HalError> {
        self.with_backend(|b| b.supported_frequencies())
    }

    pub fn frequency(&mut self) -> Result<Frequency, HalError> {
        self.with_backend(|b| b.frequency())
    }

    /// Set the scan frequency; `freq` must be in the supported list
    pub fn set_frequency(&mut self, freq: Frequency) -> Result<(), HalError> {
        let supported = self.supported_frequencies()?;
        if !supported.contains(freq) {
            return Err(MouseError::InvalidParameter(format!(
                "{} does not support {}",
                self.id, freq
            ))
            .into());
        }
        self.with_backend(|b| b.set_frequency(freq))
    }

    /// Resolutions accepted by [`set_resolution`](Self::set_resolution)
    pub fn supported_resolutions(&mut self) -> Result<ResolutionList, HalError> {
        self.with_backend(|b| b.supported_resolutions())
    }

    pub fn resolution(&mut self) -> Result<Resolution, HalError> {
        self.with_backend(|b| b.resolution())
    }

    /// Set the scan resolution; `res` must be in the supported list
    pub fn set_resolution(&mut self, res: Resolution) -> Result<(), HalError> {
        let supported = self.supported_resolutions()?;
        if !supported.contains(res) {
            return Err(MouseError::InvalidParameter(format!(
                "{} does not support {}",
                self.id, res
            ))
            .into());
        }
        self.with_backend(|b| b.set_resolution(res))
    }

    /// Enumerate LEDs, each stamped with this mouse as owner
    pub fn leds(&mut self) -> Result<LedList, HalError> {
        let mut leds = self.with_backend(|b| b.leds())?;
        leds.assign_owner(&self.id);
        Ok(leds)
    }

    /// Switch an LED enumerated from this mouse
    pub fn toggle_led(&mut self, led: &mut Led, state: LedState) -> Result<(), HalError> {
        if led.owner() != Some(&self.id) {
            return Err(MouseError::InvalidParameter(format!(
                "LED {} does not belong to {}",
                led.name(),
                self.id
            ))
            .into());
        }
        self.with_backend(|b| led.toggle_state(b, state))
    }
}

impl fmt::Debug for Mouse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mouse")
            .field("id", &self.id)
            .field("mouse_type", &self.mouse_type)
            .field("state", &self.state)
            .finish()
    }
}
