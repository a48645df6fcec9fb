//! Krait backend
//!
//! The Krait scans at a fixed rate and has no LEDs. Only the resolution can
//! be changed, between two steps.

use razer_transport::{BoxedTransport, HidCommand, HidResponse, ParseError, TransportExt};
use tracing::{debug, warn};

use crate::backend::{claimed, MouseBackend, MouseType};
use crate::capability::{FrequencyList, ResolutionList};
use crate::error::MouseError;
use crate::led::{LedList, LedState};
use crate::settings::{FirmwareVersion, Frequency, Resolution};
use crate::wire::{FirmwareReply, GetFirmware, SetDriverMode};

/// Krait command bytes
pub mod cmd {
    /// Set resolution: data[0] = resolution code
    pub const SET_RESOLUTION: u8 = 0x03;
    /// Status: reply [freq code, resolution code]
    pub const GET_STATUS: u8 = 0x83;
}

const RESOLUTIONS: &[Resolution] = &[Resolution::Dpi400, Resolution::Dpi1600];

pub fn encode_resolution(res: Resolution) -> Option<u8> {
    match res {
        Resolution::Dpi1600 => Some(0x01),
        Resolution::Dpi400 => Some(0x02),
        _ => None,
    }
}

pub fn decode_resolution(code: u8) -> Resolution {
    match code {
        0x01 => Resolution::Dpi1600,
        0x02 => Resolution::Dpi400,
        _ => Resolution::Unknown,
    }
}

/// The only rate the sensor reports
pub fn decode_frequency(code: u8) -> Frequency {
    match code {
        0x01 => Frequency::Hz1000,
        _ => Frequency::Unknown,
    }
}

/// GET_STATUS (0x83)
#[derive(Debug, Clone, Copy, Default)]
pub struct GetStatus;

impl HidCommand for GetStatus {
    const CMD: u8 = cmd::GET_STATUS;

    fn to_data(&self) -> Vec<u8> {
        Vec::new()
    }
}

/// GET_STATUS reply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusReply {
    pub freq: u8,
    pub res: u8,
}

impl HidResponse for StatusReply {
    const MIN_LEN: usize = 2;

    fn from_data(data: &[u8]) -> Result<Self, ParseError> {
        Ok(Self {
            freq: data[0],
            res: data[1],
        })
    }
}

/// SET_RESOLUTION (0x03)
#[derive(Debug, Clone, Copy)]
pub struct SetResolution {
    pub code: u8,
}

impl HidCommand for SetResolution {
    const CMD: u8 = cmd::SET_RESOLUTION;

    fn to_data(&self) -> Vec<u8> {
        vec![self.code]
    }
}

/// Razer Krait
#[derive(Default)]
pub struct Krait {
    transport: Option<BoxedTransport>,
}

impl Krait {
    pub fn new() -> Self {
        Self::default()
    }

    fn status(&self) -> Result<StatusReply, MouseError> {
        let transport = claimed(&self.transport)?;
        Ok(transport.query(&GetStatus)?)
    }
}

impl MouseBackend for Krait {
    fn mouse_type(&self) -> MouseType {
        MouseType::Krait
    }

    fn claim(&mut self, transport: BoxedTransport) -> Result<(), MouseError> {
        transport.send(&SetDriverMode { enabled: true })?;
        self.transport = Some(transport);
        Ok(())
    }

    fn release(&mut self) {
        if let Some(transport) = self.transport.take() {
            if let Err(e) = transport.send(&SetDriverMode { enabled: false }) {
                warn!("Krait: failed to leave driver mode: {}", e);
            }
        }
    }

    fn is_claimed(&self) -> bool {
        self.transport.is_some()
    }

    fn firmware_version(&mut self) -> Result<FirmwareVersion, MouseError> {
        let transport = claimed(&self.transport)?;
        let reply: FirmwareReply = transport.query(&GetFirmware)?;
        Ok(reply.0)
    }

    fn supported_frequencies(&mut self) -> Result<FrequencyList, MouseError> {
        Ok(FrequencyList::empty())
    }

    fn frequency(&mut self) -> Result<Frequency, MouseError> {
        Ok(decode_frequency(self.status()?.freq))
    }

    fn set_frequency(&mut self, freq: Frequency) -> Result<(), MouseError> {
        Err(MouseError::InvalidParameter(format!(
            "Krait scan rate is fixed, cannot set {}",
            freq
        )))
    }

    fn supported_resolutions(&mut self) -> Result<ResolutionList, MouseError> {
        Ok(ResolutionList::new(RESOLUTIONS.to_vec()))
    }

    fn resolution(&mut self) -> Result<Resolution, MouseError> {
        Ok(decode_resolution(self.status()?.res))
    }

    fn set_resolution(&mut self, res: Resolution) -> Result<(), MouseError> {
        let code = encode_resolution(res)
            .ok_or_else(|| MouseError::InvalidParameter(format!("resolution {}", res)))?;
        let transport = claimed(&self.transport)?;
        transport.send(&SetResolution { code })?;
        debug!("Krait resolution -> {}", res);
        Ok(())
    }

    fn leds(&mut self) -> Result<LedList, MouseError> {
        claimed(&self.transport)?;
        Ok(LedList::empty())
    }

    fn set_led_state(&mut self, led_id: u32, _state: LedState) -> Result<(), MouseError> {
        Err(MouseError::InvalidParameter(format!(
            "Krait has no LED with id {}",
            led_id
        )))
    }
}

#[cfg(test)]
mod tests {
    use razer_transport::device_registry;
    use razer_transport::mock::{MockBus, MockDevice};
    use razer_transport::DeviceDiscovery;

    use super::*;
    use crate::sim::KraitSim;

    fn claimed_backend() -> Krait {
        let bus = MockBus::new();
        bus.plug(MockDevice::razer(
            device_registry::PID_KRAIT,
            "usb-2",
            Box::new(KraitSim::new()),
        ));
        let dev = bus.list_devices().unwrap().remove(0);
        let mut backend = Krait::new();
        backend.claim(bus.open_device(&dev).unwrap()).unwrap();
        backend
    }

    #[test]
    fn test_frequency_list_is_empty_not_error() {
        let mut backend = claimed_backend();
        let list = backend.supported_frequencies().unwrap();
        assert!(list.is_empty());
        assert_eq!(backend.frequency().unwrap(), Frequency::Hz1000);
        assert!(backend.set_frequency(Frequency::Hz500).is_err());
    }

    #[test]
    fn test_resolution_round_trip() {
        let mut backend = claimed_backend();
        backend.set_resolution(Resolution::Dpi400).unwrap();
        assert_eq!(backend.resolution().unwrap(), Resolution::Dpi400);
        backend.set_resolution(Resolution::Dpi1600).unwrap();
        assert_eq!(backend.resolution().unwrap(), Resolution::Dpi1600);
        assert!(matches!(
            backend.set_resolution(Resolution::Dpi900),
            Err(MouseError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_no_leds() {
        let mut backend = claimed_backend();
        assert!(backend.leds().unwrap().is_empty());
    }
}
