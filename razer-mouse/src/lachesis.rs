//! Lachesis backend
//!
//! Every setting has its own get/set pair carrying the physical value as a
//! little-endian u16, and each LED is addressed by its id.

use razer_transport::{BoxedTransport, HidCommand, HidResponse, ParseError, TransportExt};
use tracing::{debug, warn};

use crate::backend::{claimed, MouseBackend, MouseType};
use crate::capability::{FrequencyList, ResolutionList};
use crate::error::MouseError;
use crate::led::{Led, LedList, LedState};
use crate::settings::{FirmwareVersion, Frequency, Resolution};
use crate::wire::{FirmwareReply, GetFirmware};

/// Lachesis command bytes
pub mod cmd {
    pub const SET_FREQUENCY: u8 = 0x05;
    pub const SET_RESOLUTION: u8 = 0x06;
    /// data: [led id, state]
    pub const SET_LED: u8 = 0x07;
    /// data[0] = 1 locks the onboard profile for host control
    pub const SET_CONFIG_LOCK: u8 = 0x08;

    pub const GET_FREQUENCY: u8 = 0x85;
    pub const GET_RESOLUTION: u8 = 0x86;
    /// data: [led id], reply [led id, state]
    pub const GET_LED: u8 = 0x87;
}

/// LED identity cookies
pub mod led {
    pub const GLOW: u32 = 0;
    pub const SCROLLWHEEL: u32 = 1;
}

const LEDS: &[(&str, u32)] = &[("Glow", led::GLOW), ("Scrollwheel", led::SCROLLWHEEL)];

/// Generic "set one u16 value" command
#[derive(Debug, Clone, Copy)]
pub struct SetValue<const CMD: u8>(pub u16);

impl<const C: u8> HidCommand for SetValue<C> {
    const CMD: u8 = C;

    fn to_data(&self) -> Vec<u8> {
        self.0.to_le_bytes().to_vec()
    }
}

/// Generic payload-less query
#[derive(Debug, Clone, Copy, Default)]
pub struct GetValue<const CMD: u8>;

impl<const C: u8> HidCommand for GetValue<C> {
    const CMD: u8 = C;

    fn to_data(&self) -> Vec<u8> {
        Vec::new()
    }
}

pub type SetFrequency = SetValue<{ cmd::SET_FREQUENCY }>;
pub type SetResolution = SetValue<{ cmd::SET_RESOLUTION }>;
pub type SetConfigLock = SetValue<{ cmd::SET_CONFIG_LOCK }>;
pub type GetFrequency = GetValue<{ cmd::GET_FREQUENCY }>;
pub type GetResolution = GetValue<{ cmd::GET_RESOLUTION }>;

/// u16 LE reply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct U16Reply(pub u16);

impl HidResponse for U16Reply {
    const MIN_LEN: usize = 2;

    fn from_data(data: &[u8]) -> Result<Self, ParseError> {
        Ok(Self(u16::from_le_bytes([data[0], data[1]])))
    }
}

/// SET_LED (0x07)
#[derive(Debug, Clone, Copy)]
pub struct SetLed {
    pub id: u8,
    pub state: LedState,
}

impl HidCommand for SetLed {
    const CMD: u8 = cmd::SET_LED;

    fn to_data(&self) -> Vec<u8> {
        vec![self.id, self.state as u8]
    }
}

/// GET_LED (0x87)
#[derive(Debug, Clone, Copy)]
pub struct GetLed {
    pub id: u8,
}

impl HidCommand for GetLed {
    const CMD: u8 = cmd::GET_LED;

    fn to_data(&self) -> Vec<u8> {
        vec![self.id]
    }
}

/// GET_LED reply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedReply {
    pub id: u8,
    pub state: LedState,
}

impl HidResponse for LedReply {
    const MIN_LEN: usize = 2;

    fn from_data(data: &[u8]) -> Result<Self, ParseError> {
        Ok(Self {
            id: data[0],
            state: LedState::from_u8(data[1]),
        })
    }
}

fn led_wire_id(led_id: u32) -> Result<u8, MouseError> {
    if LEDS.iter().any(|&(_, id)| id == led_id) {
        // ids are tiny, the table above guarantees it fits
        Ok(led_id as u8)
    } else {
        Err(MouseError::InvalidParameter(format!(
            "no LED with id {}",
            led_id
        )))
    }
}

/// Razer Lachesis
#[derive(Default)]
pub struct Lachesis {
    transport: Option<BoxedTransport>,
}

impl Lachesis {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MouseBackend for Lachesis {
    fn mouse_type(&self) -> MouseType {
        MouseType::Lachesis
    }

    fn claim(&mut self, transport: BoxedTransport) -> Result<(), MouseError> {
        transport.send(&SetConfigLock::new_flag(true))?;
        self.transport = Some(transport);
        Ok(())
    }

    fn release(&mut self) {
        if let Some(transport) = self.transport.take() {
            if let Err(e) = transport.send(&SetConfigLock::new_flag(false)) {
                warn!("Lachesis: failed to unlock config: {}", e);
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
        Ok(FrequencyList::new(Frequency::ALL.to_vec()))
    }

    fn frequency(&mut self) -> Result<Frequency, MouseError> {
        let transport = claimed(&self.transport)?;
        let reply: U16Reply = transport.query(&GetFrequency::default())?;
        Ok(Frequency::from_hz(u32::from(reply.0)))
    }

    fn set_frequency(&mut self, freq: Frequency) -> Result<(), MouseError> {
        if !freq.is_known() {
            return Err(MouseError::InvalidParameter(format!("frequency {}", freq)));
        }
        let transport = claimed(&self.transport)?;
        // Every known rate fits in u16
        transport.send(&SetFrequency::new(freq.hz() as u16))?;
        debug!("Lachesis frequency -> {}", freq);
        Ok(())
    }

    fn supported_resolutions(&mut self) -> Result<ResolutionList, MouseError> {
        Ok(ResolutionList::new(Resolution::ALL.to_vec()))
    }

    fn resolution(&mut self) -> Result<Resolution, MouseError> {
        let transport = claimed(&self.transport)?;
        let reply: U16Reply = transport.query(&GetResolution::default())?;
        Ok(Resolution::from_dpi(u32::from(reply.0)))
    }

    fn set_resolution(&mut self, res: Resolution) -> Result<(), MouseError> {
        if !res.is_known() {
            return Err(MouseError::InvalidParameter(format!("resolution {}", res)));
        }
        let transport = claimed(&self.transport)?;
        transport.send(&SetResolution::new(res.dpi() as u16))?;
        debug!("Lachesis resolution -> {}", res);
        Ok(())
    }

    fn leds(&mut self) -> Result<LedList, MouseError> {
        let transport = claimed(&self.transport)?;
        let mut leds = Vec::with_capacity(LEDS.len());
        for &(name, id) in LEDS {
            let wire_id = led_wire_id(id)?;
            let reply: LedReply = transport.query(&GetLed { id: wire_id })?;
            if reply.id != wire_id {
                return Err(MouseError::UnexpectedResponse(format!(
                    "asked for LED {}, got {}",
                    wire_id, reply.id
                )));
            }
            leds.push(Led::new(name, id, reply.state));
        }
        Ok(LedList::new(leds))
    }

    fn set_led_state(&mut self, led_id: u32, state: LedState) -> Result<(), MouseError> {
        let id = led_wire_id(led_id)?;
        if state == LedState::Unknown {
            return Err(MouseError::InvalidParameter("LED state unknown".into()));
        }
        let transport = claimed(&self.transport)?;
        transport.send(&SetLed { id, state })?;
        Ok(())
    }
}

impl<const C: u8> SetValue<C> {
    pub fn new(value: u16) -> Self {
        Self(value)
    }

    pub fn new_flag(on: bool) -> Self {
        Self(u16::from(on))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use razer_transport::device_registry;
    use razer_transport::mock::{MockBus, MockDevice};
    use razer_transport::DeviceDiscovery;

    use super::*;
    use crate::sim::LachesisSim;

    fn claimed_backend(sim: LachesisSim) -> Lachesis {
        let bus = MockBus::new();
        bus.plug(MockDevice::razer(
            device_registry::PID_LACHESIS,
            "usb-3",
            Box::new(sim),
        ));
        let dev = bus.list_devices().unwrap().remove(0);
        let mut backend = Lachesis::new();
        backend.claim(bus.open_device(&dev).unwrap()).unwrap();
        backend
    }

    #[test]
    fn test_set_value_encoding() {
        assert_eq!(SetFrequency::new(1000).to_data(), vec![0xE8, 0x03]);
        assert_eq!(SetConfigLock::new_flag(true).to_data(), vec![1, 0]);
    }

    #[test]
    fn test_frequency_and_resolution() {
        let mut backend = claimed_backend(LachesisSim::new());
        backend.set_frequency(Frequency::Hz125).unwrap();
        assert_eq!(backend.frequency().unwrap(), Frequency::Hz125);
        backend.set_resolution(Resolution::Dpi1800).unwrap();
        assert_eq!(backend.resolution().unwrap(), Resolution::Dpi1800);
    }

    #[test]
    fn test_unrecognised_raw_value_reads_unknown() {
        let mut backend = claimed_backend(LachesisSim::new().with_raw_values(333, 2400));
        assert_eq!(backend.frequency().unwrap(), Frequency::Unknown);
        assert_eq!(backend.resolution().unwrap(), Resolution::Unknown);
    }

    #[test]
    fn test_leds() {
        let mut backend = claimed_backend(LachesisSim::new());
        let leds = backend.leds().unwrap();
        let names: Vec<_> = leds.iter().map(|l| l.name()).collect();
        assert_eq!(names, ["Glow", "Scrollwheel"]);

        backend.set_led_state(led::GLOW, LedState::Off).unwrap();
        assert_eq!(backend.leds().unwrap().get(0).unwrap().state(), LedState::Off);
        assert!(backend.set_led_state(9, LedState::On).is_err());
    }

    #[test]
    fn test_claim_locks_config() {
        let sim = LachesisSim::new();
        let lock = sim.lock_flag();
        let mut backend = claimed_backend(sim);
        assert!(lock.load(Ordering::SeqCst));
        backend.release();
        assert!(!lock.load(Ordering::SeqCst));
    }
}
