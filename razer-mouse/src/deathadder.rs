//! DeathAdder backend
//!
//! The DeathAdder keeps its whole configuration in one 4-byte record. Every
//! change is a read-modify-write of that record, so a failed write leaves
//! the device exactly as it was.

use razer_transport::{BoxedTransport, HidCommand, HidResponse, ParseError, TransportExt};
use tracing::{debug, warn};
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use crate::backend::{claimed, MouseBackend, MouseType};
use crate::capability::{FrequencyList, ResolutionList};
use crate::error::MouseError;
use crate::led::{Led, LedList, LedState};
use crate::settings::{FirmwareVersion, Frequency, Resolution};
use crate::wire::{FirmwareReply, GetFirmware, SetDriverMode};

/// DeathAdder command bytes
pub mod cmd {
    /// Write the config record
    pub const SET_CONFIG: u8 = 0x02;
    /// Read the config record
    pub const GET_CONFIG: u8 = 0x82;
}

/// LED identity cookies and their bit in `ConfigRecord::leds`
pub mod led {
    pub const SCROLLWHEEL: u32 = 0;
    pub const LOGO: u32 = 1;

    pub const SCROLLWHEEL_BIT: u8 = 0x01;
    pub const LOGO_BIT: u8 = 0x02;
}

const FREQUENCIES: &[Frequency] = &[Frequency::Hz125, Frequency::Hz500, Frequency::Hz1000];

const RESOLUTIONS: &[Resolution] = &[
    Resolution::Dpi400,
    Resolution::Dpi450,
    Resolution::Dpi900,
    Resolution::Dpi1600,
    Resolution::Dpi1800,
];

/// Frequency wire code
pub fn encode_frequency(freq: Frequency) -> Option<u8> {
    match freq {
        Frequency::Hz1000 => Some(0x01),
        Frequency::Hz500 => Some(0x02),
        Frequency::Hz125 => Some(0x03),
        Frequency::Unknown => None,
    }
}

pub fn decode_frequency(code: u8) -> Frequency {
    match code {
        0x01 => Frequency::Hz1000,
        0x02 => Frequency::Hz500,
        0x03 => Frequency::Hz125,
        _ => Frequency::Unknown,
    }
}

/// Resolution wire code
pub fn encode_resolution(res: Resolution) -> Option<u8> {
    match res {
        Resolution::Dpi1800 => Some(0x01),
        Resolution::Dpi1600 => Some(0x02),
        Resolution::Dpi900 => Some(0x03),
        Resolution::Dpi450 => Some(0x04),
        Resolution::Dpi400 => Some(0x05),
        Resolution::Unknown => None,
    }
}

pub fn decode_resolution(code: u8) -> Resolution {
    match code {
        0x01 => Resolution::Dpi1800,
        0x02 => Resolution::Dpi1600,
        0x03 => Resolution::Dpi900,
        0x04 => Resolution::Dpi450,
        0x05 => Resolution::Dpi400,
        _ => Resolution::Unknown,
    }
}

/// On-wire config record (payload of SET_CONFIG / GET_CONFIG)
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoBytes, FromBytes, KnownLayout, Immutable)]
#[repr(C)]
pub struct ConfigRecord {
    pub freq: u8,
    pub res: u8,
    pub leds: u8,
    _reserved: u8,
}

impl ConfigRecord {
    pub const SIZE: usize = 4;

    pub fn new(freq: u8, res: u8, leds: u8) -> Self {
        Self {
            freq,
            res,
            leds,
            _reserved: 0,
        }
    }

    fn led_bit(led_id: u32) -> Option<u8> {
        match led_id {
            led::SCROLLWHEEL => Some(led::SCROLLWHEEL_BIT),
            led::LOGO => Some(led::LOGO_BIT),
            _ => None,
        }
    }
}

impl HidResponse for ConfigRecord {
    const MIN_LEN: usize = Self::SIZE;

    fn from_data(data: &[u8]) -> Result<Self, ParseError> {
        ConfigRecord::read_from_bytes(&data[..Self::SIZE]).map_err(|_| ParseError::TooShort {
            expected: Self::SIZE,
            got: data.len(),
        })
    }
}

/// GET_CONFIG (0x82) - no data
#[derive(Debug, Clone, Copy, Default)]
pub struct GetConfig;

impl HidCommand for GetConfig {
    const CMD: u8 = cmd::GET_CONFIG;

    fn to_data(&self) -> Vec<u8> {
        Vec::new()
    }
}

/// SET_CONFIG (0x02) - full record
#[derive(Debug, Clone, Copy)]
pub struct SetConfig(pub ConfigRecord);

impl HidCommand for SetConfig {
    const CMD: u8 = cmd::SET_CONFIG;

    fn to_data(&self) -> Vec<u8> {
        self.0.as_bytes().to_vec()
    }
}

/// Razer DeathAdder
#[derive(Default)]
pub struct DeathAdder {
    transport: Option<BoxedTransport>,
}

impl DeathAdder {
    pub fn new() -> Self {
        Self::default()
    }

    fn read_config(&self) -> Result<ConfigRecord, MouseError> {
        let transport = claimed(&self.transport)?;
        Ok(transport.query::<_, ConfigRecord>(&GetConfig)?)
    }

    fn update_config(&self, f: impl FnOnce(&mut ConfigRecord)) -> Result<(), MouseError> {
        let mut config = self.read_config()?;
        f(&mut config);
        let transport = claimed(&self.transport)?;
        transport.send(&SetConfig(config))?;
        debug!("DeathAdder config written: {:?}", config);
        Ok(())
    }
}

impl MouseBackend for DeathAdder {
    fn mouse_type(&self) -> MouseType {
        MouseType::DeathAdder
    }

    fn claim(&mut self, transport: BoxedTransport) -> Result<(), MouseError> {
        transport.send(&SetDriverMode { enabled: true })?;
        self.transport = Some(transport);
        Ok(())
    }

    fn release(&mut self) {
        if let Some(transport) = self.transport.take() {
            if let Err(e) = transport.send(&SetDriverMode { enabled: false }) {
                warn!("DeathAdder: failed to leave driver mode: {}", e);
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
        Ok(FrequencyList::new(FREQUENCIES.to_vec()))
    }

    fn frequency(&mut self) -> Result<Frequency, MouseError> {
        Ok(decode_frequency(self.read_config()?.freq))
    }

    fn set_frequency(&mut self, freq: Frequency) -> Result<(), MouseError> {
        let code = encode_frequency(freq)
            .ok_or_else(|| MouseError::InvalidParameter(format!("frequency {}", freq)))?;
        self.update_config(|c| c.freq = code)
    }

    fn supported_resolutions(&mut self) -> Result<ResolutionList, MouseError> {
        Ok(ResolutionList::new(RESOLUTIONS.to_vec()))
    }

    fn resolution(&mut self) -> Result<Resolution, MouseError> {
        Ok(decode_resolution(self.read_config()?.res))
    }

    fn set_resolution(&mut self, res: Resolution) -> Result<(), MouseError> {
        let code = encode_resolution(res)
            .ok_or_else(|| MouseError::InvalidParameter(format!("resolution {}", res)))?;
        self.update_config(|c| c.res = code)
    }

    fn leds(&mut self) -> Result<LedList, MouseError> {
        let config = self.read_config()?;
        Ok(LedList::new(vec![
            Led::new(
                "Scrollwheel",
                led::SCROLLWHEEL,
                LedState::from(config.leds & led::SCROLLWHEEL_BIT != 0),
            ),
            Led::new(
                "GlowingLogo",
                led::LOGO,
                LedState::from(config.leds & led::LOGO_BIT != 0),
            ),
        ]))
    }

    fn set_led_state(&mut self, led_id: u32, state: LedState) -> Result<(), MouseError> {
        let bit = ConfigRecord::led_bit(led_id)
            .ok_or_else(|| MouseError::InvalidParameter(format!("no LED with id {}", led_id)))?;
        let on = match state {
            LedState::On => true,
            LedState::Off => false,
            LedState::Unknown => {
                return Err(MouseError::InvalidParameter("LED state unknown".into()))
            }
        };
        self.update_config(|c| {
            if on {
                c.leds |= bit;
            } else {
                c.leds &= !bit;
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use razer_transport::mock::{MockBus, MockDevice};
    use razer_transport::{device_registry, DeviceDiscovery, ErrorKind};

    use super::*;
    use crate::sim::DeathAdderSim;

    fn claimed_backend(sim: DeathAdderSim) -> (MockBus, DeathAdder) {
        let bus = MockBus::new();
        bus.plug(MockDevice::razer(
            device_registry::PID_DEATHADDER,
            "usb-1",
            Box::new(sim),
        ));
        let dev = bus.list_devices().unwrap().remove(0);
        let transport = bus.open_device(&dev).unwrap();
        let mut backend = DeathAdder::new();
        backend.claim(Arc::clone(&transport)).unwrap();
        (bus, backend)
    }

    #[test]
    fn test_codes_round_trip() {
        for &f in FREQUENCIES {
            assert_eq!(decode_frequency(encode_frequency(f).unwrap()), f);
        }
        for &r in RESOLUTIONS {
            assert_eq!(decode_resolution(encode_resolution(r).unwrap()), r);
        }
        assert_eq!(encode_frequency(Frequency::Unknown), None);
    }

    #[test]
    fn test_config_record_layout() {
        let rec = ConfigRecord::new(0x01, 0x02, 0x03);
        assert_eq!(rec.as_bytes(), &[0x01, 0x02, 0x03, 0x00]);
        assert_eq!(ConfigRecord::parse(&[0x03, 0x05, 0x00, 0x00]).unwrap().res, 0x05);
    }

    #[test]
    fn test_set_then_get() {
        let (_bus, mut backend) = claimed_backend(DeathAdderSim::new());
        backend.set_frequency(Frequency::Hz500).unwrap();
        backend.set_resolution(Resolution::Dpi900).unwrap();
        assert_eq!(backend.frequency().unwrap(), Frequency::Hz500);
        assert_eq!(backend.resolution().unwrap(), Resolution::Dpi900);
    }

    #[test]
    fn test_unrecognised_code_reads_unknown() {
        let sim = DeathAdderSim::new().with_raw_config(ConfigRecord::new(0x7F, 0x7F, 0));
        let (_bus, mut backend) = claimed_backend(sim);
        assert_eq!(backend.frequency().unwrap(), Frequency::Unknown);
        assert_eq!(backend.resolution().unwrap(), Resolution::Unknown);
    }

    #[test]
    fn test_firmware_version() {
        let (_bus, mut backend) = claimed_backend(DeathAdderSim::new().with_firmware(1, 25));
        assert_eq!(backend.firmware_version().unwrap().format(), "v1.25");
    }

    #[test]
    fn test_short_firmware_reply_is_protocol_error() {
        let (_bus, mut backend) = claimed_backend(DeathAdderSim::new().with_truncated_firmware());
        let err = backend.firmware_version().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Protocol);
    }

    #[test]
    fn test_led_bits() {
        let (_bus, mut backend) = claimed_backend(DeathAdderSim::new());
        backend.set_led_state(led::LOGO, LedState::Off).unwrap();
        let leds = backend.leds().unwrap();
        assert_eq!(leds.len(), 2);
        assert_eq!(leds.get(0).unwrap().state(), LedState::On);
        assert_eq!(leds.get(1).unwrap().state(), LedState::Off);
        assert!(matches!(
            backend.set_led_state(7, LedState::On),
            Err(MouseError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_release_leaves_driver_mode() {
        let sim = DeathAdderSim::new();
        let driver_mode = sim.driver_mode_flag();
        let (_bus, mut backend) = claimed_backend(sim);
        assert!(driver_mode.load(std::sync::atomic::Ordering::SeqCst));
        backend.release();
        assert!(!backend.is_claimed());
        assert!(!driver_mode.load(std::sync::atomic::Ordering::SeqCst));
    }

    #[test]
    fn test_failed_write_keeps_value() {
        let (bus, mut backend) = claimed_backend(DeathAdderSim::new());
        let before = backend.resolution().unwrap();
        bus.set_corrupt("usb-1", true);
        assert!(backend.set_resolution(Resolution::Dpi400).is_err());
        bus.set_corrupt("usb-1", false);
        assert_eq!(backend.resolution().unwrap(), before);
    }
}
