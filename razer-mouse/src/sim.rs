//! Firmware simulators for the supported families
//!
//! Each simulator implements [`MockFirmware`] and answers the same commands
//! its backend sends, so a [`MockBus`](razer_transport::mock::MockBus) can
//! stand in for a real mouse.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use razer_transport::device_registry;
use razer_transport::mock::{MockDevice, MockFirmware};
use razer_transport::protocol::status;
use zerocopy::{FromBytes, IntoBytes};

use crate::deathadder::{self, ConfigRecord};
use crate::krait;
use crate::lachesis;
use crate::wire;

fn flag(data: &[u8]) -> Result<bool, u8> {
    match data.first() {
        Some(0) => Ok(false),
        Some(1) => Ok(true),
        _ => Err(status::FAILURE),
    }
}

/// Simulated DeathAdder
pub struct DeathAdderSim {
    firmware: (u8, u8),
    truncated_firmware: bool,
    config: ConfigRecord,
    driver_mode: Arc<AtomicBool>,
}

impl DeathAdderSim {
    /// 1000 Hz, 1600 DPI, both LEDs on, firmware v1.25
    pub fn new() -> Self {
        Self {
            firmware: (1, 25),
            truncated_firmware: false,
            config: ConfigRecord::new(0x01, 0x02, 0x03),
            driver_mode: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn with_firmware(mut self, major: u8, minor: u8) -> Self {
        self.firmware = (major, minor);
        self
    }

    /// Answer GET_FIRMWARE with a single byte
    pub fn with_truncated_firmware(mut self) -> Self {
        self.truncated_firmware = true;
        self
    }

    /// Start from an arbitrary record, codes unchecked
    pub fn with_raw_config(mut self, config: ConfigRecord) -> Self {
        self.config = config;
        self
    }

    /// Shared view of the driver-mode switch
    pub fn driver_mode_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.driver_mode)
    }

    /// Plug-ready device at `path`
    pub fn device(self, path: &str) -> MockDevice {
        MockDevice::razer(device_registry::PID_DEATHADDER, path, Box::new(self))
    }
}

impl Default for DeathAdderSim {
    fn default() -> Self {
        Self::new()
    }
}

impl MockFirmware for DeathAdderSim {
    fn handle(&mut self, cmd: u8, data: &[u8]) -> Result<Vec<u8>, u8> {
        match cmd {
            wire::cmd::GET_FIRMWARE => {
                let (major, minor) = self.firmware;
                if self.truncated_firmware {
                    Ok(vec![major])
                } else {
                    Ok(vec![major, minor])
                }
            }
            wire::cmd::SET_DRIVER_MODE => {
                self.driver_mode.store(flag(data)?, Ordering::SeqCst);
                Ok(Vec::new())
            }
            deathadder::cmd::GET_CONFIG => Ok(self.config.as_bytes().to_vec()),
            deathadder::cmd::SET_CONFIG => {
                let record =
                    ConfigRecord::read_from_bytes(data).map_err(|_| status::FAILURE)?;
                if deathadder::decode_frequency(record.freq) == crate::Frequency::Unknown
                    || deathadder::decode_resolution(record.res) == crate::Resolution::Unknown
                {
                    return Err(status::FAILURE);
                }
                self.config = record;
                Ok(Vec::new())
            }
            _ => Err(status::UNSUPPORTED),
        }
    }
}

/// Simulated Krait
pub struct KraitSim {
    firmware: (u8, u8),
    freq: u8,
    res: u8,
    driver_mode: Arc<AtomicBool>,
}

impl KraitSim {
    /// 1000 Hz fixed, 1600 DPI
    pub fn new() -> Self {
        Self {
            firmware: (1, 0),
            freq: 0x01,
            res: 0x01,
            driver_mode: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn driver_mode_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.driver_mode)
    }

    pub fn device(self, path: &str) -> MockDevice {
        MockDevice::razer(device_registry::PID_KRAIT, path, Box::new(self))
    }
}

impl Default for KraitSim {
    fn default() -> Self {
        Self::new()
    }
}

impl MockFirmware for KraitSim {
    fn handle(&mut self, cmd: u8, data: &[u8]) -> Result<Vec<u8>, u8> {
        match cmd {
            wire::cmd::GET_FIRMWARE => Ok(vec![self.firmware.0, self.firmware.1]),
            wire::cmd::SET_DRIVER_MODE => {
                self.driver_mode.store(flag(data)?, Ordering::SeqCst);
                Ok(Vec::new())
            }
            krait::cmd::GET_STATUS => Ok(vec![self.freq, self.res]),
            krait::cmd::SET_RESOLUTION => {
                let code = *data.first().ok_or(status::FAILURE)?;
                if krait::decode_resolution(code) == crate::Resolution::Unknown {
                    return Err(status::FAILURE);
                }
                self.res = code;
                Ok(Vec::new())
            }
            _ => Err(status::UNSUPPORTED),
        }
    }
}

/// Simulated Lachesis
pub struct LachesisSim {
    firmware: (u8, u8),
    freq_hz: u16,
    dpi: u16,
    leds: [u8; 2],
    locked: Arc<AtomicBool>,
}

impl LachesisSim {
    /// 1000 Hz, 1600 DPI, both LEDs on
    pub fn new() -> Self {
        Self {
            firmware: (2, 3),
            freq_hz: 1000,
            dpi: 1600,
            leds: [1, 1],
            locked: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Report raw values the host does not know
    pub fn with_raw_values(mut self, freq_hz: u16, dpi: u16) -> Self {
        self.freq_hz = freq_hz;
        self.dpi = dpi;
        self
    }

    pub fn lock_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.locked)
    }

    pub fn device(self, path: &str) -> MockDevice {
        MockDevice::razer(device_registry::PID_LACHESIS, path, Box::new(self))
    }
}

impl Default for LachesisSim {
    fn default() -> Self {
        Self::new()
    }
}

fn read_u16(data: &[u8]) -> Result<u16, u8> {
    match data {
        [lo, hi, ..] => Ok(u16::from_le_bytes([*lo, *hi])),
        _ => Err(status::FAILURE),
    }
}

impl MockFirmware for LachesisSim {
    fn handle(&mut self, cmd: u8, data: &[u8]) -> Result<Vec<u8>, u8> {
        use lachesis::cmd;

        match cmd {
            wire::cmd::GET_FIRMWARE => Ok(vec![self.firmware.0, self.firmware.1]),
            cmd::SET_CONFIG_LOCK => {
                self.locked.store(read_u16(data)? != 0, Ordering::SeqCst);
                Ok(Vec::new())
            }
            cmd::GET_FREQUENCY => Ok(self.freq_hz.to_le_bytes().to_vec()),
            cmd::SET_FREQUENCY => {
                let hz = read_u16(data)?;
                if !matches!(hz, 125 | 500 | 1000) {
                    return Err(status::FAILURE);
                }
                self.freq_hz = hz;
                Ok(Vec::new())
            }
            cmd::GET_RESOLUTION => Ok(self.dpi.to_le_bytes().to_vec()),
            cmd::SET_RESOLUTION => {
                let dpi = read_u16(data)?;
                if !matches!(dpi, 400 | 450 | 900 | 1600 | 1800) {
                    return Err(status::FAILURE);
                }
                self.dpi = dpi;
                Ok(Vec::new())
            }
            cmd::GET_LED => {
                let id = *data.first().ok_or(status::FAILURE)?;
                let state = *self.leds.get(usize::from(id)).ok_or(status::FAILURE)?;
                Ok(vec![id, state])
            }
            cmd::SET_LED => match data {
                [id, state @ (0 | 1), ..] => {
                    let slot = self
                        .leds
                        .get_mut(usize::from(*id))
                        .ok_or(status::FAILURE)?;
                    *slot = *state;
                    Ok(Vec::new())
                }
                _ => Err(status::FAILURE),
            },
            _ => Err(status::UNSUPPORTED),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_command_is_unsupported() {
        assert_eq!(DeathAdderSim::new().handle(0x7E, &[]), Err(status::UNSUPPORTED));
        assert_eq!(KraitSim::new().handle(0x7E, &[]), Err(status::UNSUPPORTED));
        assert_eq!(LachesisSim::new().handle(0x7E, &[]), Err(status::UNSUPPORTED));
    }

    #[test]
    fn test_deathadder_rejects_bad_record() {
        let mut sim = DeathAdderSim::new();
        assert_eq!(
            sim.handle(deathadder::cmd::SET_CONFIG, &[0x09, 0x01, 0x00, 0x00]),
            Err(status::FAILURE)
        );
        assert_eq!(
            sim.handle(deathadder::cmd::SET_CONFIG, &[0x01]),
            Err(status::FAILURE)
        );
    }

    #[test]
    fn test_lachesis_led_bounds() {
        let mut sim = LachesisSim::new();
        assert_eq!(sim.handle(lachesis::cmd::GET_LED, &[5]), Err(status::FAILURE));
        assert_eq!(sim.handle(lachesis::cmd::SET_LED, &[0, 2]), Err(status::FAILURE));
        assert_eq!(sim.handle(lachesis::cmd::SET_LED, &[1, 0]), Ok(Vec::new()));
        assert_eq!(sim.handle(lachesis::cmd::GET_LED, &[1]), Ok(vec![1, 0]));
    }
}
