//! Commands shared by every family

use razer_transport::{HidCommand, HidResponse, ParseError};

use crate::settings::FirmwareVersion;

/// Command bytes common to all families
pub mod cmd {
    /// Enter/leave host-driven mode: data[0] = 1 (driver) / 0 (normal)
    pub const SET_DRIVER_MODE: u8 = 0x04;
    /// Firmware version: reply [major, minor]
    pub const GET_FIRMWARE: u8 = 0x81;
}

/// GET_FIRMWARE (0x81) - no data
#[derive(Debug, Clone, Copy, Default)]
pub struct GetFirmware;

impl HidCommand for GetFirmware {
    const CMD: u8 = cmd::GET_FIRMWARE;

    fn to_data(&self) -> Vec<u8> {
        Vec::new()
    }
}

/// GET_FIRMWARE reply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FirmwareReply(pub FirmwareVersion);

impl HidResponse for FirmwareReply {
    const MIN_LEN: usize = 2;

    fn from_data(data: &[u8]) -> Result<Self, ParseError> {
        Ok(Self(FirmwareVersion::from_parts(data[0], data[1])))
    }
}

/// SET_DRIVER_MODE (0x04)
///
/// While driver mode is on the mouse stops applying its stored profile and
/// takes settings from the host only.
#[derive(Debug, Clone, Copy)]
pub struct SetDriverMode {
    pub enabled: bool,
}

impl HidCommand for SetDriverMode {
    const CMD: u8 = cmd::SET_DRIVER_MODE;

    fn to_data(&self) -> Vec<u8> {
        vec![u8::from(self.enabled)]
    }
}
