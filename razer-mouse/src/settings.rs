//! Mouse settings types
//!
//! The numeric value of every enumerant is the physical quantity it names
//! (hertz, DPI), and `Unknown` is always zero.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Scan (polling) frequency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(u32)]
pub enum Frequency {
    #[default]
    Unknown = 0,
    Hz125 = 125,
    Hz500 = 500,
    Hz1000 = 1000,
}

impl Frequency {
    /// Every settable frequency, ascending
    pub const ALL: &'static [Frequency] = &[Self::Hz125, Self::Hz500, Self::Hz1000];

    /// Rate in hertz (0 for `Unknown`)
    pub fn hz(self) -> u32 {
        self as u32
    }

    /// Get frequency from Hz value, `Unknown` if unrecognised
    pub fn from_hz(hz: u32) -> Self {
        match hz {
            125 => Self::Hz125,
            500 => Self::Hz500,
            1000 => Self::Hz1000,
            _ => Self::Unknown,
        }
    }

    /// False only for the sentinel
    pub fn is_known(self) -> bool {
        self != Self::Unknown
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown => f.write_str("unknown"),
            other => write!(f, "{} Hz", other.hz()),
        }
    }
}

/// Scan resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(u32)]
pub enum Resolution {
    #[default]
    Unknown = 0,
    Dpi400 = 400,
    Dpi450 = 450,
    Dpi900 = 900,
    Dpi1600 = 1600,
    Dpi1800 = 1800,
}

impl Resolution {
    /// Every settable resolution, ascending
    pub const ALL: &'static [Resolution] = &[
        Self::Dpi400,
        Self::Dpi450,
        Self::Dpi900,
        Self::Dpi1600,
        Self::Dpi1800,
    ];

    /// Resolution in DPI (0 for `Unknown`)
    pub fn dpi(self) -> u32 {
        self as u32
    }

    /// Get resolution from DPI value, `Unknown` if unrecognised
    pub fn from_dpi(dpi: u32) -> Self {
        match dpi {
            400 => Self::Dpi400,
            450 => Self::Dpi450,
            900 => Self::Dpi900,
            1600 => Self::Dpi1600,
            1800 => Self::Dpi1800,
            _ => Self::Unknown,
        }
    }

    /// False only for the sentinel
    pub fn is_known(self) -> bool {
        self != Self::Unknown
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown => f.write_str("unknown"),
            other => write!(f, "{} DPI", other.dpi()),
        }
    }
}

/// Firmware version information
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct FirmwareVersion {
    /// Version as raw u16, major in the high byte (e.g. 0x0119 for v1.25)
    pub raw: u16,
}

impl FirmwareVersion {
    /// Create from raw version number
    pub fn new(raw: u16) -> Self {
        Self { raw }
    }

    /// Create from the two bytes the device reports
    pub fn from_parts(major: u8, minor: u8) -> Self {
        Self {
            raw: u16::from_be_bytes([major, minor]),
        }
    }

    pub fn major(&self) -> u8 {
        (self.raw >> 8) as u8
    }

    pub fn minor(&self) -> u8 {
        (self.raw & 0xFF) as u8
    }

    /// Format as human-readable string (e.g., "v1.25" for raw=0x0119)
    pub fn format(&self) -> String {
        format!("v{}.{:02}", self.major(), self.minor())
    }
}

impl fmt::Display for FirmwareVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_values_are_domain_values() {
        assert_eq!(Frequency::Unknown as u32, 0);
        assert_eq!(Frequency::Hz125 as u32, 125);
        assert_eq!(Frequency::Hz1000.hz(), 1000);
        assert_eq!(Resolution::Unknown as u32, 0);
        assert_eq!(Resolution::Dpi450.dpi(), 450);
        assert_eq!(Resolution::Dpi1800 as u32, 1800);
    }

    #[test]
    fn test_from_value_falls_back_to_unknown() {
        assert_eq!(Frequency::from_hz(500), Frequency::Hz500);
        assert_eq!(Frequency::from_hz(250), Frequency::Unknown);
        assert_eq!(Resolution::from_dpi(1600), Resolution::Dpi1600);
        assert_eq!(Resolution::from_dpi(3500), Resolution::Unknown);
    }

    #[test]
    fn test_all_lists_exclude_unknown() {
        assert!(Frequency::ALL.iter().all(|f| f.is_known()));
        assert!(Resolution::ALL.iter().all(|r| r.is_known()));
    }

    #[test]
    fn test_display() {
        assert_eq!(Frequency::Hz500.to_string(), "500 Hz");
        assert_eq!(Resolution::Unknown.to_string(), "unknown");
    }

    #[test]
    fn test_firmware_version_format() {
        let v = FirmwareVersion::from_parts(1, 25);
        assert_eq!(v.raw, 0x0119);
        assert_eq!(v.major(), 1);
        assert_eq!(v.minor(), 25);
        assert_eq!(v.format(), "v1.25");
        assert!(FirmwareVersion::from_parts(2, 0) > v);
    }
}
