//! HAL configuration

use razer_mouse::MouseType;
use razer_transport::protocol::timing;
use serde::{Deserialize, Serialize};

use crate::error::HalError;

/// Product id to treat as a member of a known family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtraDevice {
    pub vid: u16,
    pub pid: u16,
    pub family: MouseType,
}

/// Runtime configuration
///
/// ```toml
/// command_delay_ms = 20
///
/// [[extra_devices]]
/// vid = 0x1532
/// pid = 0x0016
/// family = "deathadder"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HalConfig {
    /// Pause between writing a request and reading its reply
    pub command_delay_ms: u64,
    /// Additional products recognised during rescans
    pub extra_devices: Vec<ExtraDevice>,
}

impl Default for HalConfig {
    fn default() -> Self {
        Self {
            command_delay_ms: timing::DEFAULT_COMMAND_DELAY_MS,
            extra_devices: Vec::new(),
        }
    }
}

impl HalConfig {
    /// Parse from a TOML document
    pub fn from_toml_str(s: &str) -> Result<Self, HalError> {
        Ok(toml::from_str(s)?)
    }

    /// Family for a vid/pid pair, built-in products first
    pub fn family_of(&self, vid: u16, pid: u16) -> Option<MouseType> {
        MouseType::from_ids(vid, pid).or_else(|| {
            self.extra_devices
                .iter()
                .find(|d| d.vid == vid && d.pid == pid)
                .map(|d| d.family)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = HalConfig::from_toml_str("").unwrap();
        assert_eq!(cfg, HalConfig::default());
        assert_eq!(cfg.command_delay_ms, 15);
    }

    #[test]
    fn test_extra_devices() {
        let cfg = HalConfig::from_toml_str(
            r#"
            command_delay_ms = 5

            [[extra_devices]]
            vid = 0x1532
            pid = 0x0016
            family = "deathadder"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.command_delay_ms, 5);
        assert_eq!(cfg.family_of(0x1532, 0x0016), Some(MouseType::DeathAdder));
        assert_eq!(cfg.family_of(0x1532, 0x000C), Some(MouseType::Lachesis));
        assert_eq!(cfg.family_of(0x1532, 0x0099), None);
    }

    #[test]
    fn test_bad_family_is_config_error() {
        let err = HalConfig::from_toml_str(
            "[[extra_devices]]\nvid = 1\npid = 2\nfamily = \"orochi\"\n",
        )
        .unwrap_err();
        assert!(matches!(err, HalError::Config(_)));
    }
}
