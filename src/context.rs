//! HAL lifecycle
//!
//! [`RazerHal`] is the only way into the registry. It is created by
//! [`RazerHal::init`] and torn down by [`RazerHal::exit`] or by dropping it;
//! either way every claimed mouse is released first.

use razer_transport::{DeviceDiscovery, HidDiscovery};
use tracing::info;

use crate::config::HalConfig;
use crate::error::HalError;
use crate::hal::{Mouse, MouseRegistry};

/// An initialised HAL
pub struct RazerHal {
    registry: MouseRegistry,
}

impl RazerHal {
    /// Initialise with default configuration over the system HID stack
    pub fn init() -> Result<Self, HalError> {
        Self::init_with_config(HalConfig::default())
    }

    /// Initialise over the system HID stack
    pub fn init_with_config(config: HalConfig) -> Result<Self, HalError> {
        let mut discovery =
            HidDiscovery::new().map_err(|e| HalError::TransportUnavailable(e.to_string()))?;
        discovery.set_command_delay(config.command_delay_ms);
        for extra in &config.extra_devices {
            discovery.add_device(extra.vid, extra.pid);
        }
        Ok(Self::with_discovery(Box::new(discovery), config))
    }

    /// Initialise over any enumeration feed
    pub fn with_discovery(discovery: Box<dyn DeviceDiscovery>, config: HalConfig) -> Self {
        info!(
            "Razer HAL initialised ({} extra device ids)",
            config.extra_devices.len()
        );
        Self {
            registry: MouseRegistry::new(discovery, config),
        }
    }

    pub fn registry(&self) -> &MouseRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut MouseRegistry {
        &mut self.registry
    }

    /// See [`MouseRegistry::rescan`]
    pub fn rescan(&mut self) -> Result<&[Mouse], HalError> {
        self.registry.rescan()
    }

    /// See [`MouseRegistry::claim`]
    pub fn claim(&mut self, id: &str) -> Result<(), HalError> {
        self.registry.claim(id)
    }

    /// See [`MouseRegistry::release`]
    pub fn release(&mut self, id: &str) {
        self.registry.release(id)
    }

    /// See [`MouseRegistry::device`]
    pub fn device(&mut self, id: &str) -> Result<&mut Mouse, HalError> {
        self.registry.device(id)
    }

    /// Release every mouse and shut down
    pub fn exit(self) {
        drop(self);
    }
}

impl Drop for RazerHal {
    fn drop(&mut self) {
        self.registry.release_all();
        info!("Razer HAL shut down");
    }
}
