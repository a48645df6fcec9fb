//! Mouse registry - discovered devices and their claims
//!
//! The registry is rebuilt on every [`rescan`](MouseRegistry::rescan) from
//! the enumeration feed. Devices that are still attached keep their identity
//! and claim. A device that disappears while released is dropped; one that
//! disappears while claimed stays listed with a broken claim until the
//! caller releases it.

use razer_mouse::{Led, LedState, MouseType};
use razer_transport::{DeviceDiscovery, DiscoveredDevice};
use tracing::{debug, info, warn};

use super::identity;
use super::mouse::{ClaimState, Mouse};
use crate::config::HalConfig;
use crate::error::HalError;

/// Registry of discovered mice
pub struct MouseRegistry {
    discovery: Box<dyn DeviceDiscovery>,
    config: HalConfig,
    mice: Vec<Mouse>,
}

impl MouseRegistry {
    /// Create an empty registry over an enumeration feed
    pub fn new(discovery: Box<dyn DeviceDiscovery>, config: HalConfig) -> Self {
        Self {
            discovery,
            config,
            mice: Vec::new(),
        }
    }

    /// Mice found by the last rescan, plus broken claims
    pub fn mice(&self) -> &[Mouse] {
        &self.mice
    }

    pub fn len(&self) -> usize {
        self.mice.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mice.is_empty()
    }

    pub fn mouse(&self, id: &str) -> Option<&Mouse> {
        self.mice.iter().find(|m| *m.id() == id)
    }

    pub fn mouse_mut(&mut self, id: &str) -> Option<&mut Mouse> {
        self.mice.iter_mut().find(|m| *m.id() == id)
    }

    /// Look up a mouse, failing with [`HalError::StaleDevice`] if unknown
    pub fn device(&mut self, id: &str) -> Result<&mut Mouse, HalError> {
        self.mouse_mut(id)
            .ok_or_else(|| HalError::StaleDevice(id.to_string()))
    }

    /// Re-enumerate attached mice
    pub fn rescan(&mut self) -> Result<&[Mouse], HalError> {
        let found = self
            .discovery
            .list_devices()
            .map_err(|e| HalError::TransportUnavailable(e.to_string()))?;

        let mut previous = std::mem::take(&mut self.mice);
        let mut next: Vec<Mouse> = Vec::with_capacity(found.len());
        let mut fresh: Vec<(MouseType, DiscoveredDevice)> = Vec::new();

        for device in found {
            let Some(family) = self.config.family_of(device.info.vid, device.info.pid) else {
                debug!(
                    "Skipping unsupported device {:04x}:{:04x} at {}",
                    device.info.vid,
                    device.info.pid,
                    device.path()
                );
                continue;
            };
            match previous.iter().position(|m| m.matches(&device)) {
                Some(pos) => {
                    let mut mouse = previous.remove(pos);
                    mouse.set_present(true);
                    next.push(mouse);
                }
                None => fresh.push((family, device)),
            }
        }

        let mut removed = 0usize;
        for mut mouse in previous {
            match mouse.claim_state() {
                ClaimState::Released => {
                    debug!("{} removed", mouse.id());
                    removed += 1;
                }
                ClaimState::Claimed | ClaimState::Broken => {
                    mouse.set_present(false);
                    mouse.mark_broken();
                    next.push(mouse);
                }
            }
        }

        let added = fresh.len();
        for (family, device) in fresh {
            let id = identity::assign(family, &device.info, |id| {
                next.iter().any(|m| m.id() == id)
            });
            debug!("{} added", id);
            next.push(Mouse::new(id, device, family.create_backend()));
        }

        info!(
            "Rescan: {} mice ({} added, {} removed)",
            next.len(),
            added,
            removed
        );
        self.mice = next;
        Ok(&self.mice)
    }

    /// Take exclusive control of a mouse
    pub fn claim(&mut self, id: &str) -> Result<(), HalError> {
        let mouse = self
            .mice
            .iter_mut()
            .find(|m| *m.id() == id)
            .ok_or_else(|| HalError::StaleDevice(id.to_string()))?;
        match mouse.claim_state() {
            ClaimState::Claimed => return Err(HalError::AlreadyClaimed(id.to_string())),
            ClaimState::Broken => return Err(HalError::ClaimBroken(id.to_string())),
            ClaimState::Released => {}
        }
        let transport = self.discovery.open_device(mouse.device())?;
        mouse.claim(transport)
    }

    /// Give a mouse back to its normal mode
    ///
    /// Unknown ids and released mice are ignored. Releasing a broken claim
    /// removes the mouse if the last rescan did not see it; a broken mouse
    /// that was plugged back in is kept and can be claimed again.
    pub fn release(&mut self, id: &str) {
        let Some(pos) = self.mice.iter().position(|m| *m.id() == id) else {
            return;
        };
        let gone = is_gone(&self.mice[pos]);
        self.mice[pos].release();
        if gone {
            let mouse = self.mice.remove(pos);
            debug!("{} dropped after release", mouse.id());
        }
    }

    /// Release every claim
    pub fn release_all(&mut self) {
        let mut dropped = 0usize;
        self.mice.retain_mut(|mouse| {
            let gone = is_gone(mouse);
            mouse.release();
            if gone {
                dropped += 1;
            }
            !gone
        });
        if dropped > 0 {
            warn!("Dropped {} mice that vanished while claimed", dropped);
        }
    }

    /// Switch an LED on the mouse that owns it
    pub fn toggle_led(&mut self, led: &mut Led, state: LedState) -> Result<(), HalError> {
        let owner = led
            .owner()
            .ok_or_else(|| HalError::StaleDevice(led.name().to_string()))?
            .to_string();
        self.device(&owner)?.toggle_led(led, state)
    }
}

fn is_gone(mouse: &Mouse) -> bool {
    mouse.claim_state() == ClaimState::Broken && !mouse.is_present()
}

#[cfg(test)]
mod tests {
    use razer_mouse::sim::{DeathAdderSim, KraitSim};
    use razer_transport::mock::MockBus;
    use razer_transport::{ErrorKind, TransportError};

    use super::*;

    fn registry(bus: &MockBus) -> MouseRegistry {
        MouseRegistry::new(Box::new(bus.clone()), HalConfig::default())
    }

    #[test]
    fn test_rescan_keeps_identity_and_claim() {
        let bus = MockBus::new();
        bus.plug(DeathAdderSim::new().device("usb-1"));
        let mut reg = registry(&bus);
        reg.rescan().unwrap();
        let id = reg.mice()[0].id().to_string();
        reg.claim(&id).unwrap();

        bus.plug(KraitSim::new().device("usb-2"));
        let mice = reg.rescan().unwrap();
        assert_eq!(mice.len(), 2);
        assert_eq!(*mice[0].id(), id.as_str());
        assert!(mice[0].is_claimed());
        assert_eq!(mice[1].mouse_type(), MouseType::Krait);
    }

    #[test]
    fn test_unsupported_devices_are_skipped() {
        let bus = MockBus::new();
        bus.plug(razer_transport::mock::MockDevice::razer(
            0x0099,
            "usb-9",
            Box::new(DeathAdderSim::new()),
        ));
        let mut reg = registry(&bus);
        assert!(reg.rescan().unwrap().is_empty());

        let config = HalConfig::from_toml_str(
            "[[extra_devices]]\nvid = 0x1532\npid = 0x0099\nfamily = \"deathadder\"\n",
        )
        .unwrap();
        let mut reg = MouseRegistry::new(Box::new(bus.clone()), config);
        let mice = reg.rescan().unwrap();
        assert_eq!(mice.len(), 1);
        assert_eq!(mice[0].mouse_type(), MouseType::DeathAdder);
    }

    #[test]
    fn test_enumeration_failure_is_reported() {
        let bus = MockBus::new();
        bus.plug(DeathAdderSim::new().device("usb-1"));
        let mut reg = registry(&bus);
        reg.rescan().unwrap();
        bus.set_available(false);
        let err = reg.rescan().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TransportUnavailable);
    }

    #[test]
    fn test_claim_errors() {
        let bus = MockBus::new();
        bus.plug(DeathAdderSim::new().device("usb-1"));
        let mut reg = registry(&bus);
        reg.rescan().unwrap();
        let id = reg.mice()[0].id().to_string();

        assert!(matches!(reg.claim("nope"), Err(HalError::StaleDevice(_))));

        bus.set_busy("usb-1", true);
        let err = reg.claim(&id).unwrap_err();
        assert!(matches!(err, HalError::Transport(_)));
        assert_eq!(err.kind(), ErrorKind::Unreachable);
        assert_eq!(reg.mouse(&id).unwrap().claim_state(), ClaimState::Released);

        bus.set_busy("usb-1", false);
        bus.unplug("usb-1");
        let err = reg.claim(&id).unwrap_err();
        assert!(matches!(
            err,
            HalError::Transport(TransportError::DeviceNotFound(_))
        ));
        assert_eq!(err.kind(), ErrorKind::Unreachable);
        assert_eq!(reg.mouse(&id).unwrap().claim_state(), ClaimState::Released);

        bus.plug(DeathAdderSim::new().device("usb-1"));
        reg.claim(&id).unwrap();
        assert!(matches!(reg.claim(&id), Err(HalError::AlreadyClaimed(_))));
        assert_eq!(bus.open_count(), 1);
    }

    #[test]
    fn test_release_is_idempotent() {
        let bus = MockBus::new();
        bus.plug(DeathAdderSim::new().device("usb-1"));
        let mut reg = registry(&bus);
        reg.rescan().unwrap();
        let id = reg.mice()[0].id().to_string();

        reg.release(&id);
        reg.release("unknown");
        reg.claim(&id).unwrap();
        reg.release(&id);
        reg.release(&id);
        assert_eq!(reg.mouse(&id).unwrap().claim_state(), ClaimState::Released);
        reg.claim(&id).unwrap();
    }

    #[test]
    fn test_release_keeps_broken_mouse_that_came_back() {
        let bus = MockBus::new();
        bus.plug(DeathAdderSim::new().device("usb-1"));
        let mut reg = registry(&bus);
        reg.rescan().unwrap();
        let id = reg.mice()[0].id().to_string();
        reg.claim(&id).unwrap();

        bus.unplug("usb-1");
        reg.rescan().unwrap();
        bus.plug(DeathAdderSim::new().device("usb-1"));
        reg.rescan().unwrap();
        assert_eq!(reg.mouse(&id).unwrap().claim_state(), ClaimState::Broken);

        reg.release(&id);
        assert_eq!(reg.len(), 1);
        assert_eq!(reg.mouse(&id).unwrap().claim_state(), ClaimState::Released);
        reg.claim(&id).unwrap();
    }

    #[test]
    fn test_release_all_drops_broken() {
        let bus = MockBus::new();
        bus.plug(DeathAdderSim::new().device("usb-1"));
        bus.plug(KraitSim::new().device("usb-2"));
        let mut reg = registry(&bus);
        reg.rescan().unwrap();
        let ids: Vec<String> = reg.mice().iter().map(|m| m.id().to_string()).collect();
        for id in &ids {
            reg.claim(id).unwrap();
        }

        bus.unplug("usb-2");
        reg.rescan().unwrap();
        assert_eq!(reg.mouse(&ids[1]).unwrap().claim_state(), ClaimState::Broken);

        reg.release_all();
        assert_eq!(reg.len(), 1);
        assert_eq!(reg.mice()[0].claim_state(), ClaimState::Released);
    }
}
