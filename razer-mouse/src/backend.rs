//! Backend contract every mouse family implements

use std::fmt;

use razer_transport::{device_registry, BoxedTransport};
use serde::{Deserialize, Serialize};

use crate::capability::{FrequencyList, ResolutionList};
use crate::deathadder::DeathAdder;
use crate::error::MouseError;
use crate::krait::Krait;
use crate::lachesis::Lachesis;
use crate::led::{LedList, LedState};
use crate::settings::{FirmwareVersion, Frequency, Resolution};

/// Mouse family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MouseType {
    DeathAdder,
    Krait,
    Lachesis,
}

impl MouseType {
    /// Every supported family
    pub const ALL: &'static [MouseType] = &[Self::DeathAdder, Self::Krait, Self::Lachesis];

    /// Family of a built-in Razer product
    pub fn from_ids(vid: u16, pid: u16) -> Option<Self> {
        if vid != device_registry::VENDOR_ID {
            return None;
        }
        match pid {
            device_registry::PID_DEATHADDER => Some(Self::DeathAdder),
            device_registry::PID_KRAIT => Some(Self::Krait),
            device_registry::PID_LACHESIS => Some(Self::Lachesis),
            _ => None,
        }
    }

    /// Display name
    pub fn name(&self) -> &'static str {
        match self {
            Self::DeathAdder => "DeathAdder",
            Self::Krait => "Krait",
            Self::Lachesis => "Lachesis",
        }
    }

    /// Fresh, unclaimed backend for this family
    pub fn create_backend(self) -> Box<dyn MouseBackend> {
        match self {
            Self::DeathAdder => Box::new(DeathAdder::new()),
            Self::Krait => Box::new(Krait::new()),
            Self::Lachesis => Box::new(Lachesis::new()),
        }
    }
}

impl fmt::Display for MouseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Family-specific driver for one physical mouse
///
/// One instance is bound to each discovered device. The registry owns the
/// claim bookkeeping: it only calls the live-state operations between a
/// successful [`claim`](MouseBackend::claim) and the matching
/// [`release`](MouseBackend::release), and it checks `set_*` arguments
/// against the `supported_*` lists first. Backends still refuse values they
/// cannot encode.
pub trait MouseBackend: Send {
    /// Family tag
    fn mouse_type(&self) -> MouseType;

    /// Take control over `transport` and suspend the device's normal mode
    ///
    /// On error the backend must stay unclaimed.
    fn claim(&mut self, transport: BoxedTransport) -> Result<(), MouseError>;

    /// Restore normal mode and drop the transport; no-op when unclaimed
    fn release(&mut self);

    /// True between a successful claim and release
    fn is_claimed(&self) -> bool;

    /// Read the firmware version
    fn firmware_version(&mut self) -> Result<FirmwareVersion, MouseError>;

    /// Frequencies this model accepts (may be empty)
    fn supported_frequencies(&mut self) -> Result<FrequencyList, MouseError>;

    /// Current frequency, `Unknown` if the device reports something unrecognised
    fn frequency(&mut self) -> Result<Frequency, MouseError>;

    fn set_frequency(&mut self, freq: Frequency) -> Result<(), MouseError>;

    /// Resolutions this model accepts (may be empty)
    fn supported_resolutions(&mut self) -> Result<ResolutionList, MouseError>;

    /// Current resolution, `Unknown` if the device reports something unrecognised
    fn resolution(&mut self) -> Result<Resolution, MouseError>;

    fn set_resolution(&mut self, res: Resolution) -> Result<(), MouseError>;

    /// Enumerate LEDs with their current state
    fn leds(&mut self) -> Result<LedList, MouseError>;

    /// Switch one LED; `state` is never `Unknown` here
    fn set_led_state(&mut self, led_id: u32, state: LedState) -> Result<(), MouseError>;
}

/// Borrow the transport of a claimed backend
pub(crate) fn claimed(transport: &Option<BoxedTransport>) -> Result<&BoxedTransport, MouseError> {
    transport.as_ref().ok_or(MouseError::NotClaimed)
}
