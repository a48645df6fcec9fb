//! Indicator LEDs

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::backend::MouseBackend;
use crate::error::MouseError;
use crate::id::MouseId;

/// LED state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum LedState {
    Off = 0,
    On = 1,
    /// Device did not say; never a valid target state
    #[default]
    Unknown = 2,
}

impl LedState {
    /// Decode a wire byte; anything but 0/1 is `Unknown`
    pub fn from_u8(value: u8) -> Self {
        match value {
            0 => Self::Off,
            1 => Self::On,
            _ => Self::Unknown,
        }
    }
}

impl From<bool> for LedState {
    fn from(on: bool) -> Self {
        if on {
            Self::On
        } else {
            Self::Off
        }
    }
}

impl fmt::Display for LedState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Off => "off",
            Self::On => "on",
            Self::Unknown => "unknown",
        })
    }
}

/// One controllable LED, snapshotted at enumeration time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Led {
    name: String,
    id: u32,
    state: LedState,
    /// Lookup key of the owning mouse, set by the registry
    owner: Option<MouseId>,
}

impl Led {
    pub fn new(name: impl Into<String>, id: u32, state: LedState) -> Self {
        Self {
            name: name.into(),
            id,
            state,
            owner: None,
        }
    }

    /// Human-readable name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Backend-specific identity cookie
    pub fn id(&self) -> u32 {
        self.id
    }

    /// State as of enumeration or the last successful toggle
    pub fn state(&self) -> LedState {
        self.state
    }

    /// Mouse this LED belongs to
    pub fn owner(&self) -> Option<&MouseId> {
        self.owner.as_ref()
    }

    pub fn set_owner(&mut self, owner: MouseId) {
        self.owner = Some(owner);
    }

    /// Switch the LED on or off through `backend`
    ///
    /// `Unknown` is rejected. `state` changes only if the device accepted it.
    pub fn toggle_state(
        &mut self,
        backend: &mut dyn MouseBackend,
        new_state: LedState,
    ) -> Result<(), MouseError> {
        if new_state == LedState::Unknown {
            return Err(MouseError::InvalidParameter(format!(
                "LED {} cannot be set to unknown",
                self.name
            )));
        }
        backend.set_led_state(self.id, new_state)?;
        debug!("LED {} ({}) -> {}", self.name, self.id, new_state);
        self.state = new_state;
        Ok(())
    }
}

/// Owned list of LEDs returned by one enumeration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LedList {
    leds: Vec<Led>,
}

impl LedList {
    pub fn new(leds: Vec<Led>) -> Self {
        Self { leds }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.leds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.leds.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Led> {
        self.leds.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Led> {
        self.leds.iter_mut()
    }

    pub fn get(&self, index: usize) -> Option<&Led> {
        self.leds.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Led> {
        self.leds.get_mut(index)
    }

    /// Stamp every LED with its owning mouse
    pub fn assign_owner(&mut self, owner: &MouseId) {
        for led in &mut self.leds {
            led.set_owner(owner.clone());
        }
    }

    /// Split off the head node, leaving the rest of the list intact
    pub fn detach_first(&mut self) -> Option<Led> {
        if self.leds.is_empty() {
            None
        } else {
            Some(self.leds.remove(0))
        }
    }

    pub fn into_vec(self) -> Vec<Led> {
        self.leds
    }
}

impl IntoIterator for LedList {
    type Item = Led;
    type IntoIter = std::vec::IntoIter<Led>;

    fn into_iter(self) -> Self::IntoIter {
        self.leds.into_iter()
    }
}

impl<'a> IntoIterator for &'a LedList {
    type Item = &'a Led;
    type IntoIter = std::slice::Iter<'a, Led>;

    fn into_iter(self) -> Self::IntoIter {
        self.leds.iter()
    }
}

/// Release a whole LED list returned by a query
pub fn free_leds(list: LedList) {
    trace!("Freeing LED list of {}", list.len());
    drop(list);
}

/// Release a single LED detached with [`LedList::detach_first`]
pub fn free_led(led: Led) {
    trace!("Freeing LED {}", led.name);
    drop(led);
}
