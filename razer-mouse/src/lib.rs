//! Capability model and per-family backends for Razer mice
//!
//! This crate sits on top of `razer-transport` and knows what a mouse can
//! do: scan frequency, resolution, firmware version and indicator LEDs.
//! Every family implements [`MouseBackend`]; callers pick one through
//! [`MouseType::create_backend`] and never touch family code directly.

pub mod backend;
pub mod capability;
pub mod deathadder;
pub mod error;
pub mod id;
pub mod krait;
pub mod lachesis;
pub mod led;
pub mod settings;
pub mod wire;

#[cfg(any(test, feature = "sim"))]
pub mod sim;

pub use backend::{MouseBackend, MouseType};
pub use capability::{
    free_frequency_list, free_resolution_list, CapabilityList, FrequencyList, ResolutionList,
};
pub use error::MouseError;
pub use id::{MouseId, IDSTR_MAX_SIZE};
pub use led::{free_led, free_leds, Led, LedList, LedState};
pub use settings::{FirmwareVersion, Frequency, Resolution};
