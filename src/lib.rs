//! Razer mouse hardware abstraction layer
//!
//! Discovers supported Razer mice, hands out exclusive claims on them and
//! exposes their scan frequency, resolution, firmware version and LEDs
//! through one family-independent API.
//!
//! ```no_run
//! use razer_hal::{RazerHal, Resolution};
//!
//! # fn main() -> Result<(), razer_hal::HalError> {
//! let mut hal = RazerHal::init()?;
//! let ids: Vec<String> = hal.rescan()?.iter().map(|m| m.id().to_string()).collect();
//! for id in &ids {
//!     hal.claim(id)?;
//!     hal.device(id)?.set_resolution(Resolution::Dpi1600)?;
//!     hal.release(id);
//! }
//! hal.exit();
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod context;
pub mod error;
pub mod hal;

pub use config::{ExtraDevice, HalConfig};
pub use context::RazerHal;
pub use error::HalError;
pub use hal::{ClaimState, Mouse, MouseRegistry};

pub use razer_mouse::{
    free_frequency_list, free_led, free_leds, free_resolution_list, FirmwareVersion, Frequency,
    FrequencyList, Led, LedList, LedState, MouseId, MouseType, Resolution, ResolutionList,
};
pub use razer_transport::ErrorKind;
