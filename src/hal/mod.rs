// Hardware Abstraction Layer for Razer mice
//
// - Identity assignment (stable, unique names)
// - Mouse wrapper (claim state, gated backend access)
// - Registry (rescan, claim, release)

pub mod identity;
pub mod mouse;
pub mod registry;

pub use mouse::{ClaimState, Mouse};
pub use registry::MouseRegistry;
