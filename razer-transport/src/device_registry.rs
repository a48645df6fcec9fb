//! Device registry - known Razer mouse product IDs
//!
//! Discovery only looks at VID/PID pairs listed here (plus any added at
//! runtime). Which backend drives a product is decided one layer up.

/// Razer USA vendor ID
pub const VENDOR_ID: u16 = 0x1532;

/// DeathAdder (3500 DPI era)
pub const PID_DEATHADDER: u16 = 0x0007;
/// Krait
pub const PID_KRAIT: u16 = 0x0003;
/// Lachesis
pub const PID_LACHESIS: u16 = 0x000C;

/// All product IDs discovered by default
pub const MOUSE_PIDS: &[u16] = &[PID_DEATHADDER, PID_KRAIT, PID_LACHESIS];

/// HID interface carrying the configuration feature reports
pub const CONTROL_INTERFACE: i32 = 0;

/// Check if PID is one of the built-in mice
#[inline]
pub fn is_known_mouse_pid(pid: u16) -> bool {
    MOUSE_PIDS.contains(&pid)
}

/// Built-in VID/PID pairs
pub fn default_vid_pids() -> Vec<(u16, u16)> {
    MOUSE_PIDS.iter().map(|&pid| (VENDOR_ID, pid)).collect()
}
