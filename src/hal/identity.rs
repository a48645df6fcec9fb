//! Identity assignment for discovered mice
//!
//! An identity is `<Family>:<vid>-<pid>:<bus path>`. It depends only on
//! what the bus reports, so the same mouse on the same port keeps its name
//! across rescans. When two devices would share a name (long paths cut at
//! the size limit) the later one gets a `#n` suffix.

use razer_mouse::{MouseId, MouseType, IDSTR_MAX_SIZE};
use razer_transport::TransportDeviceInfo;
use tracing::warn;

/// Identity a device would get if nothing else claimed it
pub fn candidate(family: MouseType, info: &TransportDeviceInfo) -> MouseId {
    MouseId::new(&format!(
        "{}:{:04x}-{:04x}:{}",
        family.name(),
        info.vid,
        info.pid,
        info.device_path
    ))
}

/// First identity for `info` that `taken` rejects
pub fn assign(
    family: MouseType,
    info: &TransportDeviceInfo,
    taken: impl Fn(&MouseId) -> bool,
) -> MouseId {
    let base = candidate(family, info);
    if !taken(&base) {
        return base;
    }

    let mut n = 2usize;
    loop {
        let id = with_suffix(base.as_str(), &format!("#{}", n));
        if !taken(&id) {
            warn!("Identity {} already in use, assigned {}", base, id);
            return id;
        }
        n += 1;
    }
}

/// Append `suffix`, shortening `base` so the result still fits
fn with_suffix(base: &str, suffix: &str) -> MouseId {
    let mut end = base.len().min(IDSTR_MAX_SIZE - 1 - suffix.len());
    while !base.is_char_boundary(end) {
        end -= 1;
    }
    MouseId::new(&format!("{}{}", &base[..end], suffix))
}
