//! Device identity strings

use std::fmt;

/// Upper bound on identity length in bytes, including room for a C terminator
pub const IDSTR_MAX_SIZE: usize = 128;

/// Stable, unique label for one physical mouse
///
/// Always NUL-free and shorter than [`IDSTR_MAX_SIZE`] bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MouseId(String);

impl MouseId {
    /// Build an identity, dropping NUL bytes and truncating on a char boundary
    pub fn new(raw: &str) -> Self {
        let mut s: String = raw.chars().filter(|&c| c != '\0').collect();
        if s.len() >= IDSTR_MAX_SIZE {
            let mut end = IDSTR_MAX_SIZE - 1;
            while !s.is_char_boundary(end) {
                end -= 1;
            }
            s.truncate(end);
        }
        Self(s)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MouseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for MouseId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for MouseId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for MouseId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_nul() {
        let id = MouseId::new("Death\0Adder:usb-1");
        assert_eq!(id.as_str(), "DeathAdder:usb-1");
    }

    #[test]
    fn test_truncates_to_bound() {
        let id = MouseId::new(&"x".repeat(500));
        assert_eq!(id.as_str().len(), IDSTR_MAX_SIZE - 1);
    }

    #[test]
    fn test_truncates_on_char_boundary() {
        // 'é' is two bytes; 126 ASCII bytes put it across the limit
        let raw = format!("{}é", "a".repeat(126));
        let id = MouseId::new(&raw);
        assert!(id.as_str().len() < IDSTR_MAX_SIZE);
        assert!(id.as_str().chars().all(|c| c == 'a'));
    }

    #[test]
    fn test_compares_with_str() {
        let id = MouseId::new("Krait:1532-0003:usb-2");
        assert!(id == "Krait:1532-0003:usb-2");
    }
}
