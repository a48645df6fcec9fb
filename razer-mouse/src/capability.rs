//! Capability lists returned by backend queries
//!
//! Each query hands the caller a freshly allocated, owned list. Release goes
//! through the kind-specific `free_*` function (or a plain drop); taking the
//! list by value makes double-free and cross-kind release unrepresentable.

use tracing::trace;

use crate::settings::{Frequency, Resolution};

/// Owned list of capability values of one kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapabilityList<T> {
    items: Vec<T>,
}

/// Frequencies a device accepts
pub type FrequencyList = CapabilityList<Frequency>;

/// Resolutions a device accepts
pub type ResolutionList = CapabilityList<Resolution>;

impl<T: Copy + PartialEq> CapabilityList<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self { items }
    }

    /// A valid list with no adjustable values
    pub fn empty() -> Self {
        Self { items: Vec::new() }
    }

    /// Element count
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, value: T) -> bool {
        self.items.contains(&value)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    pub fn into_vec(self) -> Vec<T> {
        self.items
    }
}

impl<T: Copy + PartialEq> From<Vec<T>> for CapabilityList<T> {
    fn from(items: Vec<T>) -> Self {
        Self::new(items)
    }
}

impl<T: Copy + PartialEq> FromIterator<T> for CapabilityList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<T> IntoIterator for CapabilityList<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a CapabilityList<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Release a frequency list returned by a query
pub fn free_frequency_list(list: FrequencyList) {
    trace!("Freeing frequency list of {}", list.len());
    drop(list);
}

/// Release a resolution list returned by a query
pub fn free_resolution_list(list: ResolutionList) {
    trace!("Freeing resolution list of {}", list.len());
    drop(list);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_len_matches_contents() {
        let list = FrequencyList::new(vec![Frequency::Hz125, Frequency::Hz1000]);
        assert_eq!(list.len(), 2);
        assert_eq!(list.iter().count(), list.len());
        assert!(list.contains(Frequency::Hz1000));
        assert!(!list.contains(Frequency::Hz500));
    }

    #[test]
    fn test_free_empty_lists() {
        let freqs = FrequencyList::empty();
        assert!(freqs.is_empty());
        free_frequency_list(freqs);
        free_resolution_list(ResolutionList::empty());
    }

    #[test]
    fn test_collect_and_into_vec() {
        let list: ResolutionList = Resolution::ALL.iter().copied().collect();
        assert_eq!(list.as_slice(), Resolution::ALL);
        assert_eq!(list.into_vec().len(), 5);
    }
}
