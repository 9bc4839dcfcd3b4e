use parking_lot::Mutex;
use std::collections::HashSet;

/// The set of every URL ever enqueued
///
/// Grows monotonically and exists only so the termination check can compare
/// its size against the number of visited URLs. Kept apart from
/// [`VisitStateMap`](super::VisitStateMap) so updates to one never contend
/// on the other's lock.
#[derive(Debug, Default)]
pub struct ToVisitSet {
    inner: Mutex<HashSet<String>>,
}

impl ToVisitSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `url`; returns `true` if it was not already present
    pub fn insert(&self, url: &str) -> bool {
        self.inner.lock().insert(url.to_string())
    }

    pub fn contains(&self, url: &str) -> bool {
        self.inner.lock().contains(url)
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }
}
