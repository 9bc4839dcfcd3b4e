use parking_lot::{Mutex, MutexGuard};
use std::collections::HashMap;

/// Lifecycle of a URL after it has been dequeued
///
/// A URL that is absent from the map has never been dequeued. Transitions
/// are one-way: absent → `Visiting` → `Visited`. Failed URLs end up
/// `Visited` too; nothing ever leaves the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisitStatus {
    Visiting,
    Visited,
}

/// Tracks the visit status of every dequeued URL under its own lock
#[derive(Debug, Default)]
pub struct VisitStateMap {
    inner: Mutex<HashMap<String, VisitStatus>>,
}

impl VisitStateMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims `url` for processing
    ///
    /// Returns `true` and marks the URL `Visiting` if it has never been
    /// claimed; returns `false` if it is already in progress or done. This
    /// is the at-most-once guarantee for URL processing.
    pub fn claim(&self, url: &str) -> bool {
        let mut map = self.inner.lock();
        if map.contains_key(url) {
            return false;
        }
        map.insert(url.to_string(), VisitStatus::Visiting);
        true
    }

    /// Marks `url` as visited, on success and on permanent failure alike
    pub fn mark_visited(&self, url: &str) {
        self.inner
            .lock()
            .insert(url.to_string(), VisitStatus::Visited);
    }

    /// Returns the current status of `url`, or `None` if never dequeued
    pub fn status(&self, url: &str) -> Option<VisitStatus> {
        self.inner.lock().get(url).copied()
    }

    /// Locks the map and hands the guard to the caller
    ///
    /// The termination check snapshots this map and the to-visit set under
    /// one critical section; it needs the lock held across both reads.
    pub(crate) fn guard(&self) -> MutexGuard<'_, HashMap<String, VisitStatus>> {
        self.inner.lock()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claim_new_url() {
        let map = VisitStateMap::new();
        assert!(map.claim("https://example.com/"));
        assert_eq!(map.status("https://example.com/"), Some(VisitStatus::Visiting));
    }

    #[test]
    fn test_claim_is_at_most_once() {
        let map = VisitStateMap::new();
        assert!(map.claim("https://example.com/"));
        assert!(!map.claim("https://example.com/"));
    }

    #[test]
    fn test_claim_rejected_after_visited() {
        let map = VisitStateMap::new();
        assert!(map.claim("https://example.com/"));
        map.mark_visited("https://example.com/");
        assert!(!map.claim("https://example.com/"));
    }

    #[test]
    fn test_mark_visited() {
        let map = VisitStateMap::new();
        map.claim("https://example.com/");
        map.mark_visited("https://example.com/");
        assert_eq!(map.status("https://example.com/"), Some(VisitStatus::Visited));
    }

    #[test]
    fn test_absent_means_never_dequeued() {
        let map = VisitStateMap::new();
        assert_eq!(map.status("https://example.com/"), None);
    }
}
