//! Recently tuned entries
//!
//! A bounded FIFO: new entries go on the back, and once the ring is over
//! capacity the oldest entries fall off the front.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::debug;

use crate::models::BookmarkRef;

/// Maximum number of recents kept
pub const RECENTS_MAX: usize = 25;

/// Bounded list of recently tuned entries
#[derive(Debug)]
pub struct RecentsRing {
    entries: Mutex<VecDeque<BookmarkRef>>,
    capacity: usize,
}

impl Default for RecentsRing {
    fn default() -> Self {
        Self::new()
    }
}

impl RecentsRing {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(VecDeque::with_capacity(RECENTS_MAX + 1)),
            capacity: RECENTS_MAX,
        }
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<BookmarkRef>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append an entry, evicting the oldest while over capacity
    ///
    /// Returns the number of evicted entries.
    pub fn add_recent(&self, entry: BookmarkRef) -> usize {
        let mut entries = self.lock();
        entries.push_back(entry);

        let mut evicted = 0;
        while entries.len() > self.capacity {
            entries.pop_front();
            evicted += 1;
        }
        if evicted > 0 {
            debug!(evicted, "recents trimmed");
        }
        evicted
    }

    /// Remove an entry by reference; returns whether it was present
    pub fn remove_recent(&self, entry: &BookmarkRef) -> bool {
        let mut entries = self.lock();
        match entries.iter().position(|e| Arc::ptr_eq(e, entry)) {
            Some(idx) => {
                entries.remove(idx);
                true
            }
            None => false,
        }
    }

    /// Snapshot of the ring, oldest first
    ///
    /// Taken under the ring lock, so a concurrent `add_recent` is either
    /// fully visible or not at all.
    pub fn recents(&self) -> Vec<BookmarkRef> {
        self.lock().iter().cloned().collect()
    }

    /// Drop every entry from the ring
    pub fn clear_recents(&self) {
        self.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BookmarkEntry;

    fn entry(freq: i64) -> BookmarkRef {
        BookmarkEntry::new(freq, 10_000, "FM", "").into_ref()
    }

    #[test]
    fn test_insertion_order_kept() {
        let ring = RecentsRing::new();
        ring.add_recent(entry(300));
        ring.add_recent(entry(100));
        ring.add_recent(entry(200));

        let freqs: Vec<_> = ring.recents().iter().map(|e| e.frequency()).collect();
        assert_eq!(freqs, vec![300, 100, 200]);
    }

    #[test]
    fn test_26th_evicts_oldest() {
        let ring = RecentsRing::new();
        let first = entry(0);
        ring.add_recent(Arc::clone(&first));
        for i in 1..RECENTS_MAX as i64 {
            assert_eq!(ring.add_recent(entry(i)), 0);
        }
        assert_eq!(ring.len(), RECENTS_MAX);

        assert_eq!(ring.add_recent(entry(99)), 1);

        let recents = ring.recents();
        assert_eq!(recents.len(), RECENTS_MAX);
        assert!(!recents.iter().any(|e| Arc::ptr_eq(e, &first)));
        assert_eq!(recents[0].frequency(), 1);
        assert_eq!(recents[RECENTS_MAX - 1].frequency(), 99);
    }

    #[test]
    fn test_never_exceeds_capacity() {
        let ring = RecentsRing::new();
        for i in 0..100 {
            ring.add_recent(entry(i));
            assert!(ring.len() <= ring.capacity());
        }
    }

    #[test]
    fn test_remove_recent() {
        let ring = RecentsRing::new();
        let a = entry(1);
        let b = entry(2);
        ring.add_recent(Arc::clone(&a));
        ring.add_recent(Arc::clone(&b));

        assert!(ring.remove_recent(&a));
        assert!(!ring.remove_recent(&a));
        assert!(!ring.remove_recent(&entry(2)));
        assert_eq!(ring.len(), 1);
    }

    #[test]
    fn test_clear_keeps_outside_references_alive() {
        let ring = RecentsRing::new();
        let a = entry(1);
        ring.add_recent(Arc::clone(&a));

        ring.clear_recents();
        assert!(ring.is_empty());
        assert_eq!(a.frequency(), 1);
    }
}
