//! Saved frequency ranges
//!
//! Same lazy-sort pattern as the group store: inserts mark the list
//! unsorted, [`RangeStore::ranges`] sorts by start frequency then label.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::debug;
use uuid::Uuid;

use crate::models::RangeRef;

#[derive(Debug, Default)]
struct RangeList {
    entries: Vec<RangeRef>,
    sorted: bool,
}

/// List of saved frequency ranges
#[derive(Debug, Default)]
pub struct RangeStore {
    inner: Mutex<RangeList>,
}

impl RangeStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, RangeList> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn add_range(&self, entry: RangeRef) {
        let mut list = self.lock();
        debug!(label = %entry.label, start = entry.start_freq, end = entry.end_freq, "range added");
        list.entries.push(entry);
        list.sorted = false;
    }

    /// Remove a range by reference; returns whether it was present
    pub fn remove_range(&self, entry: &RangeRef) -> bool {
        let mut list = self.lock();
        match list.entries.iter().position(|e| Arc::ptr_eq(e, entry)) {
            Some(idx) => {
                list.entries.remove(idx);
                true
            }
            None => false,
        }
    }

    /// Sorted snapshot of all ranges
    pub fn ranges(&self) -> Vec<RangeRef> {
        let mut list = self.lock();
        if !list.sorted {
            list.entries
                .sort_by(|a, b| (a.start_freq, &a.label).cmp(&(b.start_freq, &b.label)));
            list.sorted = true;
        }
        list.entries.clone()
    }

    pub fn find_by_id(&self, id: Uuid) -> Option<RangeRef> {
        self.lock().entries.iter().find(|e| e.id() == id).cloned()
    }

    pub fn clear_ranges(&self) {
        self.lock().entries.clear();
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().entries.is_empty()
    }
}
