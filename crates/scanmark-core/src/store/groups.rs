//! Bookmark groups
//!
//! Maps a group name to an ordered list of entries. Sorting is deferred to
//! read time: every structural change marks the group unsorted and the next
//! [`GroupStore::bookmarks`] call sorts in place and clears the mark.
//!
//! Lock order is always the store lock, then an entry lock.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::debug;
use uuid::Uuid;

use crate::models::BookmarkRef;

#[derive(Debug, Default)]
struct GroupList {
    entries: Vec<BookmarkRef>,
    sorted: bool,
}

impl GroupList {
    fn push(&mut self, entry: BookmarkRef) {
        self.entries.push(entry);
        self.sorted = false;
    }

    fn position(&self, entry: &BookmarkRef) -> Option<usize> {
        self.entries.iter().position(|e| Arc::ptr_eq(e, entry))
    }
}

/// Named groups of bookmarks
#[derive(Debug, Default)]
pub struct GroupStore {
    groups: Mutex<BTreeMap<String, GroupList>>,
    /// UI expand/collapse state, kept apart from the group lock
    expanded: Mutex<HashMap<String, bool>>,
}

impl GroupStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<String, GroupList>> {
        self.groups.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_expanded(&self) -> MutexGuard<'_, HashMap<String, bool>> {
        self.expanded.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append an entry to a group, creating the group if needed
    ///
    /// An entry lives in at most one group. If it is already grouped it is
    /// moved to `group` (or left alone when it is already there), and the
    /// group it was found in is returned.
    pub fn add_bookmark(&self, group: &str, entry: BookmarkRef) -> Option<String> {
        let mut groups = self.lock();

        let found = groups
            .iter()
            .find_map(|(name, list)| list.position(&entry).map(|idx| (name.clone(), idx)));
        match found {
            Some((source, _)) if source == group => {
                debug!(group, "bookmark already in group");
                Some(source)
            }
            Some((source, idx)) => {
                if let Some(list) = groups.get_mut(&source) {
                    list.entries.remove(idx);
                    list.sorted = false;
                }
                groups.entry(group.to_string()).or_default().push(entry);
                debug!(from = %source, to = group, "grouped bookmark relocated");
                Some(source)
            }
            None => {
                groups.entry(group.to_string()).or_default().push(entry);
                debug!(group, "bookmark added");
                None
            }
        }
    }

    /// Remove an entry from one group; returns whether it was there
    pub fn remove_bookmark_from(&self, group: &str, entry: &BookmarkRef) -> bool {
        let mut groups = self.lock();
        let _entry = entry.lock();

        let Some(list) = groups.get_mut(group) else {
            return false;
        };
        match list.position(entry) {
            Some(idx) => {
                list.entries.remove(idx);
                debug!(group, "bookmark removed");
                true
            }
            None => false,
        }
    }

    /// Remove an entry from whichever group holds it
    ///
    /// Returns the name of the group it was removed from.
    pub fn remove_bookmark(&self, entry: &BookmarkRef) -> Option<String> {
        let mut groups = self.lock();
        let _entry = entry.lock();

        for (name, list) in groups.iter_mut() {
            if let Some(idx) = list.position(entry) {
                list.entries.remove(idx);
                debug!(group = %name, "bookmark removed");
                return Some(name.clone());
            }
        }
        None
    }

    /// Relocate an entry into `target`, keeping its identity
    ///
    /// Returns the source group when a move happened. Entries already in
    /// `target`, or not in any group, are left alone.
    pub fn move_bookmark(&self, entry: &BookmarkRef, target: &str) -> Option<String> {
        let mut groups = self.lock();
        let _entry = entry.lock();

        let (source, idx) = groups
            .iter()
            .find_map(|(name, list)| list.position(entry).map(|idx| (name.clone(), idx)))?;
        if source == target {
            return None;
        }

        if let Some(list) = groups.get_mut(&source) {
            let moved = list.entries.remove(idx);
            list.sorted = false;
            groups.entry(target.to_string()).or_default().push(moved);
        }
        debug!(from = %source, to = target, "bookmark moved");
        Some(source)
    }

    /// Change an entry's label in place; returns its group
    pub fn relabel_bookmark(&self, entry: &BookmarkRef, label: &str) -> Option<String> {
        let mut groups = self.lock();
        let mut state = entry.lock();

        let (name, list) = groups
            .iter_mut()
            .find(|(_, list)| list.position(entry).is_some())?;
        state.set_label(label);
        list.sorted = false;
        Some(name.clone())
    }

    /// Create an empty group; returns false if it already existed
    pub fn add_group(&self, name: &str) -> bool {
        let mut groups = self.lock();
        if groups.contains_key(name) {
            return false;
        }
        groups.insert(name.to_string(), GroupList::default());
        debug!(group = name, "group created");
        true
    }

    /// Drop a group and every entry in it
    pub fn remove_group(&self, name: &str) -> bool {
        let removed = self.lock().remove(name);
        match removed {
            Some(list) => {
                debug!(group = name, entries = list.entries.len(), "group removed");
                true
            }
            None => false,
        }
    }

    /// Rename a group, merging into `new` when it already exists
    pub fn rename_group(&self, old: &str, new: &str) -> bool {
        if old == new {
            return false;
        }

        let merged = {
            let mut groups = self.lock();
            let Some(list) = groups.remove(old) else {
                return false;
            };
            match groups.get_mut(new) {
                Some(target) => {
                    target.entries.extend(list.entries);
                    target.sorted = false;
                    true
                }
                None => {
                    groups.insert(new.to_string(), list);
                    false
                }
            }
        };

        let mut expanded = self.lock_expanded();
        if let Some(state) = expanded.remove(old) {
            if !merged {
                expanded.insert(new.to_string(), state);
            }
        }

        debug!(from = old, to = new, merged, "group renamed");
        true
    }

    /// Sorted snapshot of a group's entries; empty if the group is absent
    pub fn bookmarks(&self, group: &str) -> Vec<BookmarkRef> {
        let mut groups = self.lock();
        let Some(list) = groups.get_mut(group) else {
            return Vec::new();
        };

        if !list.sorted {
            list.entries.sort_by_cached_key(|e| e.sort_key());
            list.sorted = true;
        }
        list.entries.clone()
    }

    /// Names of all groups
    pub fn groups(&self) -> Vec<String> {
        self.lock().keys().cloned().collect()
    }

    pub fn has_group(&self, name: &str) -> bool {
        self.lock().contains_key(name)
    }

    /// Name of the group holding `entry`
    pub fn group_of(&self, entry: &BookmarkRef) -> Option<String> {
        self.lock()
            .iter()
            .find(|(_, list)| list.position(entry).is_some())
            .map(|(name, _)| name.clone())
    }

    /// Find an entry by its identifier across all groups
    pub fn find_by_id(&self, id: Uuid) -> Option<(String, BookmarkRef)> {
        self.lock().iter().find_map(|(name, list)| {
            list.entries
                .iter()
                .find(|e| e.id() == id)
                .map(|e| (name.clone(), Arc::clone(e)))
        })
    }

    /// Every entry with its group, groups in name order
    pub fn all_bookmarks(&self) -> Vec<(String, BookmarkRef)> {
        self.lock()
            .iter()
            .flat_map(|(name, list)| list.entries.iter().map(move |e| (name.clone(), Arc::clone(e))))
            .collect()
    }

    /// Total number of entries across all groups
    pub fn bookmark_count(&self) -> usize {
        self.lock().values().map(|l| l.entries.len()).sum()
    }

    pub fn set_expand_state(&self, group: &str, expanded: bool) {
        self.lock_expanded().insert(group.to_string(), expanded);
    }

    /// Whether the group is shown expanded; defaults to `true`
    pub fn expand_state(&self, group: &str) -> bool {
        self.lock_expanded().get(group).copied().unwrap_or(true)
    }
}
