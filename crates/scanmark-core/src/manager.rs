//! Bookmark manager
//!
//! The `BookmarkManager` ties together the three stores and the host
//! application's collaborators:
//! - a [`TuningSource`] listing live tunings (captured into recents on save)
//! - a [`BookmarkObserver`] told about changes so a UI can refresh
//!
//! Both are optional. Observer calls are made after the store lock has been
//! released, so an observer may read back from the manager.
//!
//! ## Usage
//!
//! ```ignore
//! let manager = BookmarkManager::new()
//!     .with_tuning_source(engine.clone())
//!     .with_observer(panel.clone());
//!
//! let entry = manager.add_bookmark_from_tuning("Air", tuning.as_ref());
//! manager.move_bookmark(&entry, "Tower");
//! let tower = manager.bookmarks("Tower");
//! ```

use std::sync::Arc;

use uuid::Uuid;

use crate::models::{BookmarkEntry, BookmarkRef, RangeRef};
use crate::store::{GroupStore, RangeStore, RecentsRing};
use crate::tuning::{BookmarkObserver, Tuning, TuningSource};

/// Registry of bookmarks, recents and ranges
#[derive(Default)]
pub struct BookmarkManager {
    groups: GroupStore,
    recents: RecentsRing,
    ranges: RangeStore,
    tuning_source: Option<Arc<dyn TuningSource>>,
    observer: Option<Arc<dyn BookmarkObserver>>,
}

impl BookmarkManager {
    /// Create an empty manager with no collaborators attached
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach the source of live tunings
    pub fn with_tuning_source(mut self, source: Arc<dyn TuningSource>) -> Self {
        self.tuning_source = Some(source);
        self
    }

    /// Attach a presentation-layer observer
    pub fn with_observer(mut self, observer: Arc<dyn BookmarkObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    // ==================== Groups ====================

    /// Add an entry to a group; an already grouped entry is moved there
    pub fn add_bookmark(&self, group: &str, entry: BookmarkRef) {
        match self.groups.add_bookmark(group, entry) {
            Some(source) if source == group => {}
            Some(source) => {
                self.notify_group_changed(&source);
                self.notify_group_changed(group);
            }
            None => self.notify_group_changed(group),
        }
    }

    /// Snapshot a live tuning into a new bookmark in `group`
    pub fn add_bookmark_from_tuning(&self, group: &str, tuning: &dyn Tuning) -> BookmarkRef {
        let entry = BookmarkEntry::from_tuning(tuning).into_ref();
        self.add_bookmark(group, Arc::clone(&entry));
        entry
    }

    /// Remove an entry from a specific group
    pub fn remove_bookmark_from(&self, group: &str, entry: &BookmarkRef) -> bool {
        let removed = self.groups.remove_bookmark_from(group, entry);
        if removed {
            self.notify_group_changed(group);
        }
        removed
    }

    /// Remove an entry from whichever group holds it
    pub fn remove_bookmark(&self, entry: &BookmarkRef) -> bool {
        match self.groups.remove_bookmark(entry) {
            Some(group) => {
                self.notify_group_changed(&group);
                true
            }
            None => false,
        }
    }

    /// Move an entry into `group`; false when nothing moved
    pub fn move_bookmark(&self, entry: &BookmarkRef, group: &str) -> bool {
        match self.groups.move_bookmark(entry, group) {
            Some(source) => {
                self.notify_group_changed(&source);
                self.notify_group_changed(group);
                true
            }
            None => false,
        }
    }

    /// Change the label of a grouped entry
    pub fn relabel_bookmark(&self, entry: &BookmarkRef, label: &str) -> bool {
        match self.groups.relabel_bookmark(entry, label) {
            Some(group) => {
                self.notify_group_changed(&group);
                true
            }
            None => false,
        }
    }

    pub fn add_group(&self, name: &str) -> bool {
        let created = self.groups.add_group(name);
        if created {
            self.notify_bookmarks_changed();
        }
        created
    }

    pub fn remove_group(&self, name: &str) -> bool {
        let removed = self.groups.remove_group(name);
        if removed {
            self.notify_bookmarks_changed();
        }
        removed
    }

    pub fn rename_group(&self, old: &str, new: &str) -> bool {
        let renamed = self.groups.rename_group(old, new);
        if renamed {
            self.notify_bookmarks_changed();
        }
        renamed
    }

    /// Sorted entries of a group
    pub fn bookmarks(&self, group: &str) -> Vec<BookmarkRef> {
        self.groups.bookmarks(group)
    }

    pub fn groups(&self) -> Vec<String> {
        self.groups.groups()
    }

    pub fn has_group(&self, name: &str) -> bool {
        self.groups.has_group(name)
    }

    pub fn group_of(&self, entry: &BookmarkRef) -> Option<String> {
        self.groups.group_of(entry)
    }

    /// Find a grouped entry by id, with its group name
    pub fn find_bookmark(&self, id: Uuid) -> Option<(String, BookmarkRef)> {
        self.groups.find_by_id(id)
    }

    /// Every grouped entry with its group name
    pub fn all_bookmarks(&self) -> Vec<(String, BookmarkRef)> {
        self.groups.all_bookmarks()
    }

    pub fn bookmark_count(&self) -> usize {
        self.groups.bookmark_count()
    }

    pub fn set_expand_state(&self, group: &str, expanded: bool) {
        self.groups.set_expand_state(group, expanded);
    }

    pub fn expand_state(&self, group: &str) -> bool {
        self.groups.expand_state(group)
    }

    // ==================== Recents ====================

    pub fn add_recent(&self, entry: BookmarkRef) {
        self.recents.add_recent(entry);
        self.notify_active_list_changed();
    }

    /// Snapshot a live tuning onto the recents list
    pub fn add_recent_from_tuning(&self, tuning: &dyn Tuning) -> BookmarkRef {
        let entry = BookmarkEntry::from_tuning(tuning).into_ref();
        self.add_recent(Arc::clone(&entry));
        entry
    }

    pub fn remove_recent(&self, entry: &BookmarkRef) -> bool {
        let removed = self.recents.remove_recent(entry);
        if removed {
            self.notify_active_list_changed();
        }
        removed
    }

    /// Recents, oldest first
    pub fn recents(&self) -> Vec<BookmarkRef> {
        self.recents.recents()
    }

    pub fn find_recent(&self, id: Uuid) -> Option<BookmarkRef> {
        self.recents.recents().into_iter().find(|e| e.id() == id)
    }

    pub fn clear_recents(&self) {
        self.recents.clear_recents();
        self.notify_active_list_changed();
    }

    // ==================== Ranges ====================

    pub fn add_range(&self, entry: RangeRef) {
        self.ranges.add_range(entry);
    }

    pub fn remove_range(&self, entry: &RangeRef) -> bool {
        self.ranges.remove_range(entry)
    }

    /// Ranges sorted by start frequency
    pub fn ranges(&self) -> Vec<RangeRef> {
        self.ranges.ranges()
    }

    pub fn find_range(&self, id: Uuid) -> Option<RangeRef> {
        self.ranges.find_by_id(id)
    }

    pub fn clear_ranges(&self) {
        self.ranges.clear_ranges();
    }

    // ==================== Tunings ====================

    /// Reconfigure a live tuning from a saved entry
    ///
    /// The tuning gets a copy of the settings blob; no lock is held while it
    /// runs, so it may call back into the manager.
    pub fn apply_bookmark(&self, entry: &BookmarkRef, tuning: &dyn Tuning) {
        let settings = entry.settings();
        tuning.apply_settings(&settings);
    }

    /// Fresh snapshots of every live tuning, empty without a source
    pub fn live_snapshots(&self) -> Vec<BookmarkEntry> {
        match &self.tuning_source {
            Some(source) => source
                .active_tunings()
                .iter()
                .map(|t| BookmarkEntry::from_tuning(t.as_ref()))
                .collect(),
            None => Vec::new(),
        }
    }

    // ==================== Notifications ====================

    pub fn notify_active_list_changed(&self) {
        if let Some(observer) = &self.observer {
            observer.active_list_changed();
        }
    }

    pub fn notify_bookmarks_changed(&self) {
        if let Some(observer) = &self.observer {
            observer.bookmarks_changed();
        }
    }

    pub fn notify_group_changed(&self, group: &str) {
        if let Some(observer) = &self.observer {
            observer.group_changed(group);
        }
    }
}
