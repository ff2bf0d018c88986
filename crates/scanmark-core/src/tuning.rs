//! Collaborator contracts
//!
//! The bookmark store never reaches into a radio engine or a UI directly.
//! Instead the host application hands a [`BookmarkManager`](crate::BookmarkManager)
//! implementations of these traits when it builds one.

use std::sync::Arc;

use crate::tree::DataNode;

/// A live demodulator tuning owned by the radio engine
pub trait Tuning: Send + Sync {
    /// Center frequency in Hz
    fn frequency(&self) -> i64;

    /// Bandwidth in Hz
    fn bandwidth(&self) -> i64;

    /// Demodulator mode tag, e.g. `"FM"` or `"USB"`
    fn mod_type(&self) -> String;

    /// User-assigned label; empty when unset
    fn user_label(&self) -> String;

    /// Write the full demodulator configuration into `node`
    fn write_settings(&self, node: &mut DataNode);

    /// Reconfigure the demodulator from a previously written settings blob
    fn apply_settings(&self, node: &DataNode);
}

/// Reports the tunings that are currently live in the radio engine
pub trait TuningSource: Send + Sync {
    fn active_tunings(&self) -> Vec<Arc<dyn Tuning>>;
}

/// Presentation-layer hook, informed after bookmark data changes
///
/// Every method defaults to a no-op so an implementation only overrides what
/// it renders.
pub trait BookmarkObserver: Send + Sync {
    /// The recents / active list changed
    fn active_list_changed(&self) {}

    /// The set of groups changed
    fn bookmarks_changed(&self) {}

    /// Entries inside one group changed
    fn group_changed(&self, _group: &str) {}
}
