//! scanmark Core Library
//!
//! This crate provides the bookmark store of a radio scanner: frequency
//! bookmarks organized into named groups, a bounded list of recently tuned
//! frequencies, and saved frequency ranges, with a round-trip to a
//! tree-structured bookmark file.
//!
//! # Architecture
//!
//! - **Stores**: groups, recents and ranges, each behind its own lock
//! - **Manager**: facade over the stores with injected collaborators
//! - **Persistence**: tree document on disk, backup then atomic write
//!
//! # Quick Start
//!
//! ```text
//! let config = Config::load()?;
//! let manager = BookmarkManager::new();
//! config.persistence().load(&manager, &config.bookmark_file);
//!
//! let entry = BookmarkEntry::new(121_500_000, 6000, "AM", "Guard").into_ref();
//! manager.add_bookmark("Air", entry);
//!
//! config.persistence().save(&manager, &config.bookmark_file);
//! ```
//!
//! # Modules
//!
//! - `manager`: `BookmarkManager` (main entry point)
//! - `models`: bookmark and range entries, display names
//! - `store`: the three in-memory collections
//! - `persistence`: bookmark file load/save
//! - `tree`: tree document used on disk and for settings blobs
//! - `tuning`: traits the host application implements
//! - `config`: application configuration

pub mod config;
pub mod error;
pub mod manager;
pub mod models;
pub mod persistence;
pub mod store;
pub mod tree;
pub mod tuning;

#[cfg(test)]
mod testing;

pub use config::Config;
pub use error::PersistError;
pub use manager::BookmarkManager;
pub use models::{
    active_display_name, display_name, format_frequency, BookmarkEntry, BookmarkRef, EntryState,
    RangeEntry, RangeRef,
};
pub use persistence::{BookmarkPersistence, LoadOutcome, LoadReport, SaveOutcome};
pub use store::RECENTS_MAX;
pub use tree::{DataNode, DataTree, DataValue};
pub use tuning::{BookmarkObserver, Tuning, TuningSource};
