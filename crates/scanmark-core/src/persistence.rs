//! Bookmark file persistence
//!
//! Saves and loads a [`BookmarkManager`] as a tree document. Files are
//! resolved against the configuration directory.
//!
//! Document layout:
//! - `header`: `version`, `saved_at`
//! - `ranges`: one `range` per saved range (`label`, `freq`, `start`, `end`)
//! - `modems`: one `group` per bookmark group (`@name`, `@expanded`, then a
//!   `modem` settings blob per entry, tagged with the entry's `@id`)
//! - `recent_modems`: snapshots of the live tunings, then the recents list
//!
//! Saving copies the previous file to a `.backup` sibling first (best
//! effort) and then writes atomically. Neither save nor load ever fails the
//! caller: both report what happened through an outcome value.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::error::{PersistError, PersistResult};
use crate::manager::BookmarkManager;
use crate::models::{BookmarkEntry, RangeEntry, MODEM_NODE};
use crate::tree::{DataNode, DataTree};

/// Node names used in the bookmark document
mod nodes {
    pub const ROOT: &str = "scanmark_bookmarks";
    pub const HEADER: &str = "header";
    pub const VERSION: &str = "version";
    pub const SAVED_AT: &str = "saved_at";
    pub const RANGES: &str = "ranges";
    pub const RANGE: &str = "range";
    pub const MODEMS: &str = "modems";
    pub const GROUP: &str = "group";
    pub const GROUP_NAME: &str = "@name";
    pub const GROUP_EXPANDED: &str = "@expanded";
    pub const RECENT_MODEMS: &str = "recent_modems";
}

/// Group name used when a saved group has no `@name`
pub const UNNAMED_GROUP: &str = "Unnamed";

/// Suffix of the backup copy written before each save
pub const BACKUP_SUFFIX: &str = ".backup";

/// Result of a save attempt
#[derive(Debug)]
pub enum SaveOutcome {
    /// Document written; `backup` is set when the previous file was copied
    Saved {
        path: PathBuf,
        backup: Option<PathBuf>,
    },
    /// Nothing written
    Skipped(PersistError),
}

impl SaveOutcome {
    pub fn is_saved(&self) -> bool {
        matches!(self, SaveOutcome::Saved { .. })
    }
}

/// Counts of what a load brought in
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub ranges: usize,
    pub groups: usize,
    pub bookmarks: usize,
    pub recents: usize,
    /// Nodes rejected as malformed
    pub skipped: usize,
}

/// Result of a load attempt
///
/// Only `Loaded` means the manager was touched.
#[derive(Debug)]
pub enum LoadOutcome {
    Loaded(LoadReport),
    /// No file at the path
    NotFound(PathBuf),
    /// File exists but could not be read
    Unreadable(PersistError),
    /// File read but is not a valid document
    Malformed(PersistError),
}

impl LoadOutcome {
    pub fn is_loaded(&self) -> bool {
        matches!(self, LoadOutcome::Loaded(_))
    }

    /// The report when loaded
    pub fn report(&self) -> Option<LoadReport> {
        match self {
            LoadOutcome::Loaded(report) => Some(*report),
            _ => None,
        }
    }
}

/// Persistence handler for bookmark files
#[derive(Debug, Clone)]
pub struct BookmarkPersistence {
    config_dir: PathBuf,
}

impl BookmarkPersistence {
    /// Create a handler resolving file names against `config_dir`
    pub fn new(config_dir: impl Into<PathBuf>) -> Self {
        Self {
            config_dir: config_dir.into(),
        }
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// Full path of a bookmark file
    pub fn path_for(&self, filename: &str) -> PathBuf {
        self.config_dir.join(filename)
    }

    /// Full path of the backup copy of a bookmark file
    pub fn backup_path_for(&self, filename: &str) -> PathBuf {
        self.config_dir.join(format!("{}{}", filename, BACKUP_SUFFIX))
    }

    /// Check if a bookmark file exists
    pub fn exists(&self, filename: &str) -> bool {
        self.path_for(filename).exists()
    }

    /// Save the manager's contents
    pub fn save(&self, manager: &BookmarkManager, filename: &str) -> SaveOutcome {
        let path = self.path_for(filename);
        let backup_path = self.backup_path_for(filename);

        match self.try_save(manager, &path, &backup_path) {
            Ok(backup) => {
                info!(path = %path.display(), "bookmarks saved");
                SaveOutcome::Saved { path, backup }
            }
            Err(e) => {
                warn!("bookmark save skipped: {}", e);
                SaveOutcome::Skipped(e)
            }
        }
    }

    fn try_save(
        &self,
        manager: &BookmarkManager,
        path: &Path,
        backup_path: &Path,
    ) -> PersistResult<Option<PathBuf>> {
        // Build and render before touching the disk
        let text = build_document(manager).render()?;

        if !is_dir_writable(&self.config_dir) {
            return Err(PersistError::DirectoryNotWritable {
                path: self.config_dir.clone(),
            });
        }

        let backup = backup_existing(path, backup_path);
        atomic_write(path, text.as_bytes())?;
        Ok(backup)
    }

    /// Load a bookmark file into the manager
    ///
    /// The whole document is parsed before anything is added, so a missing,
    /// unreadable or corrupt file leaves the manager as it was.
    pub fn load(&self, manager: &BookmarkManager, filename: &str) -> LoadOutcome {
        let path = self.path_for(filename);

        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) => {
                let err = PersistError::from_read(e, path.clone());
                if err.is_not_found() {
                    debug!(path = %path.display(), "no bookmark file");
                    return LoadOutcome::NotFound(path);
                }
                warn!("{}", err);
                return LoadOutcome::Unreadable(err);
            }
        };

        let tree = match DataTree::parse(&text) {
            Ok(tree) => tree,
            Err(e) => {
                let err = PersistError::Parse {
                    path,
                    details: e.to_string(),
                };
                warn!("{}", err);
                return LoadOutcome::Malformed(err);
            }
        };

        let report = apply_document(manager, tree.root());
        info!(
            ranges = report.ranges,
            bookmarks = report.bookmarks,
            recents = report.recents,
            skipped = report.skipped,
            "bookmarks loaded"
        );
        LoadOutcome::Loaded(report)
    }
}

/// Build the tree document for a manager's current contents
pub fn build_document(manager: &BookmarkManager) -> DataTree {
    let mut doc = DataTree::new(nodes::ROOT);
    let root = doc.root_mut();

    let header = root.new_child(nodes::HEADER);
    header.set_child(nodes::VERSION, env!("CARGO_PKG_VERSION"));
    header.set_child(nodes::SAVED_AT, Utc::now().to_rfc3339());

    let ranges = root.new_child(nodes::RANGES);
    for range in manager.ranges() {
        range.write_node(ranges.new_child(nodes::RANGE));
    }

    let modems = root.new_child(nodes::MODEMS);
    for name in manager.groups() {
        let group = modems.new_child(nodes::GROUP);
        group.set_child(nodes::GROUP_NAME, name.as_str());
        group.set_child(nodes::GROUP_EXPANDED, manager.expand_state(&name));
        for entry in manager.bookmarks(&name) {
            group.add_child(entry.to_node());
        }
    }

    let recent_modems = root.new_child(nodes::RECENT_MODEMS);
    for live in manager.live_snapshots() {
        recent_modems.add_child(live.to_node());
    }
    for entry in manager.recents() {
        recent_modems.add_child(entry.to_node());
    }

    doc
}

/// Add everything in a parsed document to the manager
pub fn apply_document(manager: &BookmarkManager, root: &DataNode) -> LoadReport {
    let mut report = LoadReport::default();

    if let Some(ranges) = root.child(nodes::RANGES) {
        for node in ranges.children_named(nodes::RANGE) {
            match RangeEntry::from_node(node) {
                Some(range) => {
                    manager.add_range(range.into_ref());
                    report.ranges += 1;
                }
                None => {
                    warn!("skipping range with missing fields");
                    report.skipped += 1;
                }
            }
        }
    }

    if let Some(modems) = root.child(nodes::MODEMS) {
        for group in modems.children_named(nodes::GROUP) {
            let name = group
                .get_text(nodes::GROUP_NAME)
                .unwrap_or_else(|| UNNAMED_GROUP.to_string());
            manager.add_group(&name);
            if let Some(expanded) = group.get_bool(nodes::GROUP_EXPANDED) {
                manager.set_expand_state(&name, expanded);
            }
            report.groups += 1;

            for node in group.children_named(MODEM_NODE) {
                match BookmarkEntry::from_node(node) {
                    Some(entry) => {
                        manager.add_bookmark(&name, entry.into_ref());
                        report.bookmarks += 1;
                    }
                    None => {
                        warn!(group = %name, "skipping bookmarked modem with missing fields");
                        report.skipped += 1;
                    }
                }
            }
        }
    }

    if let Some(recent_modems) = root.child(nodes::RECENT_MODEMS) {
        for node in recent_modems.children_named(MODEM_NODE) {
            match BookmarkEntry::from_node(node) {
                Some(entry) => {
                    manager.add_recent(entry.into_ref());
                    report.recents += 1;
                }
                None => {
                    warn!("skipping recent modem with missing fields");
                    report.skipped += 1;
                }
            }
        }
    }

    report
}

/// Whether `dir` is an existing directory we may write into
fn is_dir_writable(dir: &Path) -> bool {
    match fs::metadata(dir) {
        Ok(meta) => meta.is_dir() && !meta.permissions().readonly(),
        Err(_) => false,
    }
}

/// Copy the current file to its backup if safe; never fails the save
fn backup_existing(path: &Path, backup_path: &Path) -> Option<PathBuf> {
    if !path.exists() {
        return None;
    }

    let backup_writable = match fs::metadata(backup_path) {
        Ok(meta) => !meta.permissions().readonly(),
        Err(_) => true,
    };
    if !backup_writable {
        debug!(path = %backup_path.display(), "backup is read-only, not replacing it");
        return None;
    }

    match fs::copy(path, backup_path) {
        Ok(_) => Some(backup_path.to_path_buf()),
        Err(e) => {
            warn!(path = %backup_path.display(), "failed to write backup: {}", e);
            None
        }
    }
}

/// Write data to a file atomically
///
/// 1. Write to a temporary file in the same directory
/// 2. Sync the file to disk
/// 3. Rename the temp file to the target path
fn atomic_write(path: &Path, data: &[u8]) -> PersistResult<()> {
    let temp_path = path.with_extension("tmp");

    let mut file =
        File::create(&temp_path).map_err(|e| PersistError::from_write(e, temp_path.clone()))?;
    file.write_all(data)
        .map_err(|e| PersistError::from_write(e, temp_path.clone()))?;
    file.sync_all()
        .map_err(|e| PersistError::from_write(e, temp_path.clone()))?;

    fs::rename(&temp_path, path).map_err(|source| {
        let _ = fs::remove_file(&temp_path);
        PersistError::AtomicWrite {
            from: temp_path.clone(),
            to: path.to_path_buf(),
            source,
        }
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::models::keys;
    use crate::testing::{FakeSource, FakeTuning};
    use crate::store::RECENTS_MAX;
    use tempfile::TempDir;

    const FILE: &str = "bookmarks.json";

    fn populated() -> BookmarkManager {
        let manager = BookmarkManager::new();
        manager.add_range(RangeEntry::new("FM", 100_000_000, 88_000_000, 108_000_000).into_ref());
        manager.add_bookmark("Air", BookmarkEntry::new(121_500_000, 6000, "AM", "").into_ref());
        manager.add_bookmark("Air", BookmarkEntry::new(118_100_000, 6000, "AM", "Tower").into_ref());
        manager.add_bookmark("Ham", BookmarkEntry::new(7_074_000, 3000, "USB", "FT8").into_ref());
        manager.add_group("Empty");
        manager.set_expand_state("Ham", false);
        manager.add_recent(BookmarkEntry::new(162_550_000, 12_500, "NFM", "").into_ref());
        manager
    }

    fn fields(entry: &BookmarkEntry) -> (i64, i64, String, String) {
        let s = entry.snapshot();
        (s.frequency, s.bandwidth, s.mod_type, s.label)
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let persistence = BookmarkPersistence::new(temp_dir.path());
        let original = populated();

        assert!(!persistence.exists(FILE));
        assert!(persistence.save(&original, FILE).is_saved());
        assert!(persistence.exists(FILE));

        let loaded = BookmarkManager::new();
        let report = persistence.load(&loaded, FILE).report().unwrap();
        assert_eq!(report.ranges, 1);
        assert_eq!(report.groups, 3);
        assert_eq!(report.bookmarks, 3);
        assert_eq!(report.recents, 1);
        assert_eq!(report.skipped, 0);

        assert_eq!(loaded.groups(), original.groups());
        for group in original.groups() {
            let want: Vec<_> = original.bookmarks(&group).iter().map(|e| fields(e)).collect();
            let got: Vec<_> = loaded.bookmarks(&group).iter().map(|e| fields(e)).collect();
            assert_eq!(got, want, "group {}", group);
        }
        assert!(!loaded.expand_state("Ham"));
        assert!(loaded.expand_state("Air"));
        assert_eq!(fields(&loaded.recents()[0]), fields(&original.recents()[0]));
    }

    #[test]
    fn test_ids_survive_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let persistence = BookmarkPersistence::new(temp_dir.path());
        let original = populated();
        persistence.save(&original, FILE);

        let loaded = BookmarkManager::new();
        assert!(persistence.load(&loaded, FILE).is_loaded());

        for (group, entry) in original.all_bookmarks() {
            let (found_group, found) = loaded.find_bookmark(entry.id()).unwrap();
            assert_eq!(found_group, group);
            assert_eq!(fields(&found), fields(&entry));
            assert!(!found.settings().has_child(keys::ID));
        }
        assert_eq!(loaded.recents()[0].id(), original.recents()[0].id());
        assert_eq!(loaded.ranges()[0].id(), original.ranges()[0].id());
    }

    #[test]
    fn test_fm_range_scenario() {
        let temp_dir = TempDir::new().unwrap();
        let persistence = BookmarkPersistence::new(temp_dir.path());
        let manager = BookmarkManager::new();
        manager.add_range(RangeEntry::new("FM", 100_000_000, 88_000_000, 108_000_000).into_ref());
        persistence.save(&manager, FILE);

        let loaded = BookmarkManager::new();
        assert!(persistence.load(&loaded, FILE).is_loaded());

        let ranges = loaded.ranges();
        assert_eq!(ranges.len(), 1);
        assert_eq!(ranges[0].label, "FM");
        assert_eq!(ranges[0].freq, 100_000_000);
        assert_eq!(ranges[0].start_freq, 88_000_000);
        assert_eq!(ranges[0].end_freq, 108_000_000);
    }

    #[test]
    fn test_unknown_blob_fields_survive() {
        let temp_dir = TempDir::new().unwrap();
        let persistence = BookmarkPersistence::new(temp_dir.path());

        let mut node = DataNode::new("modem");
        node.set_child(keys::FREQUENCY, 433_920_000_i64);
        node.set_child(keys::TYPE, "AM");
        node.set_child(keys::BANDWIDTH, 10_000_i64);
        node.set_child("gain", 38.6);
        node.set_child("output_device", "hw:1,0");
        let extra = node.new_child("settings");
        extra.set_child("squelch_enabled", true);
        extra.set_child("custom", "kept");

        let manager = BookmarkManager::new();
        manager.add_bookmark("ISM", BookmarkEntry::from_node(&node).unwrap().into_ref());
        persistence.save(&manager, FILE);
        let first = fs::read_to_string(persistence.path_for(FILE)).unwrap();

        let reloaded = BookmarkManager::new();
        persistence.load(&reloaded, FILE);
        assert_eq!(reloaded.bookmarks("ISM")[0].settings(), node);

        persistence.save(&reloaded, FILE);
        let second = fs::read_to_string(persistence.path_for(FILE)).unwrap();
        let modems = |text: &str| {
            let tree = DataTree::parse(text).unwrap();
            serde_json::to_string(tree.root().child("modems").unwrap()).unwrap()
        };
        assert_eq!(modems(&first), modems(&second));
    }

    #[test]
    fn test_modem_missing_bandwidth_is_skipped() {
        let temp_dir = TempDir::new().unwrap();
        let persistence = BookmarkPersistence::new(temp_dir.path());

        let mut doc = DataTree::new(nodes::ROOT);
        let modems = doc.root_mut().new_child(nodes::MODEMS);
        let group = modems.new_child(nodes::GROUP);
        group.set_child(nodes::GROUP_NAME, "Air");
        let bad = group.new_child(MODEM_NODE);
        bad.set_child(keys::FREQUENCY, 121_500_000_i64);
        bad.set_child(keys::TYPE, "AM");
        let recent = doc.root_mut().new_child(nodes::RECENT_MODEMS);
        let bad_recent = recent.new_child(MODEM_NODE);
        bad_recent.set_child(keys::FREQUENCY, 1_i64);
        bad_recent.set_child(keys::TYPE, "AM");
        fs::write(persistence.path_for(FILE), doc.render().unwrap()).unwrap();

        let manager = BookmarkManager::new();
        let report = persistence.load(&manager, FILE).report().unwrap();

        assert_eq!(report.bookmarks, 0);
        assert_eq!(report.skipped, 2);
        assert!(manager.bookmarks("Air").is_empty());
        assert!(manager.recents().is_empty());
    }

    #[test]
    fn test_unnamed_group_and_partial_range() {
        let temp_dir = TempDir::new().unwrap();
        let persistence = BookmarkPersistence::new(temp_dir.path());

        let mut doc = DataTree::new(nodes::ROOT);
        let ranges = doc.root_mut().new_child(nodes::RANGES);
        ranges.new_child(nodes::RANGE).set_child("label", "no edges");
        let group = doc.root_mut().new_child(nodes::MODEMS).new_child(nodes::GROUP);
        group.add_child(BookmarkEntry::new(1000, 10, "AM", "").settings());
        fs::write(persistence.path_for(FILE), doc.render().unwrap()).unwrap();

        let manager = BookmarkManager::new();
        let report = persistence.load(&manager, FILE).report().unwrap();

        assert_eq!(report.ranges, 0);
        assert_eq!(report.skipped, 1);
        assert_eq!(manager.bookmarks(UNNAMED_GROUP).len(), 1);
    }

    #[test]
    fn test_missing_file_leaves_state() {
        let temp_dir = TempDir::new().unwrap();
        let persistence = BookmarkPersistence::new(temp_dir.path());
        let manager = populated();

        let outcome = persistence.load(&manager, "nope.json");
        assert!(matches!(outcome, LoadOutcome::NotFound(_)));
        assert_eq!(manager.bookmark_count(), 3);
    }

    #[test]
    fn test_malformed_file_leaves_state() {
        let temp_dir = TempDir::new().unwrap();
        let persistence = BookmarkPersistence::new(temp_dir.path());
        fs::write(persistence.path_for(FILE), "{ \"name\": \"scanmark_bookmarks\", \"children\": [").unwrap();

        let manager = populated();
        let outcome = persistence.load(&manager, FILE);

        assert!(matches!(outcome, LoadOutcome::Malformed(PersistError::Parse { .. })));
        assert_eq!(manager.bookmark_count(), 3);
        assert_eq!(manager.ranges().len(), 1);
        assert_eq!(manager.recents().len(), 1);
    }

    #[test]
    fn test_backup_written_before_overwrite() {
        let temp_dir = TempDir::new().unwrap();
        let persistence = BookmarkPersistence::new(temp_dir.path());
        let manager = BookmarkManager::new();

        match persistence.save(&manager, FILE) {
            SaveOutcome::Saved { backup, .. } => assert!(backup.is_none()),
            other => panic!("unexpected outcome: {:?}", other),
        }
        let first = fs::read_to_string(persistence.path_for(FILE)).unwrap();

        manager.add_group("New");
        match persistence.save(&manager, FILE) {
            SaveOutcome::Saved { backup, .. } => {
                assert_eq!(backup, Some(persistence.backup_path_for(FILE)))
            }
            other => panic!("unexpected outcome: {:?}", other),
        }

        let backup = fs::read_to_string(persistence.backup_path_for(FILE)).unwrap();
        assert_eq!(backup, first);
        let current = fs::read_to_string(persistence.path_for(FILE)).unwrap();
        assert!(current.contains("New"));
    }

    #[test]
    fn test_missing_directory_skips_save() {
        let temp_dir = TempDir::new().unwrap();
        let persistence = BookmarkPersistence::new(temp_dir.path().join("does-not-exist"));

        let outcome = persistence.save(&populated(), FILE);
        assert!(matches!(
            outcome,
            SaveOutcome::Skipped(PersistError::DirectoryNotWritable { .. })
        ));
        assert!(!persistence.exists(FILE));
    }

    #[test]
    fn test_live_tunings_saved_before_recents() {
        let temp_dir = TempDir::new().unwrap();
        let persistence = BookmarkPersistence::new(temp_dir.path());
        let source = FakeSource {
            tunings: vec![Arc::new(FakeTuning::new(145_800_000, 12_500, "NFM"))],
        };
        let manager = BookmarkManager::new().with_tuning_source(Arc::new(source));
        manager.add_recent(BookmarkEntry::new(100_000_000, 200_000, "FM", "").into_ref());
        persistence.save(&manager, FILE);

        let loaded = BookmarkManager::new();
        persistence.load(&loaded, FILE);

        let recents = loaded.recents();
        assert_eq!(recents.len(), 2);
        assert_eq!(recents[0].frequency(), 145_800_000);
        assert_eq!(recents[0].settings().get_i64("squelch_level"), Some(-60));
        assert_eq!(recents[1].frequency(), 100_000_000);
    }

    #[test]
    fn test_loaded_recents_are_trimmed() {
        let temp_dir = TempDir::new().unwrap();
        let persistence = BookmarkPersistence::new(temp_dir.path());

        let mut doc = DataTree::new(nodes::ROOT);
        let recent = doc.root_mut().new_child(nodes::RECENT_MODEMS);
        for i in 0..(RECENTS_MAX as i64 + 5) {
            recent.add_child(BookmarkEntry::new(i, 10, "AM", "").settings());
        }
        fs::write(persistence.path_for(FILE), doc.render().unwrap()).unwrap();

        let manager = BookmarkManager::new();
        persistence.load(&manager, FILE);

        let recents = manager.recents();
        assert_eq!(recents.len(), RECENTS_MAX);
        assert_eq!(recents[0].frequency(), 5);
    }

    #[test]
    fn test_header_carries_version() {
        let doc = build_document(&BookmarkManager::new());
        let header = doc.root().child("header").unwrap();
        assert_eq!(
            header.get_text("version").as_deref(),
            Some(env!("CARGO_PKG_VERSION"))
        );
        assert!(header.has_child("saved_at"));
    }
}
