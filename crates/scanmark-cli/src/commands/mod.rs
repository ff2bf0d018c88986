//! Command handlers
//!
//! Every command runs against a [`Workspace`]: the configuration plus a
//! manager loaded from the bookmark file. Write commands save it back.

pub mod bookmark;
pub mod config;
pub mod group;
pub mod range;
pub mod recent;
pub mod status;

use anyhow::{bail, Result};
use tracing::debug;
use uuid::Uuid;

use scanmark_core::{
    BookmarkManager, BookmarkPersistence, BookmarkRef, Config, LoadOutcome, LoadReport, RangeRef,
    SaveOutcome,
};

/// Loaded bookmark state for one CLI invocation
pub struct Workspace {
    pub config: Config,
    pub manager: BookmarkManager,
    persistence: BookmarkPersistence,
    /// `None` when there was no bookmark file yet
    pub loaded: Option<LoadReport>,
}

impl Workspace {
    /// Load the configured bookmark file
    ///
    /// A missing file starts empty. An unreadable or corrupt file is an
    /// error so that a later save does not replace it.
    pub fn open(config: Config) -> Result<Self> {
        let persistence = config.persistence();
        let manager = BookmarkManager::new();

        let loaded = match persistence.load(&manager, &config.bookmark_file) {
            LoadOutcome::Loaded(report) => Some(report),
            LoadOutcome::NotFound(path) => {
                debug!("No bookmark file at {:?}, starting empty", path);
                None
            }
            LoadOutcome::Unreadable(e) | LoadOutcome::Malformed(e) => {
                bail!(
                    "{}\nA previous copy may exist at {}",
                    e,
                    config.backup_path().display()
                );
            }
        };

        Ok(Self {
            config,
            manager,
            persistence,
            loaded,
        })
    }

    /// Write the bookmark file
    pub fn save(&self) -> Result<()> {
        match self.persistence.save(&self.manager, &self.config.bookmark_file) {
            SaveOutcome::Saved { path, .. } => {
                debug!("Bookmarks written to {:?}", path);
                Ok(())
            }
            SaveOutcome::Skipped(e) => bail!("Bookmarks not saved: {}", e),
        }
    }

    /// Resolve a grouped bookmark by full id or unique prefix
    pub fn resolve_bookmark(&self, id: &str) -> Result<(String, BookmarkRef)> {
        let all = self.manager.all_bookmarks();
        let (group, entry) = resolve(id, "bookmark", &all, |(_, e)| e.id())?;
        Ok((group.clone(), entry.clone()))
    }

    /// Resolve a recent by full id or unique prefix
    pub fn resolve_recent(&self, id: &str) -> Result<BookmarkRef> {
        let recents = self.manager.recents();
        resolve(id, "recent", &recents, |e| e.id()).cloned()
    }

    /// Resolve a range by full id or unique prefix
    pub fn resolve_range(&self, id: &str) -> Result<RangeRef> {
        let ranges = self.manager.ranges();
        resolve(id, "range", &ranges, |r| r.id()).cloned()
    }
}

/// Find the single item whose id equals or starts with `id`
fn resolve<'a, T>(id: &str, kind: &str, items: &'a [T], id_of: impl Fn(&T) -> Uuid) -> Result<&'a T> {
    if let Ok(uuid) = Uuid::parse_str(id) {
        if let Some(item) = items.iter().find(|i| id_of(*i) == uuid) {
            return Ok(item);
        }
        bail!("No {} found with id: {}", kind, id);
    }

    let matches: Vec<_> = items
        .iter()
        .filter(|i| id_of(*i).to_string().starts_with(id))
        .collect();

    match matches.len() {
        0 => bail!("No {} found matching: {}", kind, id),
        1 => Ok(matches[0]),
        n => bail!(
            "Ambiguous {} id '{}' matches {} entries. Please provide more characters.",
            kind,
            id,
            n
        ),
    }
}

/// Parse a frequency in Hz, accepting `k`, `M` and `G` suffixes
///
/// `121.5M`, `121500000` and `121.5MHz` all mean 121 500 000 Hz.
pub fn parse_frequency(input: &str) -> Result<i64, String> {
    let text = input.trim();
    let lower = text.to_ascii_lowercase();
    let lower = lower.strip_suffix("hz").unwrap_or(lower.as_str());

    let (number, scale) = match lower.chars().last() {
        Some('k') => (&lower[..lower.len() - 1], 1.0e3),
        Some('m') => (&lower[..lower.len() - 1], 1.0e6),
        Some('g') => (&lower[..lower.len() - 1], 1.0e9),
        _ => (lower, 1.0),
    };

    let value: f64 = number
        .trim()
        .parse()
        .map_err(|_| format!("invalid frequency: '{}'", input))?;
    if !value.is_finite() || value < 0.0 {
        return Err(format!("invalid frequency: '{}'", input));
    }

    Ok((value * scale).round() as i64)
}
