//! Bookmark command handlers

use anyhow::Result;

use scanmark_core::BookmarkEntry;

use super::Workspace;
use crate::output::Output;

/// Group used when `bookmark add` is given none
pub const DEFAULT_GROUP: &str = "Ungrouped";

/// Fields for a new bookmark or recent, as given on the command line
pub struct NewEntry {
    pub frequency: i64,
    pub mod_type: String,
    pub bandwidth: i64,
    pub label: Option<String>,
}

impl NewEntry {
    pub fn build(self) -> BookmarkEntry {
        BookmarkEntry::new(
            self.frequency,
            self.bandwidth,
            self.mod_type,
            self.label.unwrap_or_default(),
        )
    }
}

/// Add a bookmark to a group
pub fn add(ws: &Workspace, entry: NewEntry, group: Option<String>, output: &Output) -> Result<()> {
    let group = group.unwrap_or_else(|| DEFAULT_GROUP.to_string());
    let entry = entry.build().into_ref();

    ws.manager.add_bookmark(&group, entry.clone());
    ws.save()?;

    output.success(&format!("Added {} to {}", entry.display_name(), group));
    output.print_entry(&entry);
    Ok(())
}

/// List bookmarks, optionally limited to one group
pub fn list(ws: &Workspace, group: Option<String>, output: &Output) -> Result<()> {
    let groups = match group {
        Some(g) => {
            if !ws.manager.has_group(&g) {
                anyhow::bail!("No such group: {}", g);
            }
            vec![g]
        }
        None => ws.manager.groups(),
    };

    let mut rows = Vec::new();
    for name in groups {
        for entry in ws.manager.bookmarks(&name) {
            rows.push((name.clone(), entry));
        }
    }

    let view: Vec<_> = rows.iter().map(|(g, e)| (g.clone(), e.as_ref())).collect();
    output.print_bookmarks(&view);
    Ok(())
}

/// Show a single bookmark
pub fn show(ws: &Workspace, id: String, output: &Output) -> Result<()> {
    let (group, entry) = ws.resolve_bookmark(&id)?;
    output.print_entry(&entry);
    output.message(&format!("Group:     {}", group));
    Ok(())
}

/// Move a bookmark into another group
pub fn move_to(ws: &Workspace, id: String, group: String, output: &Output) -> Result<()> {
    let (from, entry) = ws.resolve_bookmark(&id)?;

    if ws.manager.move_bookmark(&entry, &group) {
        ws.save()?;
        output.success(&format!("Moved {} from {} to {}", entry.display_name(), from, group));
    } else {
        output.message(&format!("{} is already in {}", entry.display_name(), group));
    }
    Ok(())
}

/// Change a bookmark's label; an empty label clears it
pub fn label(ws: &Workspace, id: String, label: String, output: &Output) -> Result<()> {
    let (_, entry) = ws.resolve_bookmark(&id)?;

    ws.manager.relabel_bookmark(&entry, &label);
    ws.save()?;

    output.success(&format!("Renamed bookmark to {}", entry.display_name()));
    Ok(())
}

/// Delete a bookmark
pub fn delete(ws: &Workspace, id: String, output: &Output) -> Result<()> {
    let (group, entry) = ws.resolve_bookmark(&id)?;

    ws.manager.remove_bookmark_from(&group, &entry);
    ws.save()?;

    output.success(&format!("Deleted {} from {}", entry.display_name(), group));
    Ok(())
}
