//! Recent command handlers

use anyhow::Result;

use scanmark_core::RECENTS_MAX;

use super::bookmark::NewEntry;
use super::Workspace;
use crate::output::Output;

/// List recents, oldest first
pub fn list(ws: &Workspace, output: &Output) -> Result<()> {
    let recents = ws.manager.recents();
    let view: Vec<_> = recents.iter().map(|e| e.as_ref()).collect();
    output.print_recents(&view);
    Ok(())
}

/// Record a tuning as recent
pub fn add(ws: &Workspace, entry: NewEntry, output: &Output) -> Result<()> {
    let entry = entry.build().into_ref();
    let before = ws.manager.recents().len();

    ws.manager.add_recent(entry.clone());
    ws.save()?;

    output.success(&format!("Recorded {}", entry.display_name()));
    if before >= RECENTS_MAX {
        output.message(&format!("Oldest recent dropped (limit {})", RECENTS_MAX));
    }
    Ok(())
}

/// Drop one recent
pub fn delete(ws: &Workspace, id: String, output: &Output) -> Result<()> {
    let entry = ws.resolve_recent(&id)?;

    ws.manager.remove_recent(&entry);
    ws.save()?;

    output.success(&format!("Removed recent: {}", entry.display_name()));
    Ok(())
}

/// Drop all recents
pub fn clear(ws: &Workspace, output: &Output) -> Result<()> {
    let count = ws.manager.recents().len();

    ws.manager.clear_recents();
    ws.save()?;

    output.success(&format!("Cleared {} recent(s)", count));
    Ok(())
}
