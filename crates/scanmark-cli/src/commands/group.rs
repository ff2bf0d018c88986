//! Group command handlers

use anyhow::{bail, Result};

use super::Workspace;
use crate::output::Output;
use crate::prompt;

/// List all groups
pub fn list(ws: &Workspace, output: &Output) -> Result<()> {
    let groups: Vec<_> = ws
        .manager
        .groups()
        .into_iter()
        .map(|name| {
            let count = ws.manager.bookmarks(&name).len();
            let expanded = ws.manager.expand_state(&name);
            (name, count, expanded)
        })
        .collect();

    output.print_groups(&groups);
    Ok(())
}

/// Create an empty group
pub fn add(ws: &Workspace, name: String, output: &Output) -> Result<()> {
    if ws.manager.add_group(&name) {
        ws.save()?;
        output.success(&format!("Created group: {}", name));
    } else {
        output.message(&format!("Group already exists: {}", name));
    }
    Ok(())
}

/// Delete a group and its bookmarks
///
/// In human mode a non-empty group needs `force` or a confirmation typed at
/// a terminal. JSON and quiet modes never prompt.
pub fn delete(ws: &Workspace, name: String, force: bool, output: &Output) -> Result<()> {
    if !ws.manager.has_group(&name) {
        bail!("No such group: {}", name);
    }

    let count = ws.manager.bookmarks(&name).len();
    if count > 0 && !force && output.should_prompt() {
        if !prompt::is_interactive() {
            bail!(
                "Group '{}' holds {} bookmark(s). Use --force to delete it.",
                name,
                count
            );
        }
        println!("Group '{}' holds {} bookmark(s).", name, count);
        if !prompt::confirm("Delete it and all its bookmarks?")? {
            println!("Cancelled.");
            return Ok(());
        }
    }

    ws.manager.remove_group(&name);
    ws.save()?;

    output.success(&format!("Deleted group: {}", name));
    Ok(())
}

/// Rename a group, merging into the target if it exists
pub fn rename(ws: &Workspace, old: String, new: String, output: &Output) -> Result<()> {
    if old == new {
        output.message("Names are the same, nothing to do.");
        return Ok(());
    }
    if !ws.manager.has_group(&old) {
        bail!("No such group: {}", old);
    }

    let merging = ws.manager.has_group(&new);
    ws.manager.rename_group(&old, &new);
    ws.save()?;

    if merging {
        output.success(&format!("Merged {} into {}", old, new));
    } else {
        output.success(&format!("Renamed {} to {}", old, new));
    }
    Ok(())
}

/// Set whether a group is shown expanded
pub fn set_expanded(ws: &Workspace, name: String, expanded: bool, output: &Output) -> Result<()> {
    if !ws.manager.has_group(&name) {
        bail!("No such group: {}", name);
    }

    ws.manager.set_expand_state(&name, expanded);
    ws.save()?;

    let state = if expanded { "expanded" } else { "collapsed" };
    output.success(&format!("{} is now {}", name, state));
    Ok(())
}
