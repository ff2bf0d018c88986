//! Status command handler

use anyhow::Result;

use super::Workspace;
use crate::output::{Output, OutputFormat};

/// Show where bookmarks live and how many there are
pub fn show(ws: &Workspace, output: &Output) -> Result<()> {
    let path = ws.config.bookmarks_path();
    let backup = ws.config.backup_path();
    let groups = ws.manager.groups().len();
    let bookmarks = ws.manager.bookmark_count();
    let recents = ws.manager.recents().len();
    let ranges = ws.manager.ranges().len();
    let skipped = ws.loaded.map(|r| r.skipped).unwrap_or(0);

    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "bookmark_file": path,
                    "file_exists": ws.loaded.is_some(),
                    "backup_file": backup,
                    "backup_exists": backup.exists(),
                    "counts": {
                        "groups": groups,
                        "bookmarks": bookmarks,
                        "recents": recents,
                        "ranges": ranges,
                        "skipped": skipped
                    }
                })
            );
        }
        OutputFormat::Quiet => {
            println!("{}", path.display());
        }
        OutputFormat::Human => {
            println!("Scanmark Status");
            println!("===============");
            println!();
            println!("Files:");
            println!(
                "  Bookmarks: {}{}",
                path.display(),
                if ws.loaded.is_some() { "" } else { " (not created yet)" }
            );
            println!(
                "  Backup:    {}{}",
                backup.display(),
                if backup.exists() { "" } else { " (none)" }
            );
            println!();
            println!("Contents:");
            println!("  Groups:    {}", groups);
            println!("  Bookmarks: {}", bookmarks);
            println!("  Recents:   {}", recents);
            println!("  Ranges:    {}", ranges);
            if skipped > 0 {
                println!();
                println!("{} incomplete entry(ies) were skipped on load.", skipped);
            }
        }
    }

    Ok(())
}
