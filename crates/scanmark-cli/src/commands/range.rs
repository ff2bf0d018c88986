//! Range command handlers

use anyhow::{bail, Result};

use scanmark_core::{format_frequency, RangeEntry};

use super::Workspace;
use crate::output::Output;

/// Save a new range
pub fn add(
    ws: &Workspace,
    label: String,
    start: i64,
    end: i64,
    center: Option<i64>,
    output: &Output,
) -> Result<()> {
    if end < start {
        bail!(
            "Range end {} is below its start {}",
            format_frequency(end),
            format_frequency(start)
        );
    }

    let range = match center {
        Some(freq) => RangeEntry::new(label, freq, start, end),
        None => RangeEntry::centered(label, start, end),
    };
    let name = range.display_name();

    ws.manager.add_range(range.into_ref());
    ws.save()?;

    output.success(&format!("Added range: {}", name));
    Ok(())
}

/// List ranges by start frequency
pub fn list(ws: &Workspace, output: &Output) -> Result<()> {
    let ranges = ws.manager.ranges();
    let view: Vec<_> = ranges.iter().map(|r| r.as_ref()).collect();
    output.print_ranges(&view);
    Ok(())
}

/// Delete a range
pub fn delete(ws: &Workspace, id: String, output: &Output) -> Result<()> {
    let range = ws.resolve_range(&id)?;

    ws.manager.remove_range(&range);
    ws.save()?;

    output.success(&format!("Deleted range: {}", range.display_name()));
    Ok(())
}

/// Delete all ranges
pub fn clear(ws: &Workspace, output: &Output) -> Result<()> {
    let count = ws.manager.ranges().len();

    ws.manager.clear_ranges();
    ws.save()?;

    output.success(&format!("Cleared {} range(s)", count));
    Ok(())
}
