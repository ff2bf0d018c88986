//! Output formatting for CLI
//!
//! Provides consistent output formatting across all commands:
//! - Human-readable default output
//! - JSON output (--json flag)
//! - Quiet mode for scripting (--quiet flag)

use serde_json::json;

use scanmark_core::{format_frequency, BookmarkEntry, RangeEntry};

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    Human,
    /// JSON output
    Json,
    /// Quiet mode - minimal output
    Quiet,
}

impl OutputFormat {
    /// Create format from CLI flags
    pub fn from_flags(json: bool, quiet: bool) -> Self {
        if quiet {
            OutputFormat::Quiet
        } else if json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }
}

/// Output helper for consistent formatting
pub struct Output {
    /// The output format
    pub format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Check if output is in quiet mode
    pub fn is_quiet(&self) -> bool {
        matches!(self.format, OutputFormat::Quiet)
    }

    /// Print bookmarks, each with the group it belongs to
    pub fn print_bookmarks(&self, bookmarks: &[(String, &BookmarkEntry)]) {
        match self.format {
            OutputFormat::Human => {
                if bookmarks.is_empty() {
                    println!("No bookmarks found.");
                    return;
                }
                for (group, entry) in bookmarks {
                    let state = entry.snapshot();
                    println!(
                        "{} | {:>14} | {:<5} | {:>8} | {} | {}",
                        short_id(&entry.id()),
                        format_frequency(state.frequency),
                        state.mod_type,
                        format_frequency(state.bandwidth),
                        truncate(group, 16),
                        truncate(&state.display_name(), 40)
                    );
                }
                println!("\n{} bookmark(s)", bookmarks.len());
            }
            OutputFormat::Json => {
                let items: Vec<_> = bookmarks
                    .iter()
                    .map(|(group, entry)| {
                        let mut value = entry_json(entry);
                        value["group"] = json!(group);
                        value
                    })
                    .collect();
                print_json(&json!(items));
            }
            OutputFormat::Quiet => {
                for (_, entry) in bookmarks {
                    println!("{}", entry.id());
                }
            }
        }
    }

    /// Print a single bookmark or recent
    pub fn print_entry(&self, entry: &BookmarkEntry) {
        match self.format {
            OutputFormat::Human => {
                let state = entry.snapshot();
                println!("ID:        {}", entry.id());
                println!("Name:      {}", state.display_name());
                println!("Frequency: {} ({} Hz)", format_frequency(state.frequency), state.frequency);
                println!("Mode:      {}", state.mod_type);
                println!("Bandwidth: {}", format_frequency(state.bandwidth));
            }
            OutputFormat::Json => print_json(&entry_json(entry)),
            OutputFormat::Quiet => println!("{}", entry.id()),
        }
    }

    /// Print recents, oldest first
    pub fn print_recents(&self, recents: &[&BookmarkEntry]) {
        match self.format {
            OutputFormat::Human => {
                if recents.is_empty() {
                    println!("No recent tunings.");
                    return;
                }
                for entry in recents {
                    let state = entry.snapshot();
                    println!(
                        "{} | {:>14} | {:<5} | {}",
                        short_id(&entry.id()),
                        format_frequency(state.frequency),
                        state.mod_type,
                        truncate(&state.display_name(), 40)
                    );
                }
                println!("\n{} recent(s)", recents.len());
            }
            OutputFormat::Json => {
                let items: Vec<_> = recents.iter().map(|e| entry_json(e)).collect();
                print_json(&json!(items));
            }
            OutputFormat::Quiet => {
                for entry in recents {
                    println!("{}", entry.id());
                }
            }
        }
    }

    /// Print groups with entry counts and expand state
    pub fn print_groups(&self, groups: &[(String, usize, bool)]) {
        match self.format {
            OutputFormat::Human => {
                if groups.is_empty() {
                    println!("No groups found.");
                    return;
                }
                for (name, count, expanded) in groups {
                    let marker = if *expanded { "▾" } else { "▸" };
                    println!("{} {} ({})", marker, name, count);
                }
                println!("\n{} group(s)", groups.len());
            }
            OutputFormat::Json => {
                let items: Vec<_> = groups
                    .iter()
                    .map(|(name, count, expanded)| {
                        json!({"name": name, "count": count, "expanded": expanded})
                    })
                    .collect();
                print_json(&json!(items));
            }
            OutputFormat::Quiet => {
                for (name, _, _) in groups {
                    println!("{}", name);
                }
            }
        }
    }

    /// Print ranges in start-frequency order
    pub fn print_ranges(&self, ranges: &[&RangeEntry]) {
        match self.format {
            OutputFormat::Human => {
                if ranges.is_empty() {
                    println!("No ranges found.");
                    return;
                }
                for range in ranges {
                    println!(
                        "{} | {:>14} - {:<14} | center {:>14} | {}",
                        short_id(&range.id()),
                        format_frequency(range.start_freq),
                        format_frequency(range.end_freq),
                        format_frequency(range.freq),
                        truncate(&range.display_name(), 30)
                    );
                }
                println!("\n{} range(s)", ranges.len());
            }
            OutputFormat::Json => {
                print_json(&json!(ranges));
            }
            OutputFormat::Quiet => {
                for range in ranges {
                    println!("{}", range.id());
                }
            }
        }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        match self.format {
            OutputFormat::Human => println!("✓ {}", message),
            OutputFormat::Json => {
                println!("{}", json!({"status": "success", "message": message}));
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Check if we should prompt for confirmation
    pub fn should_prompt(&self) -> bool {
        self.format == OutputFormat::Human
    }

    /// Print an informational message
    pub fn message(&self, msg: &str) {
        match self.format {
            OutputFormat::Human => println!("{}", msg),
            OutputFormat::Json => {
                println!("{}", json!({"message": msg}));
            }
            OutputFormat::Quiet => {}
        }
    }
}

/// JSON view of an entry
fn entry_json(entry: &BookmarkEntry) -> serde_json::Value {
    let state = entry.snapshot();
    json!({
        "id": entry.id(),
        "frequency": state.frequency,
        "bandwidth": state.bandwidth,
        "type": state.mod_type,
        "label": state.label,
        "display_name": state.display_name(),
    })
}

fn print_json(value: &serde_json::Value) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{}", text),
        Err(e) => eprintln!("Failed to render JSON: {}", e),
    }
}

/// First eight characters of an id
fn short_id(id: &uuid::Uuid) -> String {
    id.to_string()[..8].to_string()
}

/// Truncate a string to max length, adding "..." if truncated
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len - 3).collect();
        format!("{}...", kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_flags() {
        assert_eq!(OutputFormat::from_flags(false, false), OutputFormat::Human);
        assert_eq!(OutputFormat::from_flags(true, false), OutputFormat::Json);
        assert_eq!(OutputFormat::from_flags(false, true), OutputFormat::Quiet);
        // Quiet takes precedence
        assert_eq!(OutputFormat::from_flags(true, true), OutputFormat::Quiet);
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("this is a long string", 10), "this is...");
        assert_eq!(truncate("Flughafen München Tower", 12), "Flughafen...");
    }

    #[test]
    fn test_entry_json() {
        let entry = BookmarkEntry::new(121_500_000, 6000, "AM", "");
        let value = entry_json(&entry);

        assert_eq!(value["frequency"], 121_500_000);
        assert_eq!(value["type"], "AM");
        assert_eq!(value["display_name"], "121.5MHz AM");
        assert_eq!(value["id"], entry.id().to_string());
    }

    #[test]
    fn test_short_id() {
        let id = uuid::Uuid::new_v4();
        assert_eq!(short_id(&id).len(), 8);
        assert!(id.to_string().starts_with(&short_id(&id)));
    }
}
