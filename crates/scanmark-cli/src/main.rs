//! Scanmark CLI
//!
//! Command-line interface for scanmark - radio scanner bookmarks.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod output;
mod prompt;

use commands::bookmark::NewEntry;
use commands::{parse_frequency, Workspace};
use output::{Output, OutputFormat};

#[derive(Parser)]
#[command(name = "scanmark")]
#[command(about = "Scanmark - bookmarks, recents and ranges for a radio scanner")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage bookmarks
    Bookmark {
        #[command(subcommand)]
        command: BookmarkCommands,
    },
    /// Manage bookmark groups
    Group {
        #[command(subcommand)]
        command: GroupCommands,
    },
    /// Manage recent tunings
    Recent {
        #[command(subcommand)]
        command: RecentCommands,
    },
    /// Manage frequency ranges
    Range {
        #[command(subcommand)]
        command: RangeCommands,
    },
    /// Show file locations and counts
    Status,
    /// Show or set configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

/// Tuning fields shared by `bookmark add` and `recent add`
#[derive(clap::Args)]
struct TuningArgs {
    /// Frequency (Hz, or with k/M/G suffix)
    #[arg(value_parser = parse_frequency)]
    frequency: i64,
    /// Demodulation type (FM, NBFM, AM, USB, ...)
    #[arg(short = 't', long = "type")]
    mod_type: String,
    /// Bandwidth (Hz, or with k/M/G suffix)
    #[arg(short, long, default_value = "10k", value_parser = parse_frequency)]
    bandwidth: i64,
    /// Label shown instead of the frequency
    #[arg(short, long)]
    label: Option<String>,
}

impl From<TuningArgs> for NewEntry {
    fn from(args: TuningArgs) -> Self {
        NewEntry {
            frequency: args.frequency,
            mod_type: args.mod_type,
            bandwidth: args.bandwidth,
            label: args.label,
        }
    }
}

#[derive(Subcommand)]
enum BookmarkCommands {
    /// Bookmark a tuning
    #[command(alias = "create")]
    Add {
        #[command(flatten)]
        tuning: TuningArgs,
        /// Group to add it to
        #[arg(short, long)]
        group: Option<String>,
    },
    /// List bookmarks
    #[command(alias = "ls")]
    List {
        /// Only this group
        #[arg(short, long)]
        group: Option<String>,
    },
    /// Show bookmark details
    Show {
        /// Bookmark ID (full UUID or prefix)
        id: String,
    },
    /// Move a bookmark to another group
    #[command(alias = "mv")]
    Move {
        /// Bookmark ID (full UUID or prefix)
        id: String,
        /// Target group
        group: String,
    },
    /// Change a bookmark's label
    Label {
        /// Bookmark ID (full UUID or prefix)
        id: String,
        /// New label (empty clears it)
        label: String,
    },
    /// Delete a bookmark
    #[command(alias = "rm")]
    Delete {
        /// Bookmark ID (full UUID or prefix)
        id: String,
    },
}

#[derive(Subcommand)]
enum GroupCommands {
    /// List groups
    #[command(alias = "ls")]
    List,
    /// Create an empty group
    #[command(alias = "create")]
    Add { name: String },
    /// Delete a group and its bookmarks
    #[command(alias = "rm")]
    Delete {
        name: String,
        /// Skip confirmation for a non-empty group
        #[arg(short, long)]
        force: bool,
    },
    /// Rename a group (merges into an existing one)
    Rename { old: String, new: String },
    /// Show a group collapsed
    Collapse { name: String },
    /// Show a group expanded
    Expand { name: String },
}

#[derive(Subcommand)]
enum RecentCommands {
    /// List recent tunings
    #[command(alias = "ls")]
    List,
    /// Record a tuning
    Add {
        #[command(flatten)]
        tuning: TuningArgs,
    },
    /// Drop a recent
    #[command(alias = "rm")]
    Delete {
        /// Recent ID (full UUID or prefix)
        id: String,
    },
    /// Drop all recents
    Clear,
}

#[derive(Subcommand)]
enum RangeCommands {
    /// Save a frequency range
    #[command(alias = "create")]
    Add {
        label: String,
        /// Start frequency
        #[arg(value_parser = parse_frequency)]
        start: i64,
        /// End frequency
        #[arg(value_parser = parse_frequency)]
        end: i64,
        /// Frequency to tune when the range is opened (defaults to the middle)
        #[arg(short, long, value_parser = parse_frequency)]
        center: Option<i64>,
    },
    /// List ranges
    #[command(alias = "ls")]
    List,
    /// Delete a range
    #[command(alias = "rm")]
    Delete {
        /// Range ID (full UUID or prefix)
        id: String,
    },
    /// Delete all ranges
    Clear,
}

#[derive(Subcommand, Clone)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (config_dir, bookmark_file, log_level)
        key: String,
        /// Configuration value
        value: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let output = Output::new(OutputFormat::from_flags(cli.json, cli.quiet));

    // Config commands work on the file directly
    if let Commands::Config { command } = &cli.command {
        return handle_config_command(command.clone(), cli.config.as_ref(), &output);
    }

    let config = commands::config::load(cli.config.as_ref())?;
    init_logging(&config.log_level, output.format);

    let ws = Workspace::open(config)?;

    match cli.command {
        Commands::Bookmark { command } => handle_bookmark_command(command, &ws, &output),
        Commands::Group { command } => handle_group_command(command, &ws, &output),
        Commands::Recent { command } => handle_recent_command(command, &ws, &output),
        Commands::Range { command } => handle_range_command(command, &ws, &output),
        Commands::Status => commands::status::show(&ws, &output),
        Commands::Config { .. } => unreachable!(), // Handled above
    }
}

/// Log to stderr, filtered by RUST_LOG or the configured level
fn init_logging(level: &str, format: OutputFormat) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("scanmark_core={},scanmark_cli={}", level, level))
    });

    // Ignore error if already initialized
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_ansi(format == OutputFormat::Human)
        .with_writer(std::io::stderr)
        .try_init();
}

fn handle_bookmark_command(command: BookmarkCommands, ws: &Workspace, output: &Output) -> Result<()> {
    match command {
        BookmarkCommands::Add { tuning, group } => {
            commands::bookmark::add(ws, tuning.into(), group, output)
        }
        BookmarkCommands::List { group } => commands::bookmark::list(ws, group, output),
        BookmarkCommands::Show { id } => commands::bookmark::show(ws, id, output),
        BookmarkCommands::Move { id, group } => commands::bookmark::move_to(ws, id, group, output),
        BookmarkCommands::Label { id, label } => commands::bookmark::label(ws, id, label, output),
        BookmarkCommands::Delete { id } => commands::bookmark::delete(ws, id, output),
    }
}

fn handle_group_command(command: GroupCommands, ws: &Workspace, output: &Output) -> Result<()> {
    match command {
        GroupCommands::List => commands::group::list(ws, output),
        GroupCommands::Add { name } => commands::group::add(ws, name, output),
        GroupCommands::Delete { name, force } => {
            commands::group::delete(ws, name, force, output)
        }
        GroupCommands::Rename { old, new } => commands::group::rename(ws, old, new, output),
        GroupCommands::Collapse { name } => commands::group::set_expanded(ws, name, false, output),
        GroupCommands::Expand { name } => commands::group::set_expanded(ws, name, true, output),
    }
}

fn handle_recent_command(command: RecentCommands, ws: &Workspace, output: &Output) -> Result<()> {
    match command {
        RecentCommands::List => commands::recent::list(ws, output),
        RecentCommands::Add { tuning } => commands::recent::add(ws, tuning.into(), output),
        RecentCommands::Delete { id } => commands::recent::delete(ws, id, output),
        RecentCommands::Clear => commands::recent::clear(ws, output),
    }
}

fn handle_range_command(command: RangeCommands, ws: &Workspace, output: &Output) -> Result<()> {
    match command {
        RangeCommands::Add {
            label,
            start,
            end,
            center,
        } => commands::range::add(ws, label, start, end, center, output),
        RangeCommands::List => commands::range::list(ws, output),
        RangeCommands::Delete { id } => commands::range::delete(ws, id, output),
        RangeCommands::Clear => commands::range::clear(ws, output),
    }
}

fn handle_config_command(
    command: Option<ConfigCommands>,
    config_path: Option<&PathBuf>,
    output: &Output,
) -> Result<()> {
    match command {
        Some(ConfigCommands::Show) | None => commands::config::show(config_path, output),
        Some(ConfigCommands::Set { key, value }) => {
            commands::config::set(key, value, config_path, output)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_bookmark_add() {
        let cli = Cli::try_parse_from([
            "scanmark", "bookmark", "add", "121.5M", "--type", "AM", "--group", "Air",
        ])
        .unwrap();
        match cli.command {
            Commands::Bookmark {
                command: BookmarkCommands::Add { tuning, group },
            } => {
                assert_eq!(tuning.frequency, 121_500_000);
                assert_eq!(tuning.mod_type, "AM");
                assert_eq!(tuning.bandwidth, 10_000);
                assert_eq!(group.as_deref(), Some("Air"));
            }
            _ => panic!("expected bookmark add"),
        }
    }

    #[test]
    fn test_parse_range_add() {
        let cli = Cli::try_parse_from(["scanmark", "--json", "range", "add", "FM", "88M", "108M"])
            .unwrap();
        assert!(cli.json);
        match cli.command {
            Commands::Range {
                command:
                    RangeCommands::Add {
                        label,
                        start,
                        end,
                        center,
                    },
            } => {
                assert_eq!(label, "FM");
                assert_eq!(start, 88_000_000);
                assert_eq!(end, 108_000_000);
                assert_eq!(center, None);
            }
            _ => panic!("expected range add"),
        }
    }

    #[test]
    fn test_parse_group_rm_force() {
        let cli = Cli::try_parse_from(["scanmark", "group", "rm", "Air", "--force"]).unwrap();
        match cli.command {
            Commands::Group {
                command: GroupCommands::Delete { name, force },
            } => {
                assert_eq!(name, "Air");
                assert!(force);
            }
            _ => panic!("expected group rm"),
        }

        let cli = Cli::try_parse_from(["scanmark", "group", "rm", "Air"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Group {
                command: GroupCommands::Delete { force: false, .. }
            }
        ));
    }

    #[test]
    fn test_bad_frequency_rejected() {
        assert!(Cli::try_parse_from(["scanmark", "recent", "add", "abc", "-t", "FM"]).is_err());
    }
}
