//! Config command handlers

use std::path::PathBuf;

use anyhow::{Context, Result};

use scanmark_core::Config;

use crate::output::{Output, OutputFormat};

/// Load configuration from the CLI path or the default location
pub fn load(config_path: Option<&PathBuf>) -> Result<Config> {
    match config_path {
        Some(path) => Config::load_from_path(path),
        None => Config::load(),
    }
    .context("Failed to load configuration")
}

/// Show current configuration
pub fn show(config_path: Option<&PathBuf>, output: &Output) -> Result<()> {
    let config = load(config_path)?;

    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "config_dir": config.config_dir,
                    "bookmark_file": config.bookmark_file,
                    "log_level": config.log_level,
                    "bookmarks_path": config.bookmarks_path()
                })
            );
        }
        OutputFormat::Quiet => {
            println!("{}", config.bookmarks_path().display());
        }
        OutputFormat::Human => {
            let effective_path = config_path
                .cloned()
                .unwrap_or_else(Config::config_file_path);
            println!("Configuration:");
            println!("  config_dir:    {}", config.config_dir.display());
            println!("  bookmark_file: {}", config.bookmark_file);
            println!("  log_level:     {}", config.log_level);
            println!();
            println!("Config file: {}", effective_path.display());
        }
    }

    Ok(())
}

/// Set a configuration value
pub fn set(
    key: String,
    value: String,
    config_path: Option<&PathBuf>,
    output: &Output,
) -> Result<()> {
    let mut config = load(config_path)?;
    config.set(&key, &value)?;

    let save_path = config_path
        .cloned()
        .unwrap_or_else(Config::config_file_path);
    config
        .save_to_path(&save_path)
        .context("Failed to save configuration")?;

    output.success(&format!("Set {} = {}", key, value));

    Ok(())
}
