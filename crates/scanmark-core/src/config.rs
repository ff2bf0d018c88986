//! Application configuration
//!
//! Configuration is loaded from:
//! 1. Default values
//! 2. Config file (~/.config/scanmark/config.toml)
//! 3. Environment variables (SCANMARK_* prefix)
//!
//! Environment variables take precedence over config file values.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::persistence::BookmarkPersistence;

/// Environment variable prefix
const ENV_PREFIX: &str = "SCANMARK";

/// Default bookmark file name
pub const DEFAULT_BOOKMARK_FILE: &str = "bookmarks.json";

/// Default log level for the CLI
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding the bookmark file and its backup
    #[serde(default = "default_config_dir")]
    pub config_dir: PathBuf,

    /// Bookmark file name, resolved against `config_dir`
    #[serde(default = "default_bookmark_file")]
    pub bookmark_file: String,

    /// Log level used when no RUST_LOG is set
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            config_dir: default_config_dir(),
            bookmark_file: default_bookmark_file(),
            log_level: default_log_level(),
        }
    }
}

impl Config {
    /// Load configuration from default location and environment
    ///
    /// Order of precedence (highest to lowest):
    /// 1. Environment variables (SCANMARK_CONFIG_DIR, SCANMARK_BOOKMARK_FILE, SCANMARK_LOG_LEVEL)
    /// 2. Config file (~/.config/scanmark/config.toml or SCANMARK_CONFIG)
    /// 3. Default values
    pub fn load() -> Result<Self> {
        Self::load_from_path(&Self::config_file_path())
    }

    /// Load configuration from a specific path
    ///
    /// Environment variables are still applied as overrides.
    /// If the file doesn't exist, defaults are used.
    pub fn load_from_path(path: &PathBuf) -> Result<Self> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {:?}", path))?;
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?
        } else {
            Self::default()
        };

        config.apply_env_overrides();
        config.ensure_config_dir()?;
        Ok(config)
    }

    /// Load configuration from a TOML string (useful for testing)
    pub fn load_from_str(toml_content: &str) -> Result<Self> {
        let mut config: Config =
            toml::from_str(toml_content).context("Failed to parse config TOML")?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) {
        // SCANMARK_CONFIG_DIR
        if let Ok(val) = std::env::var(format!("{}_CONFIG_DIR", ENV_PREFIX)) {
            self.config_dir = PathBuf::from(val);
        }

        // SCANMARK_BOOKMARK_FILE
        if let Ok(val) = std::env::var(format!("{}_BOOKMARK_FILE", ENV_PREFIX)) {
            if !val.is_empty() {
                self.bookmark_file = val;
            }
        }

        // SCANMARK_LOG_LEVEL
        if let Ok(val) = std::env::var(format!("{}_LOG_LEVEL", ENV_PREFIX)) {
            if !val.is_empty() {
                self.log_level = val;
            }
        }
    }

    /// Ensure the config directory exists
    fn ensure_config_dir(&self) -> Result<()> {
        if !self.config_dir.exists() {
            std::fs::create_dir_all(&self.config_dir).with_context(|| {
                format!("Failed to create config directory: {:?}", self.config_dir)
            })?;
        }
        Ok(())
    }

    /// Save configuration to the default config file
    pub fn save(&self) -> Result<()> {
        self.save_to_path(&Self::config_file_path())
    }

    /// Save configuration to a specific file
    pub fn save_to_path(&self, config_path: &PathBuf) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(config_path, content)
            .with_context(|| format!("Failed to write config file: {:?}", config_path))?;
        Ok(())
    }

    /// Set a configuration value by key
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "config_dir" => self.config_dir = PathBuf::from(value),
            "bookmark_file" => {
                if value.is_empty() {
                    bail!("bookmark_file cannot be empty");
                }
                self.bookmark_file = value.to_string();
            }
            "log_level" => match value {
                "error" | "warn" | "info" | "debug" | "trace" => self.log_level = value.to_string(),
                _ => bail!("Invalid log level: {} (expected error, warn, info, debug or trace)", value),
            },
            _ => bail!(
                "Unknown config key: {}. Valid keys: config_dir, bookmark_file, log_level",
                key
            ),
        }
        Ok(())
    }

    /// Get the config file path
    ///
    /// Can be overridden with SCANMARK_CONFIG environment variable
    pub fn config_file_path() -> PathBuf {
        if let Ok(path) = std::env::var(format!("{}_CONFIG", ENV_PREFIX)) {
            return PathBuf::from(path);
        }

        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("scanmark")
            .join("config.toml")
    }

    /// Get the path to the bookmark file
    pub fn bookmarks_path(&self) -> PathBuf {
        self.config_dir.join(&self.bookmark_file)
    }

    /// Get the path to the bookmark backup file
    pub fn backup_path(&self) -> PathBuf {
        self.persistence().backup_path_for(&self.bookmark_file)
    }

    /// Persistence handler rooted at the config directory
    pub fn persistence(&self) -> BookmarkPersistence {
        BookmarkPersistence::new(self.config_dir.clone())
    }
}

/// Get the default config directory
fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("scanmark")
}

fn default_bookmark_file() -> String {
    DEFAULT_BOOKMARK_FILE.to_string()
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Mutex to serialize tests that touch environment variables
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    /// Guard that locks env access and saves/restores env vars
    struct EnvGuard<'a> {
        _lock: std::sync::MutexGuard<'a, ()>,
        saved: Vec<(String, Option<String>)>,
    }

    impl<'a> EnvGuard<'a> {
        fn new(vars: &[&str]) -> Self {
            let lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
            let saved = vars
                .iter()
                .map(|&name| (name.to_string(), env::var(name).ok()))
                .collect();
            for name in vars {
                env::remove_var(name);
            }
            Self { _lock: lock, saved }
        }
    }

    impl Drop for EnvGuard<'_> {
        fn drop(&mut self) {
            for (name, value) in &self.saved {
                match value {
                    Some(v) => env::set_var(name, v),
                    None => env::remove_var(name),
                }
            }
        }
    }

    const ENV_VARS: &[&str] = &[
        "SCANMARK_CONFIG_DIR",
        "SCANMARK_BOOKMARK_FILE",
        "SCANMARK_LOG_LEVEL",
    ];

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.bookmark_file, "bookmarks.json");
        assert_eq!(config.log_level, "warn");
        assert!(config.config_dir.ends_with("scanmark"));
    }

    #[test]
    fn test_file_paths() {
        let config = Config {
            config_dir: PathBuf::from("/cfg/scanmark"),
            ..Config::default()
        };

        assert_eq!(config.bookmarks_path(), PathBuf::from("/cfg/scanmark/bookmarks.json"));
        assert_eq!(
            config.backup_path(),
            PathBuf::from("/cfg/scanmark/bookmarks.json.backup")
        );
        assert_eq!(config.persistence().config_dir(), config.config_dir.as_path());
    }

    #[test]
    fn test_env_override_config_dir() {
        let _guard = EnvGuard::new(ENV_VARS);

        let mut config = Config::default();
        env::set_var("SCANMARK_CONFIG_DIR", "/tmp/scanmark-test");
        config.apply_env_overrides();

        assert_eq!(config.config_dir, PathBuf::from("/tmp/scanmark-test"));
    }

    #[test]
    fn test_env_override_bookmark_file() {
        let _guard = EnvGuard::new(ENV_VARS);

        let mut config = Config::default();
        env::set_var("SCANMARK_BOOKMARK_FILE", "scanner.json");
        config.apply_env_overrides();
        assert_eq!(config.bookmark_file, "scanner.json");

        // Empty string keeps the current value
        env::set_var("SCANMARK_BOOKMARK_FILE", "");
        config.apply_env_overrides();
        assert_eq!(config.bookmark_file, "scanner.json");
    }

    #[test]
    fn test_set_validates_keys() {
        let mut config = Config::default();

        config.set("log_level", "debug").unwrap();
        assert_eq!(config.log_level, "debug");
        assert!(config.set("log_level", "loud").is_err());
        assert!(config.set("bookmark_file", "").is_err());
        assert!(config.set("nonsense", "1").is_err());

        config.set("config_dir", "/elsewhere").unwrap();
        assert_eq!(config.config_dir, PathBuf::from("/elsewhere"));
    }

    #[test]
    fn test_serialization() {
        let config = Config {
            config_dir: PathBuf::from("/data/scanmark"),
            bookmark_file: "mine.json".to_string(),
            log_level: "info".to_string(),
        };

        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("config_dir"));
        assert!(toml_str.contains("bookmark_file"));

        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.config_dir, config.config_dir);
        assert_eq!(parsed.bookmark_file, config.bookmark_file);
        assert_eq!(parsed.log_level, config.log_level);
    }

    #[test]
    fn test_load_from_str() {
        let _guard = EnvGuard::new(ENV_VARS);

        let toml = r#"
            config_dir = "/custom/scanmark"
            bookmark_file = "air.json"
        "#;

        let config = Config::load_from_str(toml).unwrap();
        assert_eq!(config.config_dir, PathBuf::from("/custom/scanmark"));
        assert_eq!(config.bookmark_file, "air.json");
        assert_eq!(config.log_level, "warn");
    }

    #[test]
    fn test_save_to_path_round_trip() {
        let _guard = EnvGuard::new(ENV_VARS);
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("config.toml");

        let config = Config {
            config_dir: temp_dir.path().join("data"),
            bookmark_file: "saved.json".to_string(),
            log_level: "debug".to_string(),
        };
        config.save_to_path(&path).unwrap();

        let loaded = Config::load_from_path(&path).unwrap();
        assert_eq!(loaded.bookmark_file, "saved.json");
        assert_eq!(loaded.log_level, "debug");
        assert!(loaded.config_dir.is_dir());
    }

    #[test]
    fn test_load_from_path_missing_file() {
        let _guard = EnvGuard::new(ENV_VARS);
        let temp_dir = tempfile::TempDir::new().unwrap();
        env::set_var("SCANMARK_CONFIG_DIR", temp_dir.path().join("cfg"));

        let path = PathBuf::from("/nonexistent/config.toml");
        let config = Config::load_from_path(&path).unwrap();

        assert_eq!(config.bookmark_file, "bookmarks.json");
        assert!(config.config_dir.is_dir());
    }
}
