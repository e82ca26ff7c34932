//! Configuration for shawn.
//!
//! The configuration file lives at `~/.shawn/config.toml`. Every section is
//! optional. A missing file means defaults; a malformed one is reported by
//! [`Config::load`] so the caller can log it and fall back.
//!
//! ```toml
//! [input]
//! # Raw-mode read timeout in deciseconds (terminal VTIME)
//! read_timeout_ds = 1
//!
//! [display]
//! # Show the welcome banner while the document is empty
//! welcome = true
//!
//! [log]
//! # tracing filter, overridden by RUST_LOG
//! level = "info"
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Name of the per-user directory holding the config and log files
const APP_DIR: &str = ".shawn";

/// Main configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Terminal input settings
    pub input: InputConfig,
    /// Screen drawing settings
    pub display: DisplayConfig,
    /// Log settings
    pub log: LogConfig,
}

/// Terminal input configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Any integer is accepted here; see [`InputConfig::read_timeout`]
    pub read_timeout_ds: i64,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self { read_timeout_ds: 1 }
    }
}

impl InputConfig {
    /// Read timeout handed to the terminal, clamped into `1..=255`. Zero
    /// would make reads spin; VTIME holds a single byte.
    pub fn read_timeout(&self) -> u8 {
        self.read_timeout_ds.clamp(1, u8::MAX as i64) as u8
    }
}

/// Display configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub welcome: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self { welcome: true }
    }
}

/// Log configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from file. No home directory or no file gives the
    /// defaults.
    pub fn load() -> Result<Self, ConfigError> {
        match Self::get_config_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Load configuration from `path`
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Get config file path
    fn get_config_path() -> Option<PathBuf> {
        app_dir().map(|dir| dir.join("config.toml"))
    }

    /// Get log file path, creating the directory if needed
    pub fn get_log_path() -> Option<PathBuf> {
        let dir = app_dir()?;
        if !dir.exists() {
            let _ = fs::create_dir_all(&dir);
        }
        Some(dir.join("shawn.log"))
    }
}

fn app_dir() -> Option<PathBuf> {
    home_dir().map(|home| home.join(APP_DIR))
}

// Get home directory
fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(PathBuf::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.input.read_timeout(), 1);
        assert!(config.display.welcome);
        assert_eq!(config.log.level, "info");
    }

    #[test]
    fn test_partial_config() {
        let config = Config::parse(
            r#"
            [input]
            read_timeout_ds = 3

            [log]
            level = "debug"
            "#,
        )
        .unwrap();

        assert_eq!(config.input.read_timeout(), 3);
        assert!(config.display.welcome);
        assert_eq!(config.log.level, "debug");
    }

    #[test]
    fn test_zero_timeout_is_raised() {
        let config = Config::parse("[input]\nread_timeout_ds = 0\n").unwrap();
        assert_eq!(config.input.read_timeout(), 1);
    }

    #[test]
    fn test_out_of_range_timeout_is_clamped() {
        let config = Config::parse(
            "[display]\nwelcome = false\n[log]\nlevel = \"debug\"\n[input]\nread_timeout_ds = 300\n",
        )
        .unwrap();
        assert_eq!(config.input.read_timeout(), 255);
        assert!(!config.display.welcome);
        assert_eq!(config.log.level, "debug");

        let config = Config::parse("[input]\nread_timeout_ds = -4\n").unwrap();
        assert_eq!(config.input.read_timeout(), 1);
    }

    #[test]
    fn test_malformed_config_is_error() {
        assert!(Config::parse("[input]\nread_timeout_ds = \"soon\"\n").is_err());
    }

    #[test]
    fn test_load_from_reports_failures() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::Read { .. })
        ));

        fs::write(&path, "[display]\nwelcome = \"maybe\"\n").unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::Parse { .. })
        ));

        fs::write(&path, "[input]\nread_timeout_ds = 7\n").unwrap();
        assert_eq!(Config::load_from(&path).unwrap().input.read_timeout(), 7);
    }
}
