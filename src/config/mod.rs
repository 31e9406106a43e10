//! Configuration for jsonprobe.
//!
//! Settings are loaded from a TOML file and merged with command-line
//! arguments; the command line wins. A missing or unreadable config file
//! silently falls back to the defaults.
//!
//! # Example
//!
//! ```
//! use jsonprobe::config::Config;
//!
//! let config = Config::default();
//! assert_eq!(config.max_suggestions, 10);
//!
//! let custom = Config {
//!     max_suggestions: 20,
//!     ..Config::default()
//! };
//! assert_eq!(custom.max_suggestions, 20);
//! ```

use serde::{Deserialize, Serialize};

/// Configurable settings for the interactive session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Maximum number of completion suggestions to show at once
    #[serde(default = "default_max_suggestions")]
    pub max_suggestions: usize,

    /// Maximum number of submitted queries to keep in session history
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
}

/// Returns the default suggestion list size.
fn default_max_suggestions() -> usize {
    10
}

/// Returns the default query history limit.
fn default_history_limit() -> usize {
    50
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_suggestions: default_max_suggestions(),
            history_limit: default_history_limit(),
        }
    }
}

impl Config {
    /// Returns the path to the config file.
    ///
    /// Uses `~/.config/jsonprobe/config.toml` on all platforms.
    pub fn config_path() -> Option<std::path::PathBuf> {
        dirs::home_dir().map(|mut path| {
            path.push(".config");
            path.push("jsonprobe");
            path.push("config.toml");
            path
        })
    }

    /// Loads configuration from the default config file.
    ///
    /// Returns the default configuration if the file doesn't exist or can't
    /// be read or parsed.
    pub fn load() -> Self {
        let config_path = match Self::config_path() {
            Some(path) => path,
            None => return Self::default(),
        };

        if !config_path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(&config_path) {
            Ok(contents) => toml::from_str(&contents).unwrap_or_else(|_| Self::default()),
            Err(_) => Self::default(),
        }
    }
}
