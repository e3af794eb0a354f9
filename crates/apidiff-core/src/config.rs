//! Configuration management for apidiff comparisons.
//!
//! This module defines the `Config` struct that controls how sources are
//! compared. The configuration can be loaded from a YAML or TOML file,
//! created programmatically, or discovered from standard locations, and
//! command-line flags can override individual fields afterwards.
//!
//! # Examples
//!
//! ```no_run
//! use apidiff_core::config::Config;
//! use apidiff_core::ComparisonLevel;
//!
//! # #[tokio::main]
//! # async fn main() -> apidiff_core::Result<()> {
//! // Create a new config programmatically
//! let mut config = Config::default();
//! config.comparison_level = ComparisonLevel::Comprehensive;
//!
//! // Or load from a config file
//! let config = Config::from_file("apidiff.yaml").await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Config Discovery
//!
//! [`Config::discover`] looks in the following locations:
//! 1. File named by the `APIDIFF_CONFIG` environment variable
//! 2. `./apidiff.yaml` in the current working directory
//! 3. `apidiff/config.yaml` in the user's configuration directory

// Internal imports (std, crate)
use std::path::{Path, PathBuf};

use crate::analysis::{CompareOptions, ComparisonLevel};
use crate::diff::{ArrayTailPolicy, Comparator, DEFAULT_MAX_VALUE_LEN};

// External imports (alphabetized)
use serde::{Deserialize, Serialize};
use tokio::fs;

/// Environment variable naming a config file.
pub const CONFIG_ENV_VAR: &str = "APIDIFF_CONFIG";

const LOCAL_CONFIG_FILE: &str = "apidiff.yaml";

/// Configuration for an apidiff comparison run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// How much of each exchange to diff
    #[serde(default)]
    pub comparison_level: ComparisonLevel,

    /// Maximum number of sources accepted in one run
    #[serde(default = "default_max_sources")]
    pub max_sources: usize,

    /// Maximum character length of values quoted in diff entries
    #[serde(default = "default_max_value_len")]
    pub max_value_len: usize,

    /// Whether strings holding JSON documents are decoded before comparison
    #[serde(default = "default_decode_embedded_json")]
    pub decode_embedded_json: bool,

    /// How the tail of the longer array is reported
    #[serde(default)]
    pub array_tail: ArrayTailPolicy,

    /// Directory reports are written to
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            comparison_level: ComparisonLevel::default(),
            max_sources: default_max_sources(),
            max_value_len: default_max_value_len(),
            decode_embedded_json: default_decode_embedded_json(),
            array_tail: ArrayTailPolicy::default(),
            output_dir: default_output_dir(),
        }
    }
}

impl Config {
    /// Load configuration from a file (TOML when the extension is `.toml`, YAML otherwise)
    pub async fn from_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).await?;
        let config = if is_toml(path) {
            toml::from_str(&content)?
        } else {
            serde_yaml::from_str(&content)?
        };
        Ok(config)
    }

    /// Save configuration to a file
    pub async fn save<P: AsRef<Path>>(&self, path: P) -> crate::Result<()> {
        let path = path.as_ref();
        let content = if is_toml(path) {
            toml::to_string(self)?
        } else {
            serde_yaml::to_string(self)?
        };
        fs::write(path, content).await?;
        Ok(())
    }

    /// Load the first config file found in the standard locations, or the defaults.
    pub async fn discover() -> crate::Result<Self> {
        match Self::find_config_file() {
            Some(path) => {
                log::debug!("Loading configuration from {}", path.display());
                Self::from_file(path).await
            }
            None => Ok(Self::default()),
        }
    }

    /// Find a config file by checking standard locations
    pub fn find_config_file() -> Option<PathBuf> {
        // 1. Check environment variable
        if let Ok(file) = std::env::var(CONFIG_ENV_VAR) {
            let path = PathBuf::from(file);
            if path.exists() {
                return Some(path);
            }
        }

        // 2. Check current directory
        let local = PathBuf::from(LOCAL_CONFIG_FILE);
        if local.exists() {
            return Some(local);
        }

        // 3. Check in the user's config directory
        if let Some(config_dir) = dirs::config_dir() {
            let path = config_dir.join("apidiff").join("config.yaml");
            if path.exists() {
                return Some(path);
            }
        }

        None
    }

    /// Check the settings for values the engine cannot work with.
    pub fn validate(&self) -> crate::Result<()> {
        if self.max_sources < crate::engine::MIN_SOURCES {
            return Err(crate::Error::config(format!(
                "max_sources must be at least {}, got {}",
                crate::engine::MIN_SOURCES,
                self.max_sources
            )));
        }
        if self.max_value_len == 0 {
            return Err(crate::Error::config("max_value_len must be positive"));
        }
        Ok(())
    }

    /// Comparator configured from these settings
    pub fn comparator(&self) -> Comparator {
        Comparator::new()
            .decode_embedded_json(self.decode_embedded_json)
            .max_value_len(self.max_value_len)
            .array_tail(self.array_tail)
    }

    /// Orchestrator options configured from these settings
    pub fn compare_options(&self) -> CompareOptions {
        CompareOptions::new(self.comparison_level, self.comparator())
    }
}

fn is_toml(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some("toml")
}

fn default_max_sources() -> usize {
    3
}

fn default_max_value_len() -> usize {
    DEFAULT_MAX_VALUE_LEN
}

fn default_decode_embedded_json() -> bool {
    true
}

fn default_output_dir() -> String {
    "./output".to_string()
}
