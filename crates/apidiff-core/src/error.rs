//! Error handling for the apidiff comparison library.
//!
//! This module defines the main error type `Error` used throughout the library,
//! along with a convenient `Result` type alias. Only caller-level failures are
//! represented here: too few or too many sources, a source that cannot be read,
//! and configuration problems. Anomalies in individual traffic entries are
//! absorbed by the engine and never surface as an `Error`.
//!
//! # Examples
//!
//! ```
//! use apidiff_core::error::{Error, Result};
//!
//! fn check(count: usize) -> Result<()> {
//!     if count < 2 {
//!         return Err(Error::InputCardinality { supplied: count, min: 2, max: 3 });
//!     }
//!     Ok(())
//! }
//!
//! let err = check(1).unwrap_err();
//! assert!(err.to_response().error.contains("at least 2"));
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type for apidiff operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for apidiff operations
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// TOML serialization error
    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Fewer than `min` or more than `max` sources were supplied
    #[error("Expected at least {min} and at most {max} sources to compare, got {supplied}")]
    InputCardinality {
        supplied: usize,
        min: usize,
        max: usize,
    },

    /// Two sources share the same label
    #[error("Duplicate source label: {0}")]
    DuplicateSource(String),

    /// A source could not be read at all
    #[error("Source {path} is unreadable: {reason}")]
    SourceUnreadable { path: String, reason: String },

    /// A source uses an encoding the ingestion layer does not handle
    #[error("Unsupported capture format: {0}")]
    UnsupportedFormat(String),
}

impl Error {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new unreadable-source error
    pub fn unreadable<P: Into<String>, S: ToString>(path: P, reason: S) -> Self {
        Self::SourceUnreadable {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Convert into the structured `{ "error": ... }` value handed to callers.
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            error: self.to_string(),
        }
    }
}

/// Structured error value returned across the engine boundary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_response_shape() {
        let err = Error::unreadable("a.chlsj", "File not found");
        let value = serde_json::to_value(err.to_response()).unwrap();
        assert_eq!(
            value,
            serde_json::json!({ "error": "Source a.chlsj is unreadable: File not found" })
        );
    }

    #[test]
    fn test_config_helper() {
        let err = Error::config(format!("max_sources must be at least {}", 2));
        assert!(matches!(&err, Error::Config(msg) if msg == "max_sources must be at least 2"));
        assert_eq!(err.to_string(), "Configuration error: max_sources must be at least 2");
    }

    #[test]
    fn test_cardinality_message() {
        let err = Error::InputCardinality {
            supplied: 4,
            min: 2,
            max: 3,
        };
        assert_eq!(
            err.to_string(),
            "Expected at least 2 and at most 3 sources to compare, got 4"
        );
    }
}
