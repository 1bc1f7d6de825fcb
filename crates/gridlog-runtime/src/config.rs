#![forbid(unsafe_code)]

//! Session configuration.
//!
//! Gathers the history limits, macro defaults, and logging settings into a
//! single [`SessionConfig`] that can be loaded from TOML or JSON.
//!
//! ```toml
//! # gridlog.toml
//! [history]
//! max_depth = 200
//!
//! [macros]
//! default_mode = "absolute"
//! tag_replayed_actions = false
//!
//! [logging]
//! filter = "gridlog_runtime=debug"
//! format = "json"
//! ```
//!
//! ```rust,ignore
//! let config = SessionConfig::from_toml_file("gridlog.toml")?.validated()?;
//! ```
//!
//! Missing sections and fields fall back to their defaults.

#[cfg(feature = "config-file")]
use std::path::Path;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use gridlog_core::LoggingConfig;

use crate::history::HistoryConfig;
use crate::macros::ReferenceMode;

/// Largest accepted `history.max_depth`.
pub const MAX_HISTORY_DEPTH: usize = 1_000_000;

// ---------------------------------------------------------------------------
// SessionConfig
// ---------------------------------------------------------------------------

/// Everything an [`EditSession`](crate::session::EditSession) can be tuned
/// with.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SessionConfig {
    pub history: HistoryConfig,
    pub macros: MacroConfig,
    pub logging: LoggingConfig,
}

/// Macro recording and replay defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MacroConfig {
    /// Mode used when a recording does not ask for one.
    pub default_mode: ReferenceMode,
    /// Tag replayed actions with `macro:<name>`.
    pub tag_replayed_actions: bool,
}

impl Default for MacroConfig {
    fn default() -> Self {
        Self {
            default_mode: ReferenceMode::Relative,
            tag_replayed_actions: true,
        }
    }
}

impl SessionConfig {
    /// Load from a TOML string.
    #[cfg(feature = "config-file")]
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(ConfigError::Toml)
    }

    /// Load from a TOML file on disk.
    #[cfg(feature = "config-file")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    #[cfg(feature = "config-file")]
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(s).map_err(ConfigError::Json)
    }

    /// Load from a JSON file on disk.
    #[cfg(feature = "config-file")]
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_json_str(&content)
    }

    /// Check every field. An empty list means the config is usable.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.history.max_depth > MAX_HISTORY_DEPTH {
            errors.push(format!(
                "history.max_depth must be at most {MAX_HISTORY_DEPTH}, got {}",
                self.history.max_depth
            ));
        }

        let filter = self.logging.filter.trim();
        if filter.is_empty() {
            errors.push("logging.filter must not be empty".to_string());
        } else if filter.split(',').any(|d| d.trim().is_empty()) {
            errors.push(format!(
                "logging.filter has an empty directive: '{}'",
                self.logging.filter
            ));
        }

        errors
    }

    /// `self` if [`validate`](Self::validate) finds nothing.
    pub fn validated(self) -> Result<Self, ConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::Validation(errors))
        }
    }
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Errors raised while loading a session configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[source] std::io::Error),
    #[cfg(feature = "config-file")]
    #[error("TOML parse error: {0}")]
    Toml(#[source] toml::de::Error),
    #[cfg(feature = "config-file")]
    #[error("JSON parse error: {0}")]
    Json(#[source] serde_json::Error),
    #[error("validation errors: {}", .0.join("; "))]
    Validation(Vec<String>),
}
