//! Persistent default settings.
//!
//! Values here fill in for CLI flags the user did not pass. The file lives
//! in the XDG config directory and is entirely optional.

use crate::error::{ConfigError, ConfigResult};
use crate::scan::{DEFAULT_CONCURRENCY, DEFAULT_TIMEOUT_MS};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing::debug;

/// User-adjustable defaults, stored as JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// Default number of simultaneous probes.
    pub concurrency: usize,
    /// Default per-port timeout in milliseconds.
    pub timeout_ms: u64,
    /// Default output format ("plain", "json", or "csv").
    pub output: String,
    /// Grab banners unless told otherwise.
    pub banner: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            output: "plain".to_string(),
            banner: false,
        }
    }
}

impl AppSettings {
    /// Location of the settings file (~/.config/coracle/settings.json on
    /// Linux), when the platform has a config directory at all.
    pub fn path() -> Option<PathBuf> {
        ProjectDirs::from("io", "coracle", "coracle")
            .map(|dirs| dirs.config_dir().join("settings.json"))
    }

    /// Load settings from the default location.
    ///
    /// A missing file is not an error; a malformed one is.
    pub fn load() -> ConfigResult<Self> {
        let Some(path) = Self::path() else {
            return Err(ConfigError::DirectoryNotFound);
        };
        if !path.exists() {
            debug!(?path, "no settings file, using built-in defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path).map_err(|e| ConfigError::ReadFailed {
            path: path.clone(),
            reason: e.to_string(),
        })?;

        serde_json::from_str(&content).map_err(|e| ConfigError::InvalidFormat(e.to_string()))
    }
}
