//! Error types for coracle.
//!
//! Uses `thiserror` for ergonomic error definitions. Per-port transport
//! failures deliberately have no variant here: the prober folds them into
//! a closed result instead of propagating them.

use std::path::PathBuf;
use thiserror::Error;

/// Target resolution failure.
///
/// This is the only error that aborts a scan; it is raised before any
/// port work starts.
#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("failed to resolve '{host}': {reason}")]
    Lookup { host: String, reason: String },

    #[error("no addresses found for '{host}'")]
    NoAddresses { host: String },
}

/// Settings file trouble.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not determine a config directory for this platform")]
    DirectoryNotFound,

    #[error("failed to read settings file {path}: {reason}")]
    ReadFailed { path: PathBuf, reason: String },

    #[error("invalid settings file: {0}")]
    InvalidFormat(String),
}

/// Result type alias for resolution.
pub type ResolveResult<T> = Result<T, ResolveError>;

/// Result type alias for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;
