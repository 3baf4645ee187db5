//! Error types for layered configuration loading

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for a configuration load
///
/// Every variant names the phase that failed and carries the original cause.
/// A failed load aborts as a whole; the target may already have been touched.
#[derive(Error, Debug)]
pub enum LoadError {
    /// A candidate path could not be probed for reasons other than absence
    #[error("failed to probe config path {}: {source}", path.display())]
    DiscoveryIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The resolved configuration file could not be read
    #[error("failed to read config content from {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file content is malformed or does not fit the target shape
    #[error("failed to unmarshal config file {} to struct: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: Box<figment::Error>,
    },

    /// An environment binding is malformed or its value cannot be converted
    #[error("failed to process environment variable {var} for `{key}`: {reason}")]
    EnvBind {
        var: String,
        key: String,
        reason: String,
    },

    /// The environment overlay could not be merged into the target shape
    #[error("failed to merge environment config: {source}")]
    Merge {
        #[source]
        source: Box<figment::Error>,
    },
}

/// Phase of a load in which an error occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadPhase {
    Discovery,
    Read,
    Parse,
    EnvBind,
    Merge,
}

impl LoadError {
    /// The phase that produced this error
    pub fn phase(&self) -> LoadPhase {
        match self {
            LoadError::DiscoveryIo { .. } => LoadPhase::Discovery,
            LoadError::Read { .. } => LoadPhase::Read,
            LoadError::Parse { .. } => LoadPhase::Parse,
            LoadError::EnvBind { .. } => LoadPhase::EnvBind,
            LoadError::Merge { .. } => LoadPhase::Merge,
        }
    }

    /// Build an [`LoadError::EnvBind`] for `var` bound to `key`
    pub fn env_bind(
        var: impl Into<String>,
        key: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        LoadError::EnvBind {
            var: var.into(),
            key: key.into(),
            reason: reason.into(),
        }
    }
}

/// Result type alias for configuration loading
pub type Result<T> = std::result::Result<T, LoadError>;
