//! Error types for the configuration store.

use std::fmt;
use std::path::{Path, PathBuf};

/// Why a config file could not be read or written.
///
/// Mirrors the two situations a user fixes differently: the path is
/// wrong, or the path is right but permissions (or file type) are not.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileProblem {
    /// Nothing exists at the path (or its directory is missing).
    Missing,
    /// Something exists at the path but cannot be read or written.
    Inaccessible,
}

impl FileProblem {
    /// Classifies a failed access to `path`.
    pub(crate) fn classify(path: &Path) -> Self {
        if path.exists() {
            Self::Inaccessible
        } else {
            Self::Missing
        }
    }
}

impl fmt::Display for FileProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing => write!(f, "path not found, check the path and directory"),
            Self::Inaccessible => {
                write!(f, "path exists but is not accessible, check permissions")
            }
        }
    }
}

/// Errors that can occur while loading, saving, or editing a config.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Reading the config file failed.
    #[error("failed to load config from {}: {problem}", .path.display())]
    LoadFailed {
        path: PathBuf,
        problem: FileProblem,
        #[source]
        source: std::io::Error,
    },

    /// Writing the config file failed.
    #[error("failed to save config to {}: {problem}", .path.display())]
    SaveFailed {
        path: PathBuf,
        problem: FileProblem,
        #[source]
        source: std::io::Error,
    },

    /// The file was read but is not valid config TOML.
    #[error("malformed config in {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// The config could not be rendered as TOML.
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// A dotted key that names no setting.
    #[error("unknown config key: {0}")]
    UnknownKey(String),

    /// A value that does not parse for its key.
    #[error("invalid value {value:?} for {key}: {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },

    /// A setting required to connect is empty.
    #[error("missing required value: {0}")]
    MissingValue(&'static str),
}
