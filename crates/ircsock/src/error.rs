//! Unified error type for ircsock.

use std::path::PathBuf;

use ircsock_config::ConfigError;
use ircsock_transport::TransportError;

/// Top-level error that wraps all crate-specific errors.
///
/// `#[from]` on each wrapped variant lets `?` convert sub-crate errors
/// automatically.
#[derive(Debug, thiserror::Error)]
pub enum IrcsockError {
    /// A transport-level error (connect, send, receive).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A configuration error (load, save, bad value).
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The log file could not be opened for appending.
    #[error("failed to open log file {}: {source}", .path.display())]
    LogFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A global tracing subscriber was already installed.
    #[error("failed to install logger: {0}")]
    Logging(String),
}

impl IrcsockError {
    /// Returns `true` if reconnecting might fix this error.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::Transport(
                TransportError::ConnectionBroken { .. }
                    | TransportError::ConnectFailed { .. }
                    | TransportError::Timeout { .. }
            )
        )
    }
}
