//! Error types for the transport layer.
//!
//! The set of variants is closed: callers match on the five kinds below
//! instead of digging through raw `std::io::Error` values.

use std::fmt;
use std::time::Duration;

/// The transport operation an error came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Connect,
    Send,
    Receive,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Connect => write!(f, "connect"),
            Self::Send => write!(f, "send"),
            Self::Receive => write!(f, "receive"),
        }
    }
}

/// Errors that can occur in the transport layer.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// An operation that needs a live connection ran while unconnected.
    #[error("{op} failed: not connected")]
    NotConnected { op: Operation },

    /// `connect` was called on a transport that is already connected.
    #[error("connect failed: already connected")]
    AlreadyConnected,

    /// Address resolution or the connection attempt itself failed.
    #[error("connect to {addr} failed: {source}")]
    ConnectFailed {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// The configured time budget elapsed. The connection is still
    /// considered alive.
    #[error("{op} timed out after {}s", .after.as_secs_f64())]
    Timeout { op: Operation, after: Duration },

    /// The peer closed the connection or the socket failed mid-transfer.
    /// The transport is always unconnected after this.
    #[error("connection broken during {op}: {reason}")]
    ConnectionBroken { op: Operation, reason: String },
}

impl TransportError {
    /// Returns `true` if the error means the connection is gone.
    pub fn is_disconnect(&self) -> bool {
        matches!(self, Self::ConnectionBroken { .. } | Self::NotConnected { .. })
    }
}
