//! Persisted client configuration for ircsock.
//!
//! A [`ClientConfig`] holds the three sections a client needs before it
//! dials out: `IDENTITY` (who to register as), `CONNECTION` (where to
//! connect and how to behave), and `PATHS` (where files live). It is stored
//! as TOML and can be edited field by field or through dotted keys
//! ([`ClientConfig::get`] / [`ClientConfig::set`]).
//!
//! Load and save failures say whether the path was missing or merely
//! inaccessible ([`FileProblem`]), since the fix differs.

mod client;
mod error;

pub use client::{
    ClientConfig, ConnectionConfig, IdentityConfig, LoadOutcome, PathsConfig,
    DEFAULT_CONFIG_FILE, DEFAULT_LOG_FILE, DEFAULT_PORT, KEYS,
};
pub use error::{ConfigError, FileProblem};
