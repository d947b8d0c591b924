//! Logging setup and severity-tagged status output.
//!
//! All crates log through `tracing`. This module installs the process-wide
//! subscriber: `RUST_LOG` wins when set, otherwise the level is `debug` or
//! `info` depending on [`LogSettings::debug`].

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::IrcsockError;

/// How the subscriber should behave.
#[derive(Debug, Clone, Default)]
pub struct LogSettings {
    /// Let debug-level events through.
    pub debug: bool,
    /// Append to this file instead of writing to stderr.
    pub log_file: Option<PathBuf>,
}

/// Installs the global subscriber. Call once, early in `main`.
///
/// # Errors
/// [`IrcsockError::LogFile`] if the log file cannot be opened,
/// [`IrcsockError::Logging`] if a subscriber is already installed.
pub fn init(settings: &LogSettings) -> Result<(), IrcsockError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| settings.default_filter());
    install(settings, filter)
}

impl LogSettings {
    fn default_filter(&self) -> EnvFilter {
        EnvFilter::new(if self.debug { "debug" } else { "info" })
    }
}

fn install(
    settings: &LogSettings,
    filter: EnvFilter,
) -> Result<(), IrcsockError> {
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    let installed = match &settings.log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|source| IrcsockError::LogFile {
                    path: path.clone(),
                    source,
                })?;
            builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
        }
        None => builder.with_writer(std::io::stderr).try_init(),
    };
    installed.map_err(|e| IrcsockError::Logging(e.to_string()))
}

/// Message severity for [`emit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Debug,
    Info,
    Warn,
    Error,
    /// Logged at error level; the caller is about to give up.
    Fatal,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Debug => write!(f, "DEBUG"),
            Self::Info => write!(f, "INFO"),
            Self::Warn => write!(f, "WARN"),
            Self::Error => write!(f, "ERROR"),
            Self::Fatal => write!(f, "FATAL"),
        }
    }
}

/// Logs a status line at the level matching `severity`.
pub fn emit(severity: Severity, message: &str) {
    match severity {
        Severity::Debug => tracing::debug!("{message}"),
        Severity::Info => tracing::info!("{message}"),
        Severity::Warn => tracing::warn!("{message}"),
        Severity::Error => tracing::error!("{message}"),
        Severity::Fatal => tracing::error!(fatal = true, "{message}"),
    }
}
