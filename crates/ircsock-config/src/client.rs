//! The client configuration and its on-disk form.
//!
//! Stored as TOML with three upper-case sections:
//!
//! ```toml
//! [IDENTITY]
//! nickname = "bob"
//! username = "bob"
//! realname = "Bob"
//! nickserv_password = ""
//!
//! [CONNECTION]
//! server_address = "irc.libera.chat"
//! server_port = 6667
//! server_password = ""
//! auto_reconnect = true
//! enable_logging = true
//! autojoin_channels = ["#rust"]
//!
//! [PATHS]
//! config_file = "config.toml"
//! log_file = "server.log"
//! ```
//!
//! Missing sections or keys fall back to their defaults.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{ConfigError, FileProblem};

/// Default IRC plaintext port.
pub const DEFAULT_PORT: u16 = 6667;
pub const DEFAULT_CONFIG_FILE: &str = "config.toml";
pub const DEFAULT_LOG_FILE: &str = "server.log";

/// Every key accepted by [`ClientConfig::get`] and [`ClientConfig::set`].
pub const KEYS: &[&str] = &[
    "identity.nickname",
    "identity.username",
    "identity.realname",
    "identity.nickserv_password",
    "connection.server_address",
    "connection.server_port",
    "connection.server_password",
    "connection.auto_reconnect",
    "connection.enable_logging",
    "connection.autojoin_channels",
    "paths.config_file",
    "paths.log_file",
];

const MASK: &str = "********";

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

/// Who the client says it is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdentityConfig {
    pub nickname: String,
    pub username: String,
    pub realname: String,
    /// Sent to NickServ after registration when non-empty.
    pub nickserv_password: String,
}

/// Where and how to connect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionConfig {
    pub server_address: String,
    pub server_port: u16,
    /// Sent as `PASS` before registering when non-empty.
    pub server_password: String,
    pub auto_reconnect: bool,
    pub enable_logging: bool,
    pub autojoin_channels: Vec<String>,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            server_address: String::new(),
            server_port: DEFAULT_PORT,
            server_password: String::new(),
            auto_reconnect: true,
            enable_logging: true,
            autojoin_channels: Vec::new(),
        }
    }
}

/// File locations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub config_file: PathBuf,
    pub log_file: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            config_file: PathBuf::from(DEFAULT_CONFIG_FILE),
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
        }
    }
}

// ---------------------------------------------------------------------------
// ClientConfig
// ---------------------------------------------------------------------------

/// Everything the client needs to know before it connects.
///
/// The transport never reads this; the caller pulls host, port and
/// identity out of it and drives the transport.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(rename = "IDENTITY", default)]
    pub identity: IdentityConfig,

    #[serde(rename = "CONNECTION", default)]
    pub connection: ConnectionConfig,

    #[serde(rename = "PATHS", default)]
    pub paths: PathsConfig,
}

/// What [`ClientConfig::load_or_create`] found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The file existed and was loaded.
    Loaded(ClientConfig),
    /// The file was missing; a default one was written in its place.
    Created(ClientConfig),
}

impl LoadOutcome {
    pub fn into_config(self) -> ClientConfig {
        match self {
            Self::Loaded(config) | Self::Created(config) => config,
        }
    }
}

impl ClientConfig {
    /// Reads a config from `path`.
    ///
    /// # Errors
    /// - [`ConfigError::LoadFailed`] with [`FileProblem::Missing`] if
    ///   nothing exists at `path`, or [`FileProblem::Inaccessible`] if it
    ///   exists but cannot be read.
    /// - [`ConfigError::Parse`] if the contents are not valid config TOML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| {
            ConfigError::LoadFailed {
                path: path.to_path_buf(),
                problem: FileProblem::classify(path),
                source,
            }
        })?;

        let config = toml::from_str(&contents).map_err(|source| {
            ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            }
        })?;

        tracing::info!(path = %path.display(), "loaded client configuration");
        Ok(config)
    }

    /// Writes this config to `path`, replacing any existing file.
    ///
    /// # Errors
    /// [`ConfigError::SaveFailed`] with [`FileProblem::Inaccessible`] if
    /// the file exists but cannot be written, or [`FileProblem::Missing`]
    /// if it does not exist and cannot be created.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents).map_err(|source| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            problem: FileProblem::classify(path),
            source,
        })?;

        tracing::info!(path = %path.display(), "saved client configuration");
        Ok(())
    }

    /// Loads `path`, or writes a default config there on first run.
    ///
    /// The created config records `path` as its `config_file`.
    ///
    /// # Errors
    /// Anything [`load`](Self::load) reports other than a missing file, and
    /// anything [`save`](Self::save) reports while creating it.
    pub fn load_or_create(
        path: impl AsRef<Path>,
    ) -> Result<LoadOutcome, ConfigError> {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(config) => Ok(LoadOutcome::Loaded(config)),
            Err(ConfigError::LoadFailed {
                problem: FileProblem::Missing,
                ..
            }) => {
                tracing::warn!(
                    path = %path.display(),
                    "config file not found, creating a new one"
                );
                let mut config = Self::default();
                config.paths.config_file = path.to_path_buf();
                config.save(path)?;
                Ok(LoadOutcome::Created(config))
            }
            Err(e) => Err(e),
        }
    }

    /// Checks that the values needed to connect and register are present.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.connection.server_address.trim().is_empty() {
            return Err(ConfigError::MissingValue("connection.server_address"));
        }
        if self.identity.nickname.trim().is_empty() {
            return Err(ConfigError::MissingValue("identity.nickname"));
        }
        Ok(())
    }

    /// The username to register with, falling back to the nickname.
    pub fn username(&self) -> &str {
        non_empty_or(&self.identity.username, &self.identity.nickname)
    }

    /// The real name to register with, falling back to the nickname.
    pub fn realname(&self) -> &str {
        non_empty_or(&self.identity.realname, &self.identity.nickname)
    }

    /// Looks up a setting by dotted key (`section.key`, section
    /// case-insensitive). Passwords come back masked when set.
    ///
    /// Returns `None` for unknown keys.
    pub fn get(&self, key: &str) -> Option<String> {
        let (section, name) = split_key(key)?;
        let value = match (section.as_str(), name) {
            ("identity", "nickname") => self.identity.nickname.clone(),
            ("identity", "username") => self.identity.username.clone(),
            ("identity", "realname") => self.identity.realname.clone(),
            ("identity", "nickserv_password") => {
                mask(&self.identity.nickserv_password)
            }
            ("connection", "server_address") => {
                self.connection.server_address.clone()
            }
            ("connection", "server_port") => {
                self.connection.server_port.to_string()
            }
            ("connection", "server_password") => {
                mask(&self.connection.server_password)
            }
            ("connection", "auto_reconnect") => {
                self.connection.auto_reconnect.to_string()
            }
            ("connection", "enable_logging") => {
                self.connection.enable_logging.to_string()
            }
            ("connection", "autojoin_channels") => {
                self.connection.autojoin_channels.join(",")
            }
            ("paths", "config_file") => {
                self.paths.config_file.display().to_string()
            }
            ("paths", "log_file") => self.paths.log_file.display().to_string(),
            _ => return None,
        };
        Some(value)
    }

    /// Updates a setting by dotted key.
    ///
    /// Channel lists are comma-separated; booleans accept `true`/`false`
    /// in any case.
    ///
    /// # Errors
    /// [`ConfigError::UnknownKey`] or [`ConfigError::InvalidValue`].
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let (section, name) = split_key(key).ok_or_else(unknown)?;
        match (section.as_str(), name) {
            ("identity", "nickname") => self.identity.nickname = value.into(),
            ("identity", "username") => self.identity.username = value.into(),
            ("identity", "realname") => self.identity.realname = value.into(),
            ("identity", "nickserv_password") => {
                self.identity.nickserv_password = value.into()
            }
            ("connection", "server_address") => {
                self.connection.server_address = value.into()
            }
            ("connection", "server_port") => {
                self.connection.server_port = value
                    .trim()
                    .parse::<u16>()
                    .map_err(|e| invalid(key, value, e.to_string()))?
            }
            ("connection", "server_password") => {
                self.connection.server_password = value.into()
            }
            ("connection", "auto_reconnect") => {
                self.connection.auto_reconnect = parse_bool(key, value)?
            }
            ("connection", "enable_logging") => {
                self.connection.enable_logging = parse_bool(key, value)?
            }
            ("connection", "autojoin_channels") => {
                self.connection.autojoin_channels = value
                    .split(',')
                    .map(str::trim)
                    .filter(|c| !c.is_empty())
                    .map(str::to_owned)
                    .collect()
            }
            ("paths", "config_file") => self.paths.config_file = value.into(),
            ("paths", "log_file") => self.paths.log_file = value.into(),
            _ => return Err(unknown()),
        }
        Ok(())
    }
}

fn split_key(key: &str) -> Option<(String, &str)> {
    let (section, name) = key.split_once('.')?;
    Some((section.to_ascii_lowercase(), name))
}

fn non_empty_or<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.trim().is_empty() { fallback } else { value }
}

fn mask(secret: &str) -> String {
    if secret.is_empty() {
        String::new()
    } else {
        MASK.to_string()
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(invalid(key, value, "expected true or false".into())),
    }
}

fn invalid(key: &str, value: &str, reason: String) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
        reason,
    }
}
