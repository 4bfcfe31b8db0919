//! TOML-based configuration for the key-event channel.
//!
//! Reads `HandlerConfig` from the platform-appropriate config file:
//! - Windows:  `%APPDATA%\KeyEventChannel\config.toml`
//! - Linux:    `~/.config/keyeventchannel/config.toml`
//! - macOS:    `~/Library/Application Support/KeyEventChannel/config.toml`
//!
//! ```toml
//! [channel]
//! name = "keyevent"
//! max_pending_events = 1000
//!
//! [host]
//! key_state_backend = "win32"
//!
//! [logging]
//! level = "info"
//! ```
//!
//! Every field has a serde default, so a missing file, a missing section, or
//! a missing key all fall back to the values above.

use std::path::{Path, PathBuf};

use keyevent_core::protocol::messages::DEFAULT_CHANNEL_NAME;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::application::pending_events::DEFAULT_MAX_PENDING_EVENTS;
use crate::infrastructure::key_state::KeyStateBackend;

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The platform config directory could not be determined.
    #[error("could not determine platform config directory")]
    NoPlatformConfigDir,

    /// A file system I/O error occurred.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// The config could not be serialized to TOML.
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

// ── Config schema types ───────────────────────────────────────────────────────

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct HandlerConfig {
    #[serde(default)]
    pub channel: ChannelConfig,
    #[serde(default)]
    pub host: HostConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Channel name and pending-event ceiling.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChannelConfig {
    /// Channel the key-event records are sent on.
    #[serde(default = "default_channel_name")]
    pub name: String,
    /// Unanswered requests above which a warning is logged.
    #[serde(default = "default_max_pending_events")]
    pub max_pending_events: usize,
}

/// Host integration settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct HostConfig {
    /// Mechanism used to read live modifier state.
    #[serde(default)]
    pub key_state_backend: KeyStateBackend,
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// `tracing` level: `"error"`, `"warn"`, `"info"`, `"debug"`, `"trace"`.
    #[serde(default = "default_log_level")]
    pub level: String,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_channel_name() -> String {
    DEFAULT_CHANNEL_NAME.to_string()
}
fn default_max_pending_events() -> usize {
    DEFAULT_MAX_PENDING_EVENTS
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            name: default_channel_name(),
            max_pending_events: default_max_pending_events(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

// ── Config repository ─────────────────────────────────────────────────────────

/// Resolves the full path to the platform config file.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformConfigDir`] if the base directory cannot be
/// determined.
pub fn config_file_path() -> Result<PathBuf, ConfigError> {
    platform_config_dir()
        .map(|dir| dir.join("config.toml"))
        .ok_or(ConfigError::NoPlatformConfigDir)
}

/// Loads the config from the platform config file.
///
/// # Errors
///
/// See [`load_config_from`].
pub fn load_config() -> Result<HandlerConfig, ConfigError> {
    load_config_from(&config_file_path()?)
}

/// Loads the config from `path`, returning defaults if the file does not exist.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system errors other than "not found",
/// and [`ConfigError::Parse`] if the TOML is malformed.
pub fn load_config_from(path: &Path) -> Result<HandlerConfig, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(toml::from_str(&content)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(HandlerConfig::default()),
        Err(source) => Err(ConfigError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Writes `config` to `path`, creating parent directories as needed.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system failures or
/// [`ConfigError::Serialize`] if serialization fails.
pub fn save_config_to(config: &HandlerConfig, path: &Path) -> Result<(), ConfigError> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|source| ConfigError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
    }

    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Directory name under the per-user config root on Windows and macOS.
const APP_DIR_NAME: &str = "KeyEventChannel";
/// Directory name under `$XDG_CONFIG_HOME` elsewhere.
const XDG_DIR_NAME: &str = "keyevent-channel";

/// Per-user config directory: `%APPDATA%`, `~/Library/Application Support`,
/// or the XDG config home.
fn platform_config_dir() -> Option<PathBuf> {
    let env_dir = |var: &str| std::env::var_os(var).map(PathBuf::from);

    if cfg!(target_os = "windows") {
        env_dir("APPDATA").map(|dir| dir.join(APP_DIR_NAME))
    } else if cfg!(target_os = "macos") {
        env_dir("HOME").map(|home| home.join("Library/Application Support").join(APP_DIR_NAME))
    } else {
        env_dir("XDG_CONFIG_HOME")
            .or_else(|| env_dir("HOME").map(|home| home.join(".config")))
            .map(|dir| dir.join(XDG_DIR_NAME))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
