//! Persistent storage infrastructure.
//!
//! Currently holds only the TOML configuration file.

pub mod config;

pub use config::{
    load_config, load_config_from, save_config_to, ChannelConfig, ConfigError, HandlerConfig,
    HostConfig, LoggingConfig,
};
