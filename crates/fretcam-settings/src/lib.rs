//! FretCAM Settings Crate
//!
//! Loads, validates and saves the timing engine configuration.

pub mod config;
pub mod error;

pub use config::{
    config_dir, default_config_path, ensure_config_dir, Config, ConfigFormat, LoggingSettings, APP_DIR_NAME,
    CONFIG_FILE_NAME,
};
pub use error::{ConfigError, ConfigResult, SettingsError, SettingsResult};
