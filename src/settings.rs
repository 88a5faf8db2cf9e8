//! Configuration loading
//!
//! Layers, lowest priority first: embedded defaults, the per-user file,
//! `config/local.toml`, then `VNODECTL_*` environment variables.

use anyhow::{Context, Result};
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use vnodectl_core::NetutilConfig;

/// Embedded default configuration (compiled into binary)
pub const DEFAULT_CONFIG: &str = include_str!("../config/default.toml");

/// Environment variable naming the installation root
pub const INSTALL_ROOT_ENV: &str = "II_SYSTEM";

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub netutil: NetutilConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Log output settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: default_log_format(),
        }
    }
}

/// Per-user config file, e.g. `~/.config/vnodectl/config.toml`
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("vnodectl").join("config.toml"))
}

/// Load configuration from files and environment
pub fn load_config() -> Result<AppConfig> {
    let mut builder =
        Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

    if let Some(path) = user_config_path() {
        builder = builder.add_source(File::from(path).required(false));
    }

    let config = builder
        .add_source(File::with_name("config/local").required(false))
        .add_source(
            Environment::with_prefix("VNODECTL")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()
        .context("Failed to build configuration")?;

    let mut app: AppConfig = config
        .try_deserialize()
        .context("Failed to deserialize configuration")?;

    if app.netutil.install_root.is_none() {
        app.netutil.install_root = install_root_from_env();
    }
    Ok(app)
}

fn install_root_from_env() -> Option<PathBuf> {
    std::env::var_os(INSTALL_ROOT_ENV)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}
