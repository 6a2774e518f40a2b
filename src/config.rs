use crate::ai_sql::AiSqlConfig;
use dirs::home_dir;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not determine the home directory")]
    NoConfigDir,

    #[error("config file I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("could not serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Trace => write!(f, "trace"),
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Error => write!(f, "error"),
        }
    }
}

/// Settings stored in `~/.config/dbscribe/config.toml`
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Config {
    /// SQLite file holding the generated tables
    #[serde(default = "default_database_path")]
    pub database_path: String,
    #[serde(default)]
    pub log_level: LogLevel,
    #[serde(default = "default_show_banner")]
    pub show_banner: bool,
    /// Table questions target when none is chosen; the first table otherwise
    #[serde(default)]
    pub default_table: Option<String>,
    #[serde(default)]
    pub ai: AiSqlConfig,
}

fn default_database_path() -> String {
    "dynamic.db".to_string()
}

fn default_show_banner() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Config {
            database_path: default_database_path(),
            log_level: LogLevel::default(),
            show_banner: default_show_banner(),
            default_table: None,
            ai: AiSqlConfig::default(),
        }
    }
}

impl Config {
    /// Directory holding the config file, the log and the REPL history
    pub fn get_config_directory() -> Result<PathBuf, ConfigError> {
        let config_dir = home_dir()
            .map(|home| home.join(".config").join("dbscribe"))
            .ok_or(ConfigError::NoConfigDir)?;
        if !config_dir.exists() {
            fs::create_dir_all(&config_dir)?;
        }
        Ok(config_dir)
    }

    pub fn get_config_path() -> Result<PathBuf, ConfigError> {
        Ok(Self::get_config_directory()?.join("config.toml"))
    }

    /// Load the user's config file, falling back to defaults when it is
    /// unreadable. A missing file is created with the defaults.
    pub fn load() -> Self {
        match Self::get_config_path().and_then(|path| Self::load_from(&path)) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Warning: {e}. Using default configuration.");
                Config::default()
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            debug!("Config file {} not found, writing defaults", path.display());
            let config = Config::default();
            config.save_to(path)?;
            return Ok(config);
        }

        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn database_path(&self) -> PathBuf {
        PathBuf::from(&self.database_path)
    }
}
