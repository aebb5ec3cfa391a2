//! Configuration loading and management for minutes.
//!
//! Loads settings from `minutes.toml` with environment variable overrides.
//! A missing file is not an error; every setting has a default.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("unknown output format: {0} (expected text, html or json)")]
    UnknownFormat(String),
}

/// How a report is rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    #[default]
    Text,
    Html,
    Json,
}

impl Format {
    /// File extension for saved reports
    pub fn extension(&self) -> &'static str {
        match self {
            Format::Text => "txt",
            Format::Html => "html",
            Format::Json => "json",
        }
    }
}

impl FromStr for Format {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text" => Ok(Format::Text),
            "html" => Ok(Format::Html),
            "json" => Ok(Format::Json),
            other => Err(ConfigError::UnknownFormat(other.to_string())),
        }
    }
}

/// Report content settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Meeting title shown in report headers
    pub title: String,
    /// Decisions listed in a report
    pub max_decisions: usize,
    /// Action items listed in a report
    pub max_actions: usize,
    /// Risk statements listed in a report
    pub max_risks: usize,
}

/// Output settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: Format,
    /// Colour terminal output
    pub color: bool,
}

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub report: ReportConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

impl Config {
    /// Load configuration from the default location (minutes.toml in cwd or home)
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match Self::find_config_file() {
            Some(path) => Self::load_from(&path)?,
            None => {
                log::debug!("no config file found, using defaults");
                Config::default()
            }
        };
        config.apply_env()?;
        Ok(config)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        log::debug!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Override settings from environment variables
    fn apply_env(&mut self) -> Result<(), ConfigError> {
        if let Ok(title) = std::env::var("MINUTES_TITLE") {
            self.report.title = title;
        }
        if let Ok(format) = std::env::var("MINUTES_FORMAT") {
            self.output.format = format.parse()?;
        }
        Ok(())
    }

    /// Find the config file in standard locations
    fn find_config_file() -> Option<PathBuf> {
        // Check current directory first
        let local_config = PathBuf::from("minutes.toml");
        if local_config.exists() {
            return Some(local_config);
        }

        // Check home directory
        let home_config = dirs::home_dir()?
            .join(".config")
            .join("minutes")
            .join("minutes.toml");
        home_config.exists().then_some(home_config)
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            title: "Executive Meeting".to_string(),
            max_decisions: 5,
            max_actions: 8,
            max_risks: 3,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: Format::Text,
            color: true,
        }
    }
}
