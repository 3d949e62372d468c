use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::utils;

/// Current configuration version
pub const CURRENT_CONFIG_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Folder holding the diary files and the tag/diary indexes
    #[serde(default = "default_data_folder")]
    pub data_folder: String,
    /// strftime format used to display entry timestamps
    #[serde(default = "default_datetime_format")]
    pub datetime_format: String,
    #[serde(default = "default_config_version")]
    pub config_version: Option<u32>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_folder: default_data_folder(),
            datetime_format: default_datetime_format(),
            config_version: Some(CURRENT_CONFIG_VERSION),
        }
    }
}

// Default value functions
fn default_data_folder() -> String {
    Config::default_data_folder_for_profile(utils::Profile::Prod)
}

fn default_datetime_format() -> String {
    utils::DEFAULT_DATETIME_FORMAT.to_string()
}

fn default_config_version() -> Option<u32> {
    Some(CURRENT_CONFIG_VERSION)
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config directory: {0}")]
    ConfigDirError(String),
    #[error("Failed to read config file: {0}")]
    ReadError(String),
    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Failed to write config file: {0}")]
    WriteError(String),
    #[error("Invalid datetime_format {0:?}: unknown strftime specifier")]
    InvalidDatetimeFormat(String),
}

impl Config {
    /// Load configuration from the profile's config file, or create it with
    /// defaults if missing
    pub fn load_with_profile(profile: utils::Profile) -> Result<Self, ConfigError> {
        let config_path = Self::get_config_path(profile)?;

        if config_path.exists() {
            Self::load_from_path(&config_path)
        } else {
            let mut config = Config::default();
            config.data_folder = Self::default_data_folder_for_profile(profile);
            if let Err(ref e) = config.save_to_path(&config_path) {
                warn!("Failed to save config file {}: {}", config_path.display(), e);
            }
            Ok(config)
        }
    }

    /// Load configuration from an explicit file. Unlike the profile lookup,
    /// a missing file here is an error.
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)
            .map_err(|e| ConfigError::ReadError(format!("{}: {}", path.display(), e)))?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        debug!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Reject settings that would only fail later, at display time
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !utils::is_valid_datetime_format(&self.datetime_format) {
            return Err(ConfigError::InvalidDatetimeFormat(self.datetime_format.clone()));
        }
        Ok(())
    }

    pub fn save_to_path(&mut self, path: &Path) -> Result<(), ConfigError> {
        // Ensure config version is set before saving
        self.config_version = Some(CURRENT_CONFIG_VERSION);

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| ConfigError::WriteError(e.to_string()))?;
        }

        let toml_string = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::WriteError(format!("Failed to serialize config: {}", e)))?;

        fs::write(path, toml_string)
            .map_err(|e| ConfigError::WriteError(e.to_string()))?;

        Ok(())
    }

    /// Get the path to the config file
    pub fn get_config_path(profile: utils::Profile) -> Result<PathBuf, ConfigError> {
        let config_dir = utils::get_config_dir(profile)
            .ok_or_else(|| ConfigError::ConfigDirError("Could not determine config directory".to_string()))?;
        Ok(config_dir.join("config.toml"))
    }

    /// Get default data folder for a specific profile
    fn default_data_folder_for_profile(profile: utils::Profile) -> String {
        if let Some(data_dir) = utils::get_data_dir(profile) {
            data_dir.to_string_lossy().to_string()
        } else {
            match profile {
                utils::Profile::Dev => "~/.local/share/diary-dev".to_string(),
                utils::Profile::Prod => "~/.local/share/diary".to_string(),
            }
        }
    }

    /// Get the expanded data folder path (with ~ expansion)
    pub fn get_data_path(&self) -> PathBuf {
        utils::expand_path(&self.data_folder)
    }
}
