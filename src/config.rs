use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::logging::LogConfig;
use crate::profile::Profile;
use crate::store::JsonFileStore;

/// Main application configuration
///
/// Every table is optional in the file; missing tables and keys take their
/// defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// User goals and alert thresholds
    pub profile: Profile,

    /// Where the dataset lives
    pub storage: StorageSettings,

    /// Logging output
    pub logging: LogConfig,
}

/// Dataset storage settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// Dataset file; the platform data directory is used when unset
    pub data_file: Option<PathBuf>,
}

impl StorageSettings {
    /// Configured data file, or the platform default
    pub fn resolved_data_file(&self) -> PathBuf {
        self.data_file
            .clone()
            .unwrap_or_else(JsonFileStore::default_path)
    }
}

/// Configuration management implementation
impl AppConfig {
    /// Load configuration from TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: AppConfig =
            toml::from_str(&content).with_context(|| "Failed to parse TOML configuration")?;

        config
            .profile
            .validate()
            .with_context(|| format!("Invalid profile in {}", path.as_ref().display()))?;

        Ok(config)
    }

    /// Save configuration to TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        // Create directory if it doesn't exist
        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml_content = toml::to_string_pretty(self)
            .with_context(|| "Failed to serialize configuration to TOML")?;

        fs::write(&path, toml_content)
            .with_context(|| format!("Failed to write config file: {}", path.as_ref().display()))?;

        Ok(())
    }

    /// Get default configuration file path
    pub fn default_config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".cuttracker")
            .join("config.toml")
    }

    /// Load configuration with fallback to defaults
    ///
    /// A missing file is not reported; an unreadable or invalid one is, since
    /// logging is not set up yet when this runs.
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let config_path = path
            .map(Path::to_path_buf)
            .unwrap_or_else(Self::default_config_path);

        if !config_path.exists() {
            return Self::default();
        }

        match Self::load_from_file(&config_path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!(
                    "Ignoring config file {}: {:#}. Using defaults.",
                    config_path.display(),
                    e
                );
                Self::default()
            }
        }
    }
}
