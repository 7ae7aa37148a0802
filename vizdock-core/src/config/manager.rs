//! Loading and saving `settings.toml`

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info, instrument};

use super::settings::WorkspaceSettings;

/// Name of the settings file inside the config directory.
pub const SETTINGS_FILE: &str = "settings.toml";

/// Environment variable overriding the config directory.
pub const CONFIG_DIR_ENV: &str = "VIZDOCK_CONFIG_DIR";

/// Errors raised while reading or writing configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No user config directory could be determined.
    #[error("Could not determine config directory")]
    NoConfigDir,

    /// Reading or writing the file failed.
    #[error("Config I/O error at {path}: {source}")]
    Io {
        /// File involved.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid TOML for the settings.
    #[error("Failed to parse config: {0}")]
    Parse(String),

    /// The settings could not be serialized.
    #[error("Failed to serialize config: {0}")]
    Serialize(String),

    /// A setting is out of range.
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Reads and writes the settings file of one config directory.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config_dir: PathBuf,
}

impl ConfigManager {
    /// Uses `$VIZDOCK_CONFIG_DIR` if set, else `<user config dir>/vizdock`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NoConfigDir`] if neither is available.
    pub fn new() -> ConfigResult<Self> {
        if let Some(dir) = std::env::var_os(CONFIG_DIR_ENV).filter(|dir| !dir.is_empty()) {
            return Ok(Self::with_config_dir(PathBuf::from(dir)));
        }
        let base = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(Self::with_config_dir(base.join("vizdock")))
    }

    /// Uses a custom config directory.
    #[must_use]
    pub const fn with_config_dir(config_dir: PathBuf) -> Self {
        Self { config_dir }
    }

    /// The config directory.
    #[must_use]
    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// Full path of the settings file.
    #[must_use]
    pub fn settings_path(&self) -> PathBuf {
        self.config_dir.join(SETTINGS_FILE)
    }

    /// Loads the settings; a missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read, parsed or
    /// validated.
    #[instrument(skip(self), fields(path = %self.settings_path().display()))]
    pub fn load_settings(&self) -> ConfigResult<WorkspaceSettings> {
        let path = self.settings_path();
        if !path.exists() {
            debug!("Settings file not found, using defaults");
            return Ok(WorkspaceSettings::default());
        }
        let content = fs::read_to_string(&path).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;
        let settings: WorkspaceSettings =
            toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Writes the settings, creating the config directory if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the settings are invalid or cannot be written.
    #[instrument(skip(self, settings), fields(path = %self.settings_path().display()))]
    pub fn save_settings(&self, settings: &WorkspaceSettings) -> ConfigResult<()> {
        settings.validate()?;
        fs::create_dir_all(&self.config_dir).map_err(|source| ConfigError::Io {
            path: self.config_dir.clone(),
            source,
        })?;
        let content =
            toml::to_string_pretty(settings).map_err(|e| ConfigError::Serialize(e.to_string()))?;
        let path = self.settings_path();
        fs::write(&path, content).map_err(|source| ConfigError::Io { path, source })?;
        info!("Settings saved");
        Ok(())
    }
}
