//! Workspace settings stored in `settings.toml`

use serde::{Deserialize, Serialize};

use super::manager::ConfigError;
use crate::layout::DEFAULT_WORKSPACE_SIZES;
use crate::tracing::{TracingConfig, TracingLevel};
use crate::types::Side;

/// Logging section of the settings file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Log level name (`error`, `warn`, `info`, `debug`, `trace`).
    pub level: String,
    /// Custom filter directive overriding `level`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: TracingLevel::default().to_string(),
            filter: None,
        }
    }
}

/// Settings applied to every new workspace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkspaceSettings {
    /// Side the master panel is mounted on.
    pub side: Side,
    /// `[master, detail]` weights used when the master panel is mounted.
    pub default_sizes: [f64; 2],
    /// Logging setup.
    pub logging: LoggingSettings,
}

impl Default for WorkspaceSettings {
    fn default() -> Self {
        Self {
            side: Side::Left,
            default_sizes: DEFAULT_WORKSPACE_SIZES,
            logging: LoggingSettings::default(),
        }
    }
}

impl WorkspaceSettings {
    /// Checks value ranges.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for negative or non-finite sizes or
    /// an unknown log level.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(size) = self
            .default_sizes
            .iter()
            .find(|size| !size.is_finite() || **size < 0.0)
        {
            return Err(ConfigError::Invalid(format!(
                "default_sizes must be finite and non-negative, got {size}"
            )));
        }
        self.logging
            .level
            .parse::<TracingLevel>()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        Ok(())
    }

    /// Tracing configuration for the logging section.
    ///
    /// An unknown level falls back to the default.
    #[must_use]
    pub fn tracing_config(&self) -> TracingConfig {
        let level = self.logging.level.parse().unwrap_or_default();
        let config = TracingConfig::new().with_level(level);
        match &self.logging.filter {
            Some(filter) => config.with_filter(filter.clone()),
            None => config,
        }
    }
}
