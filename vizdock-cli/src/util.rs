//! Shared utility functions used across command modules.

use std::path::Path;

use vizdock_core::config::{ConfigManager, WorkspaceSettings};
use vizdock_core::tracing::span_names;
use vizdock_core::{LayoutDocument, TracingConfig, TracingLevel, init_tracing};

use crate::error::CliError;

/// Creates a `ConfigManager` using the optional custom config directory
/// from CLI args.
pub fn create_config_manager(config_path: Option<&Path>) -> Result<ConfigManager, CliError> {
    match config_path {
        Some(path) => Ok(ConfigManager::with_config_dir(path.to_path_buf())),
        None => ConfigManager::new()
            .map_err(|e| CliError::Config(format!("Failed to initialize config: {e}"))),
    }
}

/// Loads `settings.toml`, falling back to defaults when it does not exist.
pub fn load_settings(config_path: Option<&Path>) -> Result<WorkspaceSettings, CliError> {
    let _span = vizdock_core::trace_operation!(span_names::CONFIG_LOAD).entered();
    let settings = create_config_manager(config_path)?.load_settings()?;
    Ok(settings)
}

/// Sets up logging to stderr.
///
/// `-q` keeps errors only and each `-v` raises the level from `warn`.
/// Without either flag the `[logging]` section of the settings file
/// applies.
pub fn init_logging(config_path: Option<&Path>, verbose: u8, quiet: bool) -> Result<(), CliError> {
    let config = if quiet {
        TracingConfig::new().with_level(TracingLevel::Error)
    } else if verbose > 0 {
        TracingConfig::new()
            .with_level(TracingLevel::from_verbosity(verbose))
            .with_timing(verbose >= 3)
    } else {
        create_config_manager(config_path)
            .ok()
            .and_then(|manager| manager.load_settings().ok())
            .map(|settings| settings.tracing_config())
            .unwrap_or_default()
    };
    init_tracing(&config).map_err(|e| CliError::Config(e.to_string()))
}

/// Reads and parses a layout document.
pub fn read_layout(path: &Path) -> Result<LayoutDocument, CliError> {
    let json = std::fs::read_to_string(path)
        .map_err(|e| CliError::File(format!("{}: {e}", path.display())))?;
    let doc = LayoutDocument::from_json(&json)?;
    tracing::debug!(path = %path.display(), panels = doc.panel_count(), "Layout loaded");
    Ok(doc)
}
