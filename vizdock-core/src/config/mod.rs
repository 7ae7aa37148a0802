//! Configuration management for `VizDock`
//!
//! This module provides the `ConfigManager` for loading and saving the
//! workspace settings file in TOML format.

mod manager;
pub mod settings;

pub use manager::{CONFIG_DIR_ENV, ConfigError, ConfigManager, ConfigResult, SETTINGS_FILE};
pub use settings::{LoggingSettings, WorkspaceSettings};
