//! CLI error types and exit codes.

use vizdock_core::{ConfigError, LayoutError, VizDockError, WorkspaceError};

/// Exit codes for CLI operations
pub mod exit_codes {
    /// General error - configuration, file access, or other non-layout errors
    pub const GENERAL_ERROR: i32 = 1;
    /// Validation failure - malformed layout or failed round trip
    pub const VALIDATION_FAILURE: i32 = 2;
}

/// CLI error type
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Layout file could not be read
    #[error("Cannot read {0}")]
    File(String),

    /// Layout document is malformed or inconsistent
    #[error("Invalid layout: {0}")]
    Layout(String),

    /// Layout did not survive a restore/save round trip
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Async runtime or other internal failure
    #[error("Runtime error: {0}")]
    Runtime(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<LayoutError> for CliError {
    fn from(err: LayoutError) -> Self {
        Self::Layout(err.to_string())
    }
}

impl From<WorkspaceError> for CliError {
    fn from(err: WorkspaceError) -> Self {
        match err {
            WorkspaceError::Layout(e) => Self::Layout(e.to_string()),
            other => Self::Validation(other.to_string()),
        }
    }
}

impl From<VizDockError> for CliError {
    fn from(err: VizDockError) -> Self {
        match err {
            VizDockError::Config(e) => e.into(),
            VizDockError::Workspace(e) => e.into(),
            VizDockError::Layout(e) => e.into(),
            VizDockError::Io(e) => Self::Io(e),
        }
    }
}

impl CliError {
    /// Returns the appropriate exit code for this error type.
    ///
    /// Exit codes:
    /// - 0: Success (not an error)
    /// - 1: General error (configuration, file access, runtime, IO)
    /// - 2: Validation failure (invalid layout, failed round trip)
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Layout(_) | Self::Validation(_) => exit_codes::VALIDATION_FAILURE,
            Self::Config(_) | Self::File(_) | Self::Runtime(_) | Self::Io(_) => {
                exit_codes::GENERAL_ERROR
            }
        }
    }
}
