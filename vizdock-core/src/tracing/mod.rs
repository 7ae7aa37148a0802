//! Tracing integration for structured logging
//!
//! Workspace operations emit `tracing` events with structured fields
//! (`panel_id`, `table`, `dock_mode`) inside spans named after the
//! operation. This module sets up the subscriber that renders them.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};

use thiserror::Error;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

static INSTALLED: AtomicBool = AtomicBool::new(false);

/// Crates whose events the default filter lets through.
const CRATES: [&str; 2] = ["vizdock_core", "vizdock_cli"];

/// Errors raised while installing the subscriber
#[derive(Debug, Error)]
pub enum TracingError {
    /// A level name that is not one of `error`, `warn`, `info`, `debug`,
    /// `trace`
    #[error("Unknown log level: {0}")]
    UnknownLevel(String),

    /// The filter directive did not parse
    #[error("Invalid filter directive {directive:?}: {reason}")]
    InvalidFilter {
        /// Directive as given
        directive: String,
        /// Parser message
        reason: String,
    },

    /// The log file could not be created
    #[error("Cannot create log file {path}: {source}")]
    LogFile {
        /// Requested path
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// A global subscriber is already installed
    #[error("Tracing has already been initialized")]
    AlreadyInitialized,

    /// The subscriber could not be installed
    #[error("Failed to install subscriber: {0}")]
    Install(String),
}

/// Result type for tracing operations
pub type TracingResult<T> = Result<T, TracingError>;

/// Verbosity of the log output
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum TracingLevel {
    /// Only errors
    Error,
    /// Errors and warnings
    #[default]
    Warn,
    /// Plus lifecycle messages (restores, role changes)
    Info,
    /// Plus per-panel placement and propagation details
    Debug,
    /// Everything
    Trace,
}

impl TracingLevel {
    /// Every level, quietest first.
    pub const ALL: [Self; 5] = [
        Self::Error,
        Self::Warn,
        Self::Info,
        Self::Debug,
        Self::Trace,
    ];

    /// Name used in filter directives and the settings file.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        }
    }

    /// Level for a `-v` count, starting from warn.
    #[must_use]
    pub fn from_verbosity(verbose: u8) -> Self {
        let index = (usize::from(verbose) + 1).min(Self::ALL.len() - 1);
        Self::ALL[index]
    }
}

impl FromStr for TracingLevel {
    type Err = TracingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase();
        if name == "warning" {
            return Ok(Self::Warn);
        }
        Self::ALL
            .into_iter()
            .find(|level| level.as_str() == name)
            .ok_or_else(|| TracingError::UnknownLevel(s.to_string()))
    }
}

impl fmt::Display for TracingLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where log lines go
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TracingOutput {
    /// Standard output
    Stdout,
    /// Standard error, keeping stdout clean for command output
    #[default]
    Stderr,
    /// A file, truncated on start; never colored
    File {
        /// Path to the log file
        path: PathBuf,
    },
}

/// Subscriber configuration
#[derive(Debug, Clone, Default)]
pub struct TracingConfig {
    /// Level applied to the `vizdock_*` crates
    pub level: TracingLevel,
    /// Output destination
    pub output: TracingOutput,
    /// Log span durations when operation spans close
    pub span_timing: bool,
    /// Full `EnvFilter` directive replacing the level-based one
    pub filter: Option<String>,
}

impl TracingConfig {
    /// Warn level to stderr, no timing, no custom filter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the level
    #[must_use]
    pub const fn with_level(mut self, level: TracingLevel) -> Self {
        self.level = level;
        self
    }

    /// Sets the output destination
    #[must_use]
    pub fn with_output(mut self, output: TracingOutput) -> Self {
        self.output = output;
        self
    }

    /// Enables span duration logging
    #[must_use]
    pub const fn with_timing(mut self, enabled: bool) -> Self {
        self.span_timing = enabled;
        self
    }

    /// Sets a custom filter directive
    #[must_use]
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    /// The filter directive in effect: the custom one, or the level applied
    /// to each `vizdock_*` crate.
    #[must_use]
    pub fn directive(&self) -> String {
        self.filter.clone().unwrap_or_else(|| {
            CRATES
                .iter()
                .map(|krate| format!("{krate}={}", self.level))
                .collect::<Vec<_>>()
                .join(",")
        })
    }

    fn env_filter(&self) -> TracingResult<EnvFilter> {
        let directive = self.directive();
        EnvFilter::try_new(&directive).map_err(|e| TracingError::InvalidFilter {
            directive,
            reason: e.to_string(),
        })
    }

    fn writer(&self) -> TracingResult<(BoxMakeWriter, bool)> {
        Ok(match &self.output {
            TracingOutput::Stdout => (BoxMakeWriter::new(std::io::stdout), true),
            TracingOutput::Stderr => (BoxMakeWriter::new(std::io::stderr), true),
            TracingOutput::File { path } => {
                let file = std::fs::File::create(path).map_err(|source| TracingError::LogFile {
                    path: path.clone(),
                    source,
                })?;
                (BoxMakeWriter::new(file), false)
            }
        })
    }
}

/// Installs the global subscriber.
///
/// # Errors
///
/// Fails with [`TracingError::AlreadyInitialized`] on a second call, and
/// when the filter directive is invalid or the log file cannot be created.
pub fn init_tracing(config: &TracingConfig) -> TracingResult<()> {
    if INSTALLED.swap(true, Ordering::SeqCst) {
        return Err(TracingError::AlreadyInitialized);
    }
    let filter = config.env_filter()?;
    let (writer, ansi) = config.writer()?;
    let span_events = if config.span_timing {
        FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_ansi(ansi)
                .with_span_events(span_events)
                .with_writer(writer),
        )
        .try_init()
        .map_err(|e| TracingError::Install(e.to_string()))?;

    tracing::debug!(directive = %config.directive(), "Tracing initialized");
    Ok(())
}

/// Whether [`init_tracing`] has been called.
#[must_use]
pub fn is_tracing_initialized() -> bool {
    INSTALLED.load(Ordering::SeqCst)
}

/// Creates an info-level span for a workspace operation
///
/// ```ignore
/// use vizdock_core::trace_operation;
/// use vizdock_core::tracing::span_names;
///
/// let _guard = trace_operation!(span_names::WORKSPACE_SAVE, panels = 3).entered();
/// ```
#[macro_export]
macro_rules! trace_operation {
    ($name:expr) => {
        tracing::info_span!($name)
    };
    ($name:expr, $($field:tt)*) => {
        tracing::info_span!($name, $($field)*)
    };
}

/// Standard span names
pub mod span_names {
    /// Saving a workspace to a layout document
    pub const WORKSPACE_SAVE: &str = "workspace.save";
    /// Clearing every panel
    pub const WORKSPACE_CLEAR: &str = "workspace.clear";
    /// Propagating a master selection to detail panels
    pub const FILTER_PROPAGATE: &str = "filter.propagate";
    /// Loading settings
    pub const CONFIG_LOAD: &str = "config.load";
}
