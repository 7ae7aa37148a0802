//! Error types for `VizDock`
//!
//! Each concern has its own error enum; [`VizDockError`] wraps them for
//! callers that only need a single error type (the CLI, for instance).

use thiserror::Error;

use crate::config::ConfigError;
use crate::types::PanelId;

/// Errors raised while parsing or validating a layout document.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum LayoutError {
    /// The document could not be parsed.
    #[error("Failed to parse layout: {0}")]
    Parse(String),

    /// The document could not be serialized.
    #[error("Failed to serialize layout: {0}")]
    Serialize(String),

    /// A split lists a different number of sizes than children.
    #[error("split has {children} children but {sizes} sizes")]
    SizeMismatch {
        /// Number of children in the split.
        children: usize,
        /// Number of relative sizes in the split.
        sizes: usize,
    },

    /// A split with no children.
    #[error("split has no children")]
    EmptySplit,

    /// A tab group with no widgets.
    #[error("tab group has no widgets")]
    EmptyTabGroup,

    /// The active tab index points past the end of the group.
    #[error("tab index {current} out of range for {len} widgets")]
    TabIndexOutOfRange {
        /// Stored active index.
        current: usize,
        /// Number of widgets in the group.
        len: usize,
    },

    /// A relative size is negative, infinite or NaN.
    #[error("invalid relative size: {0}")]
    InvalidSize(f64),

    /// The master sizes do not line up with the master widgets.
    #[error("master panel has {widgets} widgets but {sizes} sizes")]
    MasterSizeMismatch {
        /// Number of master widgets.
        widgets: usize,
        /// Number of master sizes.
        sizes: usize,
    },
}

/// Errors raised by dock tree and split panel operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DockError {
    /// The panel is not part of the container.
    #[error("panel not found in dock: {0}")]
    PanelNotFound(PanelId),

    /// The panel is already part of the container.
    #[error("panel already docked: {0}")]
    AlreadyDocked(PanelId),

    /// A panel was used as its own placement reference.
    #[error("panel cannot be placed relative to itself: {0}")]
    SelfReference(PanelId),

    /// Single-document mode supports one level only.
    #[error("dock is already in single-document mode")]
    AlreadySingleDocument,

    /// Leaving single-document mode while not in it.
    #[error("dock is not in single-document mode")]
    NotSingleDocument,

    /// No split node lives at the given child path.
    #[error("no split node at path {0:?}")]
    InvalidPath(Vec<usize>),

    /// Wrong number of sizes for a split.
    #[error("expected {expected} sizes, got {actual}")]
    SizeCount {
        /// Number of children in the split.
        expected: usize,
        /// Number of sizes provided.
        actual: usize,
    },

    /// A relative size is negative, infinite or NaN.
    #[error("invalid relative size: {0}")]
    InvalidSize(f64),

    /// A restored tree is structurally invalid.
    #[error(transparent)]
    Layout(#[from] LayoutError),
}

/// Errors reported by a viewer or its data source.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ViewerError {
    /// The viewer was torn down.
    #[error("viewer has been deleted")]
    Deleted,

    /// No table is bound to the viewer.
    #[error("no table is bound to the viewer")]
    NoTable,

    /// The viewer rejected a configuration.
    #[error("failed to restore viewer: {0}")]
    Restore(String),

    /// The data source schema could not be read.
    #[error("failed to read schema: {0}")]
    Schema(String),

    /// The viewer's own teardown failed.
    #[error("viewer teardown failed: {0}")]
    Teardown(String),

    /// A viewer command (export, copy, reset) failed.
    #[error("viewer command failed: {0}")]
    Command(String),
}

/// Errors raised by workspace operations.
#[derive(Debug, Error)]
pub enum WorkspaceError {
    /// The panel ID does not belong to a live panel.
    #[error("unknown panel: {0}")]
    UnknownPanel(PanelId),

    /// The panel already lives in a container.
    #[error("{panel} is already placed in the {container}")]
    AlreadyPlaced {
        /// The panel being inserted.
        panel: PanelId,
        /// The container it already lives in.
        container: &'static str,
    },

    /// The operation needs a panel living in the dock tree.
    #[error("{0} is not docked")]
    NotDocked(PanelId),

    /// A workspace invariant does not hold.
    #[error("workspace invariant violated: {0}")]
    InvariantViolation(String),

    /// Dock tree error.
    #[error(transparent)]
    Dock(#[from] DockError),

    /// Viewer error.
    #[error(transparent)]
    Viewer(#[from] ViewerError),

    /// Layout document error.
    #[error(transparent)]
    Layout(#[from] LayoutError),
}

/// Result type for workspace operations.
pub type WorkspaceResult<T> = std::result::Result<T, WorkspaceError>;

/// Top-level error type for `VizDock`.
#[derive(Debug, Error)]
pub enum VizDockError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Workspace error.
    #[error("Workspace error: {0}")]
    Workspace(#[from] WorkspaceError),

    /// Layout error.
    #[error("Layout error: {0}")]
    Layout(#[from] LayoutError),

    /// I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
