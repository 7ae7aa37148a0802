//! `VizDock` Core Library
//!
//! Dockable master/detail layouts for visualization panels. A workspace
//! holds a master panel of selection-driving panels and a dock of detail
//! panels; selections in a master panel are propagated as filters to every
//! detail panel. Whole workspaces serialize to a JSON layout document.
//!
//! # Crate Structure
//!
//! - [`layout`] - Serializable layout document and dock tree shape
//! - [`tables`] - Named data source registry
//! - [`viewer`] - `Viewer` and `DataSource` traits, event subscriptions
//! - [`panel`] - A viewer with a title, role and lifecycle
//! - [`dock`] - Split/tab dock tree with single-document mode
//! - [`split`] - Linear split holding the master panels
//! - [`workspace`] - The master/detail workspace
//! - [`commands`] - Context menu commands
//! - [`propagation`] - Master to detail filter propagation
//! - [`config`] - Settings persistence
//! - [`tracing`] - Structured logging setup
//! - [`testing`] - In-memory viewers and tables for tests

#![warn(missing_docs)]

pub mod commands;
pub mod config;
pub mod dock;
pub mod error;
pub mod layout;
pub mod panel;
pub mod propagation;
pub mod split;
pub mod tables;
pub mod testing;
pub mod tracing;
pub mod types;
pub mod viewer;
pub mod workspace;

pub use commands::{
    CommandContext, CommandDef, CommandId, CommandRegistry, MenuEntry, Text, UnknownCommand,
};
pub use config::{ConfigError, ConfigManager, ConfigResult, LoggingSettings, WorkspaceSettings};
pub use dock::{DockMode, DockTree, InsertMode};
pub use error::{
    DockError, LayoutError, ViewerError, VizDockError, WorkspaceError, WorkspaceResult,
};
pub use layout::{
    DEFAULT_WORKSPACE_SIZES, DockLayout, DockNode, Filter, LayoutDocument, MasterLayout,
    PanelConfig, ViewerConfig,
};
pub use panel::{DETAIL_CLASS, MASTER_CLASS, Panel};
pub use propagation::{FilterOutcome, FilterTarget, PropagationBatch};
pub use split::SplitPanel;
pub use tables::TableRegistry;
pub use tracing::{
    TracingConfig, TracingError, TracingLevel, TracingOutput, TracingResult, init_tracing,
    is_tracing_initialized, span_names,
};
pub use types::{ListenerId, Orientation, PanelId, PanelRole, Region, Side};
pub use viewer::{
    DataSource, Listener, Schema, Subscription, Viewer, ViewerEvent, ViewerEventKind,
    ViewerFactory,
};
pub use workspace::{
    ContextMenu, DEFAULT_TITLE, DUPLICATE_TITLE, WidgetSpec, Workspace, WorkspaceEvent,
    WorkspaceOptions,
};
