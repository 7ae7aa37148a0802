//! Interfaces to the external collaborators of the workspace.
//!
//! The workspace never renders anything itself. Each panel owns a
//! [`Viewer`], the visualization component mounted into a host slot, and
//! each viewer may be bound to a [`DataSource`]. Both are trait objects so
//! hosts can plug in any rendering backend; [`crate::testing`] ships
//! in-memory implementations.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Weak};

use async_trait::async_trait;

use crate::error::ViewerError;
use crate::layout::ViewerConfig;
use crate::types::{ListenerId, PanelId};

/// Column name to column type.
pub type Schema = BTreeMap<String, String>;

/// A named, queryable table.
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Name used in diagnostics.
    fn name(&self) -> &str;

    /// Reads the table's schema.
    ///
    /// # Errors
    ///
    /// Returns [`ViewerError::Schema`] if the schema cannot be read.
    async fn schema(&self) -> Result<Schema, ViewerError>;
}

/// Kinds of events a viewer emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewerEventKind {
    /// A row was clicked in a selectable viewer.
    Selection,
    /// The settings pane was opened or closed.
    SettingsToggled,
    /// A context menu was requested.
    ContextMenu,
}

/// An event emitted by a viewer.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewerEvent {
    /// A selection carrying the filters describing the clicked row.
    Selection {
        /// Config whose `filters` describe the selection.
        config: ViewerConfig,
    },
    /// The settings pane changed state.
    SettingsToggled {
        /// Whether the pane is now open.
        open: bool,
    },
    /// A context menu request at client coordinates.
    ContextMenu {
        /// Horizontal position.
        x: f64,
        /// Vertical position.
        y: f64,
    },
}

impl ViewerEvent {
    /// Returns the kind of this event.
    #[must_use]
    pub const fn kind(&self) -> ViewerEventKind {
        match self {
            Self::Selection { .. } => ViewerEventKind::Selection,
            Self::SettingsToggled { .. } => ViewerEventKind::SettingsToggled,
            Self::ContextMenu { .. } => ViewerEventKind::ContextMenu,
        }
    }
}

/// Callback invoked for each matching event.
pub type Listener = Arc<dyn Fn(&ViewerEvent) + Send + Sync>;

/// A visualization component owned by exactly one panel.
#[async_trait]
pub trait Viewer: Send + Sync {
    /// Returns the viewer's current settings.
    fn save(&self) -> ViewerConfig;

    /// Applies `config`. Absent fields leave the current setting untouched.
    async fn restore(&self, config: ViewerConfig) -> Result<(), ViewerError>;

    /// Binds the viewer to a data source.
    fn load(&self, table: Arc<dyn DataSource>);

    /// The bound data source, if any.
    fn table(&self) -> Option<Arc<dyn DataSource>>;

    /// Tells the viewer its geometry changed.
    async fn notify_resize(&self) -> Result<(), ViewerError>;

    /// Tears the viewer down. No other call is valid afterwards.
    async fn delete(&self) -> Result<(), ViewerError>;

    /// Removes the viewer's node from its host slot.
    fn detach(&self);

    /// Enables or disables row selection events.
    fn set_selectable(&self, selectable: bool);

    /// Whether row selection events are enabled.
    fn is_selectable(&self) -> bool;

    /// Adds a style class.
    fn add_class(&self, class: &str);

    /// Removes a style class.
    fn remove_class(&self, class: &str);

    /// Whether the style class is set.
    fn has_class(&self, class: &str) -> bool;

    /// Re-reads styles after a class change.
    fn restyle(&self);

    /// Exports the current view as CSV.
    async fn download(&self) -> Result<(), ViewerError>;

    /// Copies the current view to the clipboard.
    async fn copy(&self) -> Result<(), ViewerError>;

    /// Resets pivots, filters and other settings.
    async fn reset(&self) -> Result<(), ViewerError>;

    /// Opens or closes the settings pane.
    fn toggle_config(&self);

    /// Registers `listener` for events of `kind`.
    fn subscribe(&self, kind: ViewerEventKind, listener: Listener) -> ListenerId;

    /// Unregisters a listener. Returns false if it was not registered.
    fn unsubscribe(&self, id: ListenerId) -> bool;
}

/// Creates viewers and mounts them into host slots.
pub trait ViewerFactory: Send + Sync {
    /// Creates a viewer mounted in `slot`.
    fn create_viewer(&self, slot: &str) -> Arc<dyn Viewer>;
}

/// Listeners registered on one viewer by one wiring step.
///
/// Dropping the subscription unregisters every listener it holds, so
/// replacing a subscription can never leave stale listeners behind.
pub struct Subscription {
    panel: PanelId,
    viewer: Weak<dyn Viewer>,
    ids: Vec<ListenerId>,
}

impl Subscription {
    /// Creates an empty subscription on `viewer`.
    #[must_use]
    pub fn new(panel: PanelId, viewer: &Arc<dyn Viewer>) -> Self {
        Self {
            panel,
            viewer: Arc::downgrade(viewer),
            ids: Vec::new(),
        }
    }

    /// Registers a listener and tracks its id.
    pub fn listen(&mut self, kind: ViewerEventKind, listener: Listener) {
        if let Some(viewer) = self.viewer.upgrade() {
            self.ids.push(viewer.subscribe(kind, listener));
        }
    }

    /// Panel the listeners belong to.
    #[must_use]
    pub const fn panel(&self) -> PanelId {
        self.panel
    }

    /// Number of live listeners.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether no listener is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Unregisters every listener.
    pub fn release(&mut self) {
        let ids = std::mem::take(&mut self.ids);
        if let Some(viewer) = self.viewer.upgrade() {
            for id in ids {
                viewer.unsubscribe(id);
            }
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("panel", &self.panel)
            .field("ids", &self.ids)
            .finish_non_exhaustive()
    }
}
