//! Panel adapter around a single viewer.
//!
//! A [`Panel`] is the runtime entity the dock tree and the master panel
//! arrange. It owns exactly one [`Viewer`], tracks the panel's role and
//! visibility, and holds the listener subscriptions the workspace wires.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::{debug, instrument};

use crate::error::ViewerError;
use crate::layout::PanelConfig;
use crate::types::{PanelId, PanelRole};
use crate::viewer::{DataSource, Subscription, Viewer};

/// Style class set on master panels.
pub const MASTER_CLASS: &str = "vd-Master";

/// Style class set on detail panels.
pub const DETAIL_CLASS: &str = "vd-Detail";

/// A workspace panel.
pub struct Panel {
    id: PanelId,
    title: String,
    closable: bool,
    role: PanelRole,
    viewer: Arc<dyn Viewer>,
    pending_table: Option<Arc<dyn DataSource>>,
    attached: bool,
    visible: bool,
    closed: bool,
    settings_open: bool,
    generation: Arc<AtomicU64>,
    listeners: Option<Subscription>,
    click: Option<Subscription>,
}

impl Panel {
    /// Wraps `viewer` in a new detail panel.
    pub fn new(id: PanelId, title: impl Into<String>, viewer: Arc<dyn Viewer>) -> Self {
        viewer.add_class(DETAIL_CLASS);
        Self {
            id,
            title: title.into(),
            closable: false,
            role: PanelRole::Detail,
            viewer,
            pending_table: None,
            attached: false,
            visible: false,
            closed: false,
            settings_open: false,
            generation: Arc::new(AtomicU64::new(0)),
            listeners: None,
            click: None,
        }
    }

    /// Panel identifier.
    #[must_use]
    pub const fn id(&self) -> PanelId {
        self.id
    }

    /// Title shown in the tab bar.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Renames the panel.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    /// Whether the tab shows a close button.
    #[must_use]
    pub const fn is_closable(&self) -> bool {
        self.closable
    }

    /// Sets whether the tab shows a close button.
    pub fn set_closable(&mut self, closable: bool) {
        self.closable = closable;
    }

    /// Current role.
    #[must_use]
    pub const fn role(&self) -> PanelRole {
        self.role
    }

    /// Whether the panel is a master panel.
    #[must_use]
    pub const fn is_master(&self) -> bool {
        self.role.is_master()
    }

    /// The owned viewer.
    #[must_use]
    pub fn viewer(&self) -> &Arc<dyn Viewer> {
        &self.viewer
    }

    /// Whether the viewer is currently shown.
    #[must_use]
    pub const fn is_visible(&self) -> bool {
        self.visible
    }

    /// Whether the panel was closed.
    #[must_use]
    pub const fn is_closed(&self) -> bool {
        self.closed
    }

    /// Whether the viewer's settings pane is open.
    #[must_use]
    pub const fn is_settings_open(&self) -> bool {
        self.settings_open
    }

    /// Records the settings pane state.
    pub fn set_settings_open(&mut self, open: bool) {
        self.settings_open = open;
    }

    /// Generation counter, advanced by every full restore and by close.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Shared handle on the generation counter.
    #[must_use]
    pub fn generation_handle(&self) -> Arc<AtomicU64> {
        Arc::clone(&self.generation)
    }

    fn bump_generation(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Switches the role, keeping style classes and selectability in step.
    pub fn set_master(&mut self, master: bool) {
        self.role = PanelRole::from_master(master);
        if master {
            self.viewer.add_class(MASTER_CLASS);
            self.viewer.remove_class(DETAIL_CLASS);
        } else {
            self.viewer.add_class(DETAIL_CLASS);
            self.viewer.remove_class(MASTER_CLASS);
        }
        self.viewer.set_selectable(master);
    }

    /// Binds a data source.
    ///
    /// Before the panel is attached the source is kept pending; afterwards
    /// it is forwarded to the viewer immediately.
    pub fn set_table(&mut self, table: Arc<dyn DataSource>) {
        if self.attached {
            self.viewer.load(table);
        } else {
            self.pending_table = Some(table);
        }
    }

    /// Whether the panel has been attached to a container.
    #[must_use]
    pub const fn is_attached(&self) -> bool {
        self.attached
    }

    /// Marks the panel attached, flushing a pending data source once.
    pub fn attach(&mut self) {
        if self.attached {
            return;
        }
        self.attached = true;
        if let Some(table) = self.pending_table.take() {
            debug!(panel_id = %self.id, table = table.name(), "Loading pending table");
            self.viewer.load(table);
        }
    }

    /// The bound or pending data source.
    #[must_use]
    pub fn table(&self) -> Option<Arc<dyn DataSource>> {
        self.viewer.table().or_else(|| self.pending_table.clone())
    }

    /// Shows the viewer and notifies it of its new geometry.
    pub async fn show(&mut self) -> Result<(), ViewerError> {
        if self.visible {
            return Ok(());
        }
        self.visible = true;
        self.notify_resize().await
    }

    /// Hides the viewer.
    pub fn hide(&mut self) {
        self.visible = false;
    }

    /// Forwards a resize to the viewer when it is visible.
    pub async fn notify_resize(&self) -> Result<(), ViewerError> {
        if self.visible && !self.closed {
            self.viewer.notify_resize().await
        } else {
            Ok(())
        }
    }

    /// Applies a full panel config.
    ///
    /// The `master` flag sets the role; everything else goes to the viewer
    /// verbatim. Any filter update still in flight for this panel is
    /// invalidated.
    #[instrument(skip(self, config), fields(panel_id = %self.id, master = config.master))]
    pub async fn restore(&mut self, config: PanelConfig) -> Result<(), ViewerError> {
        if self.closed {
            return Err(ViewerError::Deleted);
        }
        let PanelConfig { master, viewer } = config;
        self.set_master(master);
        self.bump_generation();
        self.viewer.restore(viewer).await
    }

    /// Viewer settings plus the `master` flag.
    #[must_use]
    pub fn save(&self) -> PanelConfig {
        PanelConfig {
            master: self.is_master(),
            viewer: self.viewer.save(),
        }
    }

    /// Replaces the event listener subscription, releasing the old one.
    pub fn set_listeners(&mut self, subscription: Subscription) {
        if let Some(mut old) = self.listeners.replace(subscription) {
            old.release();
        }
    }

    /// Replaces the click propagation subscription.
    pub fn set_click_subscription(&mut self, subscription: Option<Subscription>) {
        if let Some(mut old) = std::mem::replace(&mut self.click, subscription) {
            old.release();
        }
    }

    /// Whether click propagation is wired.
    #[must_use]
    pub const fn has_click_subscription(&self) -> bool {
        self.click.is_some()
    }

    /// Number of live event listeners, click propagation included.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.as_ref().map_or(0, Subscription::len)
            + self.click.as_ref().map_or(0, Subscription::len)
    }

    /// Closes the panel.
    ///
    /// Listeners are released first, then the viewer is torn down, then its
    /// node is detached from the host slot. Closing twice is a no-op.
    #[instrument(skip(self), fields(panel_id = %self.id))]
    pub async fn close(&mut self) -> Result<(), ViewerError> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        self.visible = false;
        self.bump_generation();
        self.set_click_subscription(None);
        if let Some(mut listeners) = self.listeners.take() {
            listeners.release();
        }
        let result = self.viewer.delete().await;
        self.viewer.detach();
        debug!("Panel closed");
        result
    }
}

impl fmt::Debug for Panel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Panel")
            .field("id", &self.id)
            .field("title", &self.title)
            .field("role", &self.role)
            .field("visible", &self.visible)
            .field("closed", &self.closed)
            .field("generation", &self.generation())
            .finish_non_exhaustive()
    }
}
