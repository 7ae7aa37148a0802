//! The workspace: master panel, dock and the panels they arrange.
//!
//! A [`Workspace`] is split in two regions. The master panel is a vertical
//! [`SplitPanel`] of master panels, mounted only while it holds at least
//! one panel; the dock is a [`DockTree`] of detail panels. Every live panel
//! lives in exactly one of them. Selections made in a master panel are
//! propagated as filters to every detail panel.
//!
//! Viewer events arrive through an internal channel and are dispatched by
//! [`Workspace::process_events`].

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tracing::{Instrument, debug, info, instrument, warn};

use crate::commands::{CommandContext, CommandId, CommandRegistry, MenuEntry};
use crate::config::WorkspaceSettings;
use crate::dock::{DockTree, InsertMode};
use crate::error::{WorkspaceError, WorkspaceResult};
use crate::layout::{
    DEFAULT_WORKSPACE_SIZES, DockLayout, LayoutDocument, MasterLayout, PanelConfig, ViewerConfig,
    validate_sizes,
};
use crate::panel::Panel;
use crate::propagation::{self, FilterTarget, PropagationBatch, candidate_columns};
use crate::split::SplitPanel;
use crate::tables::TableRegistry;
use crate::tracing::span_names;
use crate::types::{Orientation, PanelId, Region, Side};
use crate::viewer::{
    DataSource, Listener, Subscription, ViewerEvent, ViewerEventKind, ViewerFactory,
};

/// Title of panels created without a name.
pub const DEFAULT_TITLE: &str = "untitled";

/// Title given to duplicated panels.
pub const DUPLICATE_TITLE: &str = "duplicate";

/// Workspace construction options.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorkspaceOptions {
    /// Side the master panel is mounted on.
    pub side: Side,
    /// `[master, detail]` weights applied when the master panel is mounted.
    pub default_sizes: [f64; 2],
}

impl Default for WorkspaceOptions {
    fn default() -> Self {
        Self {
            side: Side::Left,
            default_sizes: DEFAULT_WORKSPACE_SIZES,
        }
    }
}

impl From<&WorkspaceSettings> for WorkspaceOptions {
    fn from(settings: &WorkspaceSettings) -> Self {
        Self {
            side: settings.side,
            default_sizes: settings.default_sizes,
        }
    }
}

/// What to build a new panel from.
#[derive(Clone, Default)]
pub struct WidgetSpec {
    /// Tab title.
    pub title: String,
    /// Data source to bind.
    pub table: Option<Arc<dyn DataSource>>,
    /// Initial config, `master` flag included.
    pub config: PanelConfig,
}

impl WidgetSpec {
    /// A widget with no data source.
    pub fn new(title: impl Into<String>, config: PanelConfig) -> Self {
        Self {
            title: title.into(),
            table: None,
            config,
        }
    }

    /// Binds a data source.
    #[must_use]
    pub fn with_table(mut self, table: Arc<dyn DataSource>) -> Self {
        self.table = Some(table);
        self
    }
}

impl fmt::Debug for WidgetSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WidgetSpec")
            .field("title", &self.title)
            .field("table", &self.table.as_ref().map(|table| table.name()))
            .field("config", &self.config)
            .finish()
    }
}

/// A viewer event tagged with the panel that emitted it.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkspaceEvent {
    /// Emitting panel.
    pub panel: PanelId,
    /// The event.
    pub event: ViewerEvent,
}

/// A context menu opened on a panel.
#[derive(Debug, Clone, PartialEq)]
pub struct ContextMenu {
    /// Panel the menu acts on.
    pub panel: PanelId,
    /// Horizontal position.
    pub x: f64,
    /// Vertical position.
    pub y: f64,
    /// Menu entries.
    pub entries: Vec<MenuEntry>,
}

/// Master/detail workspace of visualization panels.
pub struct Workspace {
    options: WorkspaceOptions,
    host: Arc<dyn ViewerFactory>,
    tables: TableRegistry,
    panels: HashMap<PanelId, Panel>,
    dock: DockTree,
    master: SplitPanel,
    master_mounted: bool,
    sizes: [f64; 2],
    commands: CommandRegistry,
    events_tx: UnboundedSender<WorkspaceEvent>,
    events_rx: UnboundedReceiver<WorkspaceEvent>,
    open_menu: Option<ContextMenu>,
}

impl Workspace {
    /// Creates an empty workspace whose viewers are created by `host`.
    #[must_use]
    pub fn new(host: Arc<dyn ViewerFactory>, options: WorkspaceOptions) -> Self {
        let (events_tx, events_rx) = unbounded_channel();
        Self {
            options,
            host,
            tables: TableRegistry::new(),
            panels: HashMap::new(),
            dock: DockTree::new(),
            master: SplitPanel::new(Orientation::Vertical),
            master_mounted: false,
            sizes: options.default_sizes,
            commands: CommandRegistry::new(),
            events_tx,
            events_rx,
            open_menu: None,
        }
    }

    /// Creates a workspace configured from settings.
    #[must_use]
    pub fn with_settings(host: Arc<dyn ViewerFactory>, settings: &WorkspaceSettings) -> Self {
        Self::new(host, WorkspaceOptions::from(settings))
    }

    /// Construction options.
    #[must_use]
    pub const fn options(&self) -> &WorkspaceOptions {
        &self.options
    }


    /// Registers a data source; panels already bound keep their source.
    pub fn add_table(&mut self, name: impl Into<String>, source: Arc<dyn DataSource>) {
        self.tables.add_table(name, source);
    }

    /// Looks up a data source.
    #[must_use]
    pub fn get_table(&self, name: &str) -> Option<Arc<dyn DataSource>> {
        self.tables.get_table(name)
    }

    /// The table registry.
    #[must_use]
    pub const fn tables(&self) -> &TableRegistry {
        &self.tables
    }


    /// Borrows a live panel.
    pub fn panel(&self, id: PanelId) -> WorkspaceResult<&Panel> {
        self.panels.get(&id).ok_or(WorkspaceError::UnknownPanel(id))
    }

    fn panel_mut(&mut self, id: PanelId) -> WorkspaceResult<&mut Panel> {
        self.panels
            .get_mut(&id)
            .ok_or(WorkspaceError::UnknownPanel(id))
    }

    /// The dock.
    #[must_use]
    pub const fn dock(&self) -> &DockTree {
        &self.dock
    }

    /// The master panel.
    #[must_use]
    pub const fn master(&self) -> &SplitPanel {
        &self.master
    }

    /// Whether the master panel is mounted.
    #[must_use]
    pub const fn is_master_mounted(&self) -> bool {
        self.master_mounted
    }

    /// `[master, detail]` weights of the top-level split.
    #[must_use]
    pub const fn sizes(&self) -> [f64; 2] {
        self.sizes
    }

    /// Mounted regions in display order.
    #[must_use]
    pub fn mounted_regions(&self) -> Vec<Region> {
        match (self.master_mounted, self.options.side) {
            (false, _) => vec![Region::Detail],
            (true, Side::Left) => vec![Region::Master, Region::Detail],
            (true, Side::Right) => vec![Region::Detail, Region::Master],
        }
    }

    /// Every panel: master panels top to bottom, then dock panels in
    /// pre-order.
    #[must_use]
    pub fn all_widgets(&self) -> Vec<PanelId> {
        self.master
            .widgets()
            .iter()
            .copied()
            .chain(self.dock.widgets())
            .collect()
    }

    /// Number of live panels.
    #[must_use]
    pub fn len(&self) -> usize {
        self.panels.len()
    }

    /// Whether the workspace has no panel.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.panels.is_empty()
    }

    /// The command registry.
    #[must_use]
    pub const fn commands(&self) -> &CommandRegistry {
        &self.commands
    }

    /// Checks the structural invariants.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceError::InvariantViolation`] describing the first
    /// broken invariant.
    pub fn check_invariants(&self) -> WorkspaceResult<()> {
        let violation = |message: String| Err(WorkspaceError::InvariantViolation(message));
        for (id, panel) in &self.panels {
            let in_dock = self.dock.contains(*id);
            let in_master = self.master.contains(*id);
            if in_dock == in_master {
                return violation(format!(
                    "{id} must be in exactly one container (dock: {in_dock}, master: {in_master})"
                ));
            }
            if panel.is_master() != in_master {
                return violation(format!("{id} has role {} in the wrong container", panel.role()));
            }
            let expected = 2 + usize::from(in_master);
            if panel.listener_count() != expected {
                return violation(format!(
                    "{id} has {} listeners, expected {expected}",
                    panel.listener_count()
                ));
            }
        }
        if let Some(orphan) = self
            .all_widgets()
            .into_iter()
            .find(|id| !self.panels.contains_key(id))
        {
            return violation(format!("{orphan} is placed but not live"));
        }
        if self.master_mounted == self.master.is_empty() {
            return violation(format!(
                "master panel mounted: {}, panels: {}",
                self.master_mounted,
                self.master.len()
            ));
        }
        Ok(())
    }


    /// Builds a panel: closable, viewer mounted in its host slot, listeners
    /// wired, `spec.config` restored.
    ///
    /// The panel is not placed yet; hand it to [`dock_widget`](Self::dock_widget),
    /// [`make_master`](Self::make_master) or [`make_detail`](Self::make_detail).
    /// [`add_widget`](Self::add_widget) does both steps.
    pub async fn create_widget(&mut self, spec: WidgetSpec) -> WorkspaceResult<PanelId> {
        self.create_widget_with_id(PanelId::new(), spec).await
    }

    #[instrument(skip(self, spec), fields(panel_id = %id, title = %spec.title))]
    async fn create_widget_with_id(
        &mut self,
        id: PanelId,
        spec: WidgetSpec,
    ) -> WorkspaceResult<PanelId> {
        let viewer = self.host.create_viewer(&id.slot_name());
        let mut panel = Panel::new(id, spec.title, viewer);
        panel.set_closable(true);
        if let Some(table) = spec.table {
            panel.set_table(table);
        }
        self.panels.insert(id, panel);
        self.add_widget_event_listeners(id)?;
        if let Err(err) = self.panel_mut(id)?.restore(spec.config).await {
            if let Some(mut panel) = self.panels.remove(&id)
                && let Err(close_err) = panel.close().await
            {
                warn!(error = %close_err, "Failed to close panel after restore error");
            }
            return Err(err.into());
        }
        debug!("Panel created");
        Ok(id)
    }

    fn forward(&self, panel: PanelId) -> Listener {
        let events = self.events_tx.clone();
        Arc::new(move |event: &ViewerEvent| {
            let _ = events.send(WorkspaceEvent {
                panel,
                event: event.clone(),
            });
        })
    }

    /// Wires the context-menu and settings listeners of a panel, replacing
    /// any previous wiring.
    pub fn add_widget_event_listeners(&mut self, id: PanelId) -> WorkspaceResult<()> {
        let context_menu = self.forward(id);
        let settings = self.forward(id);
        let panel = self.panel_mut(id)?;
        let mut subscription = Subscription::new(id, panel.viewer());
        subscription.listen(ViewerEventKind::ContextMenu, context_menu);
        subscription.listen(ViewerEventKind::SettingsToggled, settings);
        panel.set_listeners(subscription);
        Ok(())
    }

    fn subscribe_click(&mut self, id: PanelId) -> WorkspaceResult<()> {
        let selection = self.forward(id);
        let panel = self.panel_mut(id)?;
        let mut subscription = Subscription::new(id, panel.viewer());
        subscription.listen(ViewerEventKind::Selection, selection);
        panel.set_click_subscription(Some(subscription));
        Ok(())
    }

    fn resolve_table(&self, config: &PanelConfig) -> Option<Arc<dyn DataSource>> {
        let name = config.viewer.table.as_deref()?;
        let table = self.tables.get_table(name);
        if table.is_none() {
            warn!(table = name, "Table is not registered; panel has no data source");
        }
        table
    }

    fn spec_for(&self, config: PanelConfig) -> WidgetSpec {
        WidgetSpec {
            title: config
                .viewer
                .name
                .clone()
                .unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            table: self.resolve_table(&config),
            config,
        }
    }


    fn insert_dock(&mut self, id: PanelId, mode: InsertMode) -> WorkspaceResult<()> {
        if self.master.contains(id) {
            return Err(WorkspaceError::AlreadyPlaced {
                panel: id,
                container: "master panel",
            });
        }
        self.dock.add_widget(id, mode)?;
        self.panel_mut(id)?.attach();
        Ok(())
    }

    fn insert_master(&mut self, id: PanelId, index: Option<usize>) -> WorkspaceResult<()> {
        if self.dock.contains(id) {
            return Err(WorkspaceError::AlreadyPlaced {
                panel: id,
                container: "dock",
            });
        }
        if self.master.contains(id) {
            return Err(WorkspaceError::AlreadyPlaced {
                panel: id,
                container: "master panel",
            });
        }
        if !self.master_mounted {
            self.sizes = self.options.default_sizes;
            self.master_mounted = true;
            debug!(side = %self.options.side, "Master panel mounted");
        }
        match index {
            Some(index) => self.master.insert(index, id)?,
            None => self.master.add(id)?,
        }
        let panel = self.panel_mut(id)?;
        panel.set_master(true);
        panel.attach();
        panel.viewer().restyle();
        self.subscribe_click(id)
    }

    fn remove_from_master(&mut self, id: PanelId) -> WorkspaceResult<()> {
        self.master.remove(id)?;
        if self.master.is_empty() {
            self.master_mounted = false;
            debug!("Master panel unmounted");
        }
        Ok(())
    }

    /// Shows panels that are on screen and hides the rest.
    async fn sync_visibility(&mut self) {
        let visible: HashSet<PanelId> = self
            .master
            .widgets()
            .iter()
            .copied()
            .chain(self.dock.visible_widgets())
            .collect();
        for (id, panel) in &mut self.panels {
            if visible.contains(id) {
                if let Err(err) = panel.show().await {
                    warn!(panel_id = %id, error = %err, "Resize notification failed");
                }
            } else {
                panel.hide();
            }
        }
    }

    /// Creates a panel and places it.
    ///
    /// A spec whose config has `master: true` goes to the end of the master
    /// panel and `mode` is ignored; otherwise the panel is docked per `mode`.
    #[instrument(skip(self, spec), fields(title = %spec.title, master = spec.config.master))]
    pub async fn add_widget(
        &mut self,
        spec: WidgetSpec,
        mode: InsertMode,
    ) -> WorkspaceResult<PanelId> {
        let master = spec.config.master;
        if !master
            && let Some(reference) = mode.reference()
            && !self.dock.contains(reference)
        {
            return Err(WorkspaceError::NotDocked(reference));
        }
        let id = self.create_widget(spec).await?;
        let placed = if master {
            self.insert_master(id, None)
        } else {
            self.insert_dock(id, mode)
        };
        if let Err(err) = placed {
            if let Some(mut panel) = self.panels.remove(&id)
                && let Err(close_err) = panel.close().await
            {
                warn!(panel_id = %id, error = %close_err, "Failed to close unplaced panel");
            }
            return Err(err);
        }
        self.sync_visibility().await;
        debug_assert!(self.check_invariants().is_ok());
        Ok(id)
    }

    /// Docks a panel built by [`create_widget`](Self::create_widget).
    pub async fn dock_widget(&mut self, id: PanelId, mode: InsertMode) -> WorkspaceResult<()> {
        self.panel(id)?;
        self.insert_dock(id, mode)?;
        let panel = self.panel_mut(id)?;
        panel.set_master(false);
        panel.set_click_subscription(None);
        self.sync_visibility().await;
        debug_assert!(self.check_invariants().is_ok());
        Ok(())
    }

    /// Moves a docked panel.
    pub async fn move_widget(&mut self, id: PanelId, mode: InsertMode) -> WorkspaceResult<()> {
        if !self.dock.contains(id) {
            return Err(WorkspaceError::NotDocked(id));
        }
        self.dock.move_widget(id, mode)?;
        self.sync_visibility().await;
        Ok(())
    }

    /// Brings a docked panel's tab to the front.
    pub async fn activate(&mut self, id: PanelId) -> WorkspaceResult<()> {
        if !self.dock.contains(id) {
            return Err(WorkspaceError::NotDocked(id));
        }
        self.dock.activate(id)?;
        self.sync_visibility().await;
        Ok(())
    }

    /// Sets the weights of the dock split at `path`.
    pub fn resize_dock(&mut self, path: &[usize], sizes: Vec<f64>) -> WorkspaceResult<()> {
        self.dock.set_sizes(path, sizes)?;
        Ok(())
    }

    /// Sets the weights of the master panels.
    pub fn resize_master(&mut self, sizes: Vec<f64>) -> WorkspaceResult<()> {
        self.master.set_relative_sizes(sizes)?;
        Ok(())
    }

    /// Sets the `[master, detail]` weights of the top-level split.
    pub fn set_sizes(&mut self, sizes: [f64; 2]) -> WorkspaceResult<()> {
        validate_sizes(&sizes)?;
        self.sizes = sizes;
        Ok(())
    }


    /// Moves a panel into the master panel, mounting it if it was empty.
    #[instrument(skip(self), fields(panel_id = %id))]
    pub async fn make_master(&mut self, id: PanelId) -> WorkspaceResult<()> {
        self.panel(id)?;
        if self.master.contains(id) {
            return Err(WorkspaceError::AlreadyPlaced {
                panel: id,
                container: "master panel",
            });
        }
        if self.dock.contains(id) {
            self.dock.remove_widget(id)?;
        }
        self.insert_master(id, None)?;
        self.sync_visibility().await;
        debug_assert!(self.check_invariants().is_ok());
        info!("Panel is now a master panel");
        Ok(())
    }

    /// Moves a panel into the dock, unmounting the master panel if it
    /// became empty.
    #[instrument(skip(self), fields(panel_id = %id))]
    pub async fn make_detail(&mut self, id: PanelId) -> WorkspaceResult<()> {
        self.panel(id)?;
        if self.dock.contains(id) {
            return Err(WorkspaceError::AlreadyPlaced {
                panel: id,
                container: "dock",
            });
        }
        if self.master.contains(id) {
            self.remove_from_master(id)?;
        }
        self.dock.add_widget(id, InsertMode::split_right())?;
        let panel = self.panel_mut(id)?;
        panel.set_master(false);
        panel.attach();
        panel.viewer().restyle();
        panel.set_click_subscription(None);
        self.sync_visibility().await;
        debug_assert!(self.check_invariants().is_ok());
        info!("Panel is now a detail panel");
        Ok(())
    }

    /// Makes a docked panel master, or a master panel detail.
    pub async fn toggle_master_detail(&mut self, id: PanelId) -> WorkspaceResult<()> {
        if self.dock.contains(id) {
            if self.dock.is_single_document() {
                self.toggle_single_document(id).await?;
            }
            self.make_master(id).await
        } else if self.master.contains(id) {
            self.make_detail(id).await
        } else {
            Err(WorkspaceError::UnknownPanel(id))
        }
    }

    /// Maximizes the dock around a panel, or restores the previous layout.
    #[instrument(skip(self), fields(panel_id = %id, dock_mode = %self.dock.mode()))]
    ///
    /// A maximized panel that was already on screen gets one resize
    /// notification; a hidden one gets it from being shown.
    pub async fn toggle_single_document(&mut self, id: PanelId) -> WorkspaceResult<()> {
        let was_visible = self.panel(id)?.is_visible();
        if self.dock.is_single_document() {
            self.dock.leave_single_document()?;
        } else {
            self.dock.enter_single_document(id)?;
        }
        self.sync_visibility().await;
        if self.dock.is_single_document() && was_visible {
            self.panel(id)?.notify_resize().await?;
        }
        Ok(())
    }

    /// Clones a panel: same table, same config, title `duplicate`.
    ///
    /// A master copy goes right after its source; a detail copy is docked
    /// right of it. Single-document mode is left first.
    #[instrument(skip(self), fields(panel_id = %id))]
    pub async fn duplicate(&mut self, id: PanelId) -> WorkspaceResult<PanelId> {
        self.panel(id)?;
        let master_index = self.master.index_of(id);
        if master_index.is_none() && !self.dock.contains(id) {
            return Err(WorkspaceError::NotDocked(id));
        }
        if self.dock.is_single_document() {
            self.dock.leave_single_document()?;
            self.sync_visibility().await;
        }
        let source = self.panel(id)?;
        let spec = WidgetSpec {
            title: DUPLICATE_TITLE.to_string(),
            table: source.table(),
            config: source.save(),
        };
        let copy = self.create_widget(spec).await?;
        let placed = match master_index {
            Some(index) => self.insert_master(copy, Some(index + 1)),
            None => self.insert_dock(copy, InsertMode::split_right_of(id)),
        };
        if let Err(err) = placed {
            if let Some(mut panel) = self.panels.remove(&copy)
                && let Err(close_err) = panel.close().await
            {
                warn!(panel_id = %copy, error = %close_err, "Failed to close unplaced copy");
            }
            return Err(err);
        }
        self.sync_visibility().await;
        debug_assert!(self.check_invariants().is_ok());
        Ok(copy)
    }

    /// Removes a panel from its container and closes it.
    #[instrument(skip(self), fields(panel_id = %id))]
    pub async fn close_widget(&mut self, id: PanelId) -> WorkspaceResult<()> {
        self.panel(id)?;
        if self.master.contains(id) {
            self.remove_from_master(id)?;
        } else if self.dock.contains(id) {
            self.dock.remove_widget(id)?;
        }
        if self.open_menu.as_ref().is_some_and(|menu| menu.panel == id) {
            self.open_menu = None;
        }
        let result = match self.panels.remove(&id) {
            Some(mut panel) => panel.close().await,
            None => Ok(()),
        };
        self.sync_visibility().await;
        result.map_err(Into::into)
    }

    /// Closes every panel and unmounts both regions.
    pub async fn clear_layout(&mut self) {
        let span = crate::trace_operation!(span_names::WORKSPACE_CLEAR, panels = self.panels.len());
        let panels = std::mem::take(&mut self.panels);
        async move {
            for (id, mut panel) in panels {
                if let Err(err) = panel.close().await {
                    warn!(panel_id = %id, error = %err, "Failed to close panel");
                }
            }
        }
        .instrument(span)
        .await;
        self.dock.clear();
        self.master.clear();
        self.master_mounted = false;
        self.open_menu = None;
    }


    /// Captures the workspace as a layout document.
    ///
    /// While maximized, the layout that leaving single-document mode would
    /// produce is saved.
    pub fn save(&self) -> WorkspaceResult<LayoutDocument> {
        let _span = crate::trace_operation!(span_names::WORKSPACE_SAVE, panels = self.panels.len())
            .entered();
        let widgets = self
            .master
            .widgets()
            .iter()
            .map(|id| self.panel(*id).map(Panel::save))
            .collect::<WorkspaceResult<Vec<_>>>()?;
        let main = self
            .dock
            .persistent_layout()?
            .map(|root| root.try_map_widgets(|id| self.panel(id).map(Panel::save)))
            .transpose()?;
        Ok(LayoutDocument {
            sizes: self.sizes,
            detail: DockLayout::new(main),
            master: MasterLayout {
                widgets,
                sizes: self.master.relative_sizes().to_vec(),
            },
        })
    }

    /// Replaces everything with the panels described by `doc`.
    ///
    /// Panels naming an unregistered table are created without a data
    /// source.
    #[instrument(name = "workspace.restore", skip_all, fields(panels = doc.panel_count()))]
    pub async fn restore(&mut self, doc: LayoutDocument) -> WorkspaceResult<()> {
        doc.validate()?;
        self.clear_layout().await;
        let LayoutDocument {
            sizes,
            detail,
            master,
        } = doc;
        self.sizes = sizes;
        self.master_mounted = !master.widgets.is_empty();

        for config in master.widgets {
            let spec = self.spec_for(config.with_master(true));
            let id = self.create_widget(spec).await?;
            self.insert_master(id, None)?;
        }
        if !master.sizes.is_empty() {
            self.master.set_relative_sizes(master.sizes)?;
        }

        let mut pending = Vec::new();
        let tree = detail.main.map(|root| {
            root.map_widgets(|config| {
                let id = PanelId::new();
                pending.push((id, config.with_master(false)));
                id
            })
        });
        for (id, config) in pending {
            let spec = self.spec_for(config);
            self.create_widget_with_id(id, spec).await?;
        }
        self.dock.restore_layout(tree)?;
        for id in self.dock.widgets() {
            self.panel_mut(id)?.attach();
        }

        self.sync_visibility().await;
        debug_assert!(self.check_invariants().is_ok());
        info!(
            master = self.master.len(),
            detail = self.dock.len(),
            "Workspace restored"
        );
        Ok(())
    }


    /// Menu entries for a panel.
    pub fn context_menu(&self, id: PanelId) -> WorkspaceResult<Vec<MenuEntry>> {
        let context = self.command_context(id)?;
        Ok(self.commands.build_menu(&context))
    }

    fn command_context(&self, id: PanelId) -> WorkspaceResult<CommandContext> {
        self.panel(id)?;
        Ok(CommandContext {
            in_dock: self.dock.contains(id),
            single_document: self.dock.is_single_document(),
        })
    }

    /// The menu opened by the last context-menu event.
    #[must_use]
    pub const fn open_menu(&self) -> Option<&ContextMenu> {
        self.open_menu.as_ref()
    }

    /// Takes the open menu, closing it.
    pub fn take_open_menu(&mut self) -> Option<ContextMenu> {
        self.open_menu.take()
    }

    /// Runs a command on a panel.
    #[instrument(skip(self), fields(panel_id = %id, command = %command))]
    pub async fn execute(&mut self, command: CommandId, id: PanelId) -> WorkspaceResult<()> {
        self.open_menu = None;
        match command {
            CommandId::Export => self.panel(id)?.viewer().download().await?,
            CommandId::Copy => self.panel(id)?.viewer().copy().await?,
            CommandId::Reset => self.panel(id)?.viewer().reset().await?,
            CommandId::Duplicate => {
                self.duplicate(id).await?;
            }
            CommandId::ToggleMasterDetail => self.toggle_master_detail(id).await?,
            CommandId::ToggleSingleDocument => self.toggle_single_document(id).await?,
        }
        Ok(())
    }

    /// Dispatches every queued viewer event.
    ///
    /// Returns the filter propagations started by master selections; they
    /// run in the background whether or not the batches are awaited.
    pub fn process_events(&mut self) -> Vec<PropagationBatch> {
        let mut batches = Vec::new();
        while let Ok(event) = self.events_rx.try_recv() {
            if let Some(batch) = self.handle_event(event) {
                batches.push(batch);
            }
        }
        batches
    }

    fn handle_event(
        &mut self,
        WorkspaceEvent { panel, event }: WorkspaceEvent,
    ) -> Option<PropagationBatch> {
        if !self.panels.contains_key(&panel) {
            debug!(panel_id = %panel, "Dropping event from closed panel");
            return None;
        }
        match event {
            ViewerEvent::ContextMenu { x, y } => {
                let entries = self.context_menu(panel).ok()?;
                self.open_menu = Some(ContextMenu {
                    panel,
                    x,
                    y,
                    entries,
                });
                None
            }
            ViewerEvent::SettingsToggled { open } => {
                if let Some(target) = self.panels.get_mut(&panel) {
                    target.set_settings_open(open);
                }
                None
            }
            ViewerEvent::Selection { config } => {
                if self.master.contains(panel) {
                    Some(self.propagate_filters(panel, &config))
                } else {
                    debug!(panel_id = %panel, "Ignoring selection from detail panel");
                    None
                }
            }
        }
    }

    /// Sends a master panel's selection to every docked panel.
    pub fn propagate_filters(&self, source: PanelId, selection: &ViewerConfig) -> PropagationBatch {
        let _span =
            crate::trace_operation!(span_names::FILTER_PROPAGATE, panel_id = %source).entered();
        let Some(source) = self.panels.get(&source) else {
            return PropagationBatch::default();
        };
        let candidates = candidate_columns(&source.viewer().save());
        let incoming = selection.filters().to_vec();
        let targets = self
            .dock
            .widgets()
            .into_iter()
            .filter_map(|id| self.panels.get(&id))
            .map(|panel| FilterTarget {
                panel: panel.id(),
                viewer: Arc::clone(panel.viewer()),
                table: panel.table(),
                generation: panel.generation_handle(),
                expected: panel.generation(),
                current_filters: panel.viewer().save().filters().to_vec(),
            })
            .collect();
        propagation::propagate(candidates, incoming, targets)
    }
}

impl fmt::Debug for Workspace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Workspace")
            .field("options", &self.options)
            .field("tables", &self.tables)
            .field("dock", &self.dock)
            .field("master", &self.master)
            .field("master_mounted", &self.master_mounted)
            .field("sizes", &self.sizes)
            .finish_non_exhaustive()
    }
}
