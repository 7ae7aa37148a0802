//! In-memory collaborators for headless workspaces.
//!
//! [`MemoryTable`], [`MemoryViewer`] and [`MemoryHost`] implement the
//! [`crate::viewer`] traits without any rendering. They back the test suites
//! and the CLI's offline layout validation.

use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;

use crate::error::ViewerError;
use crate::layout::ViewerConfig;
use crate::types::{ListenerId, PanelId};
use crate::viewer::{
    DataSource, Listener, Schema, Viewer, ViewerEvent, ViewerEventKind, ViewerFactory,
};

/// A table with a fixed schema.
#[derive(Debug, Clone)]
pub struct MemoryTable {
    name: String,
    schema: Schema,
    delay: Option<Duration>,
    fail: bool,
}

impl MemoryTable {
    /// Creates a table with the given `(column, type)` pairs.
    pub fn new<I, K, V>(name: impl Into<String>, columns: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            name: name.into(),
            schema: columns
                .into_iter()
                .map(|(column, kind)| (column.into(), kind.into()))
                .collect(),
            delay: None,
            fail: false,
        }
    }

    /// Delays every schema read by `delay`.
    #[must_use]
    pub const fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Makes every schema read fail.
    #[must_use]
    pub const fn failing(mut self) -> Self {
        self.fail = true;
        self
    }
}

#[async_trait]
impl DataSource for MemoryTable {
    fn name(&self) -> &str {
        &self.name
    }

    async fn schema(&self) -> Result<Schema, ViewerError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail {
            return Err(ViewerError::Schema(format!("table {} is unavailable", self.name)));
        }
        Ok(self.schema.clone())
    }
}

#[derive(Default)]
struct ViewerState {
    config: ViewerConfig,
    table: Option<Arc<dyn DataSource>>,
    classes: BTreeSet<String>,
    selectable: bool,
    config_open: bool,
    deleted: bool,
    detached: bool,
    listeners: Vec<(ListenerId, ViewerEventKind, Listener)>,
    next_listener: u64,
    restores: Vec<ViewerConfig>,
    resize_count: usize,
    restyle_count: usize,
    download_count: usize,
    copy_count: usize,
    lifecycle: Vec<&'static str>,
}

/// A viewer that stores its config and records every call.
#[derive(Default)]
pub struct MemoryViewer {
    state: Mutex<ViewerState>,
}

impl MemoryViewer {
    /// Creates a blank viewer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, ViewerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Delivers `event` to every listener registered for its kind.
    pub fn emit(&self, event: &ViewerEvent) {
        let kind = event.kind();
        let listeners: Vec<Listener> = self
            .state()
            .listeners
            .iter()
            .filter(|(_, listener_kind, _)| *listener_kind == kind)
            .map(|(_, _, listener)| Arc::clone(listener))
            .collect();
        for listener in listeners {
            listener(event);
        }
    }

    /// Current config.
    #[must_use]
    pub fn config(&self) -> ViewerConfig {
        self.state().config.clone()
    }

    /// Every config passed to `restore`, oldest first.
    #[must_use]
    pub fn restores(&self) -> Vec<ViewerConfig> {
        self.state().restores.clone()
    }

    /// Name of the bound data source.
    #[must_use]
    pub fn table_name(&self) -> Option<String> {
        self.state()
            .table
            .as_ref()
            .map(|table| table.name().to_string())
    }

    /// Number of listeners registered for `kind`.
    #[must_use]
    pub fn listener_count(&self, kind: ViewerEventKind) -> usize {
        self.state()
            .listeners
            .iter()
            .filter(|(_, listener_kind, _)| *listener_kind == kind)
            .count()
    }

    /// Number of listeners of any kind.
    #[must_use]
    pub fn total_listeners(&self) -> usize {
        self.state().listeners.len()
    }

    /// Style classes currently set.
    #[must_use]
    pub fn classes(&self) -> Vec<String> {
        self.state().classes.iter().cloned().collect()
    }

    /// Times `notify_resize` was called.
    #[must_use]
    pub fn resize_count(&self) -> usize {
        self.state().resize_count
    }

    /// Times `restyle` was called.
    #[must_use]
    pub fn restyle_count(&self) -> usize {
        self.state().restyle_count
    }

    /// Times `download` was called.
    #[must_use]
    pub fn download_count(&self) -> usize {
        self.state().download_count
    }

    /// Times `copy` was called.
    #[must_use]
    pub fn copy_count(&self) -> usize {
        self.state().copy_count
    }

    /// Whether the settings pane is open.
    #[must_use]
    pub fn is_config_open(&self) -> bool {
        self.state().config_open
    }

    /// Whether `delete` was called.
    #[must_use]
    pub fn is_deleted(&self) -> bool {
        self.state().deleted
    }

    /// Whether `detach` was called.
    #[must_use]
    pub fn is_detached(&self) -> bool {
        self.state().detached
    }

    /// Ordered record of `unsubscribe`, `delete` and `detach` calls.
    #[must_use]
    pub fn lifecycle(&self) -> Vec<&'static str> {
        self.state().lifecycle.clone()
    }
}

#[async_trait]
impl Viewer for MemoryViewer {
    fn save(&self) -> ViewerConfig {
        self.config()
    }

    async fn restore(&self, config: ViewerConfig) -> Result<(), ViewerError> {
        let mut state = self.state();
        if state.deleted {
            return Err(ViewerError::Deleted);
        }
        state.restores.push(config.clone());
        state.config.merge(config);
        Ok(())
    }

    fn load(&self, table: Arc<dyn DataSource>) {
        self.state().table = Some(table);
    }

    fn table(&self) -> Option<Arc<dyn DataSource>> {
        self.state().table.clone()
    }

    async fn notify_resize(&self) -> Result<(), ViewerError> {
        let mut state = self.state();
        if state.deleted {
            return Err(ViewerError::Deleted);
        }
        state.resize_count += 1;
        Ok(())
    }

    async fn delete(&self) -> Result<(), ViewerError> {
        let mut state = self.state();
        if state.deleted {
            return Err(ViewerError::Deleted);
        }
        state.deleted = true;
        state.lifecycle.push("delete");
        Ok(())
    }

    fn detach(&self) {
        let mut state = self.state();
        state.detached = true;
        state.lifecycle.push("detach");
    }

    fn set_selectable(&self, selectable: bool) {
        self.state().selectable = selectable;
    }

    fn is_selectable(&self) -> bool {
        self.state().selectable
    }

    fn add_class(&self, class: &str) {
        self.state().classes.insert(class.to_string());
    }

    fn remove_class(&self, class: &str) {
        self.state().classes.remove(class);
    }

    fn has_class(&self, class: &str) -> bool {
        self.state().classes.contains(class)
    }

    fn restyle(&self) {
        self.state().restyle_count += 1;
    }

    async fn download(&self) -> Result<(), ViewerError> {
        let mut state = self.state();
        if state.deleted {
            return Err(ViewerError::Deleted);
        }
        state.download_count += 1;
        Ok(())
    }

    async fn copy(&self) -> Result<(), ViewerError> {
        let mut state = self.state();
        if state.deleted {
            return Err(ViewerError::Deleted);
        }
        state.copy_count += 1;
        Ok(())
    }

    async fn reset(&self) -> Result<(), ViewerError> {
        let mut state = self.state();
        if state.deleted {
            return Err(ViewerError::Deleted);
        }
        state.config.row_pivots = None;
        state.config.column_pivots = None;
        state.config.filters = None;
        Ok(())
    }

    fn toggle_config(&self) {
        let open = {
            let mut state = self.state();
            state.config_open = !state.config_open;
            state.config_open
        };
        self.emit(&ViewerEvent::SettingsToggled { open });
    }

    fn subscribe(&self, kind: ViewerEventKind, listener: Listener) -> ListenerId {
        let mut state = self.state();
        state.next_listener += 1;
        let id = ListenerId(state.next_listener);
        state.listeners.push((id, kind, listener));
        id
    }

    fn unsubscribe(&self, id: ListenerId) -> bool {
        let mut state = self.state();
        let before = state.listeners.len();
        state.listeners.retain(|(listener_id, _, _)| *listener_id != id);
        let removed = state.listeners.len() != before;
        if removed {
            state.lifecycle.push("unsubscribe");
        }
        removed
    }
}

/// Creates [`MemoryViewer`]s and remembers them by slot name.
#[derive(Default)]
pub struct MemoryHost {
    viewers: Mutex<HashMap<String, Arc<MemoryViewer>>>,
}

impl MemoryHost {
    /// Creates an empty host.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn viewers(&self) -> MutexGuard<'_, HashMap<String, Arc<MemoryViewer>>> {
        self.viewers.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// The viewer mounted for `panel`.
    #[must_use]
    pub fn viewer(&self, panel: &PanelId) -> Option<Arc<MemoryViewer>> {
        self.viewers().get(&panel.slot_name()).cloned()
    }

    /// Number of viewers ever created.
    #[must_use]
    pub fn created(&self) -> usize {
        self.viewers().len()
    }
}

impl ViewerFactory for MemoryHost {
    fn create_viewer(&self, slot: &str) -> Arc<dyn Viewer> {
        let viewer = Arc::new(MemoryViewer::new());
        self.viewers().insert(slot.to_string(), Arc::clone(&viewer));
        viewer
    }
}
