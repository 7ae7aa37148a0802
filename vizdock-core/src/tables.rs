//! Named data sources shared by the workspace's panels

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::viewer::DataSource;

/// Maps table names to data sources.
///
/// Registration is last-write-wins: re-adding a name replaces the source for
/// future lookups, while panels that already hold the old source keep it.
#[derive(Default, Clone)]
pub struct TableRegistry {
    tables: HashMap<String, Arc<dyn DataSource>>,
}

impl TableRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `source` under `name`, returning the source it replaced.
    pub fn add_table(
        &mut self,
        name: impl Into<String>,
        source: Arc<dyn DataSource>,
    ) -> Option<Arc<dyn DataSource>> {
        let name = name.into();
        debug!(table = %name, "Registering table");
        self.tables.insert(name, source)
    }

    /// Looks up a table by name.
    #[must_use]
    pub fn get_table(&self, name: &str) -> Option<Arc<dyn DataSource>> {
        self.tables.get(name).cloned()
    }

    /// Unregisters a table.
    pub fn remove_table(&mut self, name: &str) -> Option<Arc<dyn DataSource>> {
        self.tables.remove(name)
    }

    /// Whether a table is registered under `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.tables.contains_key(name)
    }

    /// Registered names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tables.keys().cloned().collect();
        names.sort();
        names
    }

    /// Number of registered tables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// Whether no table is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

impl fmt::Debug for TableRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableRegistry")
            .field("tables", &self.names())
            .finish()
    }
}
