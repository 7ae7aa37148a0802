//! Shared fixtures

use std::sync::Arc;

use vizdock_core::testing::{MemoryHost, MemoryTable};
use vizdock_core::{PanelConfig, WidgetSpec, Workspace, WorkspaceOptions};

/// A workspace with `sales` (region, year, amount) and `stock` (sku, year)
/// registered.
pub fn workspace() -> (Workspace, Arc<MemoryHost>) {
    let host = Arc::new(MemoryHost::new());
    let mut workspace = Workspace::new(host.clone(), WorkspaceOptions::default());
    workspace.add_table(
        "sales",
        Arc::new(MemoryTable::new(
            "sales",
            [("region", "string"), ("year", "integer"), ("amount", "float")],
        )),
    );
    workspace.add_table(
        "stock",
        Arc::new(MemoryTable::new("stock", [("sku", "string"), ("year", "integer")])),
    );
    (workspace, host)
}

/// A spec bound to a registered table.
pub fn spec(workspace: &Workspace, table: &str, config: PanelConfig) -> WidgetSpec {
    let mut spec = WidgetSpec::new(table, config);
    spec.table = workspace.get_table(table);
    spec
}
