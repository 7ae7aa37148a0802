//! Headless restore/save round trip of a layout document.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info};
use vizdock_core::config::WorkspaceSettings;
use vizdock_core::testing::{MemoryHost, MemoryTable};
use vizdock_core::{LayoutDocument, VizDockError, Workspace, WorkspaceError};

use crate::error::CliError;
use crate::util::{load_settings, read_layout};

/// What a successful validation restored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationReport {
    /// Panels in the master panel.
    pub master: usize,
    /// Panels in the dock.
    pub detail: usize,
    /// Distinct tables referenced.
    pub tables: usize,
}

/// Validate command handler
pub fn cmd_validate(config_path: Option<&Path>, file: &Path) -> Result<(), CliError> {
    let settings = load_settings(config_path)?;
    let doc = read_layout(file)?;

    let runtime = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::Runtime(format!("Failed to create async runtime: {e}")))?;
    let report = runtime.block_on(validate_layout(&settings, doc))?;

    println!(
        "{}: OK ({} master, {} detail, {} tables)",
        file.display(),
        report.master,
        report.detail,
        report.tables
    );
    Ok(())
}

/// Restores `doc` into a workspace backed by in-memory viewers, one empty
/// table per referenced name, and checks that saving yields the same
/// document.
pub async fn validate_layout(
    settings: &WorkspaceSettings,
    doc: LayoutDocument,
) -> Result<ValidationReport, VizDockError> {
    let mut workspace = Workspace::with_settings(Arc::new(MemoryHost::new()), settings);
    let tables = doc.table_names();
    for name in &tables {
        let table = MemoryTable::new(name.clone(), Vec::<(String, String)>::new());
        workspace.add_table(name.clone(), Arc::new(table));
    }

    let expected = normalized(doc.clone());
    workspace.restore(doc).await?;
    workspace.check_invariants()?;
    debug!(panels = workspace.len(), "Layout restored");

    let saved = workspace.save()?;
    if saved != expected {
        return Err(WorkspaceError::InvariantViolation(
            "saving the restored layout produced a different document".to_string(),
        )
        .into());
    }
    info!("Round trip verified");

    Ok(ValidationReport {
        master: workspace.master().len(),
        detail: workspace.dock().len(),
        tables: tables.len(),
    })
}

/// The document as a restore leaves it: master configs flagged `master`,
/// dock configs not, and missing master weights filled with equal ones.
fn normalized(doc: LayoutDocument) -> LayoutDocument {
    let LayoutDocument {
        sizes,
        detail,
        mut master,
    } = doc;
    master.widgets = master
        .widgets
        .into_iter()
        .map(|config| config.with_master(true))
        .collect();
    if master.sizes.is_empty() {
        master.sizes = vec![1.0; master.widgets.len()];
    }
    LayoutDocument {
        sizes,
        detail: detail.map_widgets(|config| config.with_master(false)),
        master,
    }
}
