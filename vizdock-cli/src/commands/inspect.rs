//! Print a layout document as a tree.

use std::path::Path;

use vizdock_core::{DEFAULT_TITLE, DockNode, LayoutDocument, PanelConfig};

use crate::cli::OutputFormat;
use crate::error::CliError;
use crate::util::read_layout;

/// Inspect command handler
pub fn cmd_inspect(file: &Path, format: OutputFormat) -> Result<(), CliError> {
    let doc = read_layout(file)?;
    match format {
        OutputFormat::Table => print!("{}", render_layout(&doc)),
        OutputFormat::Json => println!("{}", doc.to_json_pretty()?),
    }
    Ok(())
}

/// Renders the master panel list and the dock tree, one node per line.
pub fn render_layout(doc: &LayoutDocument) -> String {
    let mut lines = vec![format!(
        "Layout: {} panels ({} master, {} detail)",
        doc.panel_count(),
        doc.master.widgets.len(),
        doc.detail.widget_count()
    )];
    lines.push(format!(
        "Sizes: master {}, detail {}",
        doc.sizes[0], doc.sizes[1]
    ));

    if doc.master.widgets.is_empty() {
        lines.push("Master panel: (not mounted)".to_string());
    } else {
        lines.push("Master panel:".to_string());
        for (index, config) in doc.master.widgets.iter().enumerate() {
            let weight = doc
                .master
                .sizes
                .get(index)
                .map(|size| format!(" [{size}]"))
                .unwrap_or_default();
            lines.push(format!("  {}{weight}", describe(config)));
        }
    }

    match &doc.detail.main {
        Some(root) => {
            lines.push("Dock:".to_string());
            render_node(root, None, 1, &mut lines);
        }
        None => lines.push("Dock: (empty)".to_string()),
    }

    let tables = doc.table_names();
    if !tables.is_empty() {
        lines.push(format!(
            "Tables: {}",
            tables.into_iter().collect::<Vec<_>>().join(", ")
        ));
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

fn render_node(
    node: &DockNode<PanelConfig>,
    weight: Option<f64>,
    depth: usize,
    lines: &mut Vec<String>,
) {
    let indent = "  ".repeat(depth);
    let weight = weight.map(|w| format!(" [{w}]")).unwrap_or_default();
    match node {
        DockNode::Split {
            orientation,
            children,
            sizes,
        } => {
            lines.push(format!("{indent}split {orientation}{weight}"));
            for (child, size) in children.iter().zip(sizes) {
                render_node(child, Some(*size), depth + 1, lines);
            }
        }
        DockNode::TabGroup { widgets, current } => {
            lines.push(format!("{indent}tabs{weight}"));
            for (index, widget) in widgets.iter().enumerate() {
                let marker = if index == *current { '*' } else { '-' };
                lines.push(format!("{indent}  {marker} {}", describe(widget)));
            }
        }
        DockNode::Leaf { widget } => {
            lines.push(format!("{indent}{}{weight}", describe(widget)));
        }
    }
}

fn describe(config: &PanelConfig) -> String {
    format!(
        "{} (table: {})",
        config.viewer.name.as_deref().unwrap_or(DEFAULT_TITLE),
        config.viewer.table.as_deref().unwrap_or("-")
    )
}
