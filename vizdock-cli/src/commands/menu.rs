//! List the panel context-menu commands.

use vizdock_core::{CommandContext, CommandId, CommandRegistry};

use crate::cli::OutputFormat;
use crate::error::CliError;

const DOCK: CommandContext = CommandContext {
    in_dock: true,
    single_document: false,
};

const MASTER: CommandContext = CommandContext {
    in_dock: false,
    single_document: false,
};

/// Commands command handler
pub fn cmd_commands(format: OutputFormat) -> Result<(), CliError> {
    let registry = CommandRegistry::new();
    match format {
        OutputFormat::Table => print!("{}", render_table(&registry)),
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&commands_json(&registry))
                .map_err(|e| CliError::Runtime(format!("Failed to serialize commands: {e}")))?;
            println!("{json}");
        }
    }
    Ok(())
}

fn label(registry: &CommandRegistry, id: CommandId, context: &CommandContext) -> String {
    if registry.is_visible(id, context) {
        registry.label(id, context).unwrap_or_default().to_string()
    } else {
        "(hidden)".to_string()
    }
}

fn render_table(registry: &CommandRegistry) -> String {
    let mut out = format!("{:<34} {:<12} {:<12}\n", "ID", "DOCK", "MASTER");
    for id in CommandId::ALL {
        out.push_str(&format!(
            "{:<34} {:<12} {:<12}\n",
            id.as_str(),
            label(registry, id, &DOCK),
            label(registry, id, &MASTER)
        ));
    }
    out
}

fn commands_json(registry: &CommandRegistry) -> serde_json::Value {
    CommandId::ALL
        .into_iter()
        .map(|id| {
            serde_json::json!({
                "id": id.as_str(),
                "dock": {
                    "label": registry.label(id, &DOCK),
                    "icon": registry.icon(id, &DOCK),
                    "visible": registry.is_visible(id, &DOCK),
                },
                "master": {
                    "label": registry.label(id, &MASTER),
                    "icon": registry.icon(id, &MASTER),
                    "visible": registry.is_visible(id, &MASTER),
                },
            })
        })
        .collect()
}
