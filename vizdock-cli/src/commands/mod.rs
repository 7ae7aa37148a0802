//! Command handler modules for the CLI.

mod completions;
mod inspect;
mod menu;
mod validate;

use std::path::Path;

use crate::cli::Commands;
use crate::error::CliError;

/// Dispatch a CLI command to the appropriate handler.
pub fn dispatch(config_path: Option<&Path>, command: Commands) -> Result<(), CliError> {
    match command {
        Commands::Inspect { file, format } => inspect::cmd_inspect(&file, format),
        Commands::Validate { file } => validate::cmd_validate(config_path, &file),
        Commands::Commands { format } => menu::cmd_commands(format),
        Commands::Completions { shell } => completions::cmd_completions(shell),
    }
}
