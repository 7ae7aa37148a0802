//! `VizDock` CLI - inspect and validate workspace layout documents
//!
//! Provides commands for printing a layout's panel tree, checking that a
//! layout restores and saves back unchanged, and listing the panel
//! context-menu commands.

mod cli;
mod commands;
mod error;
mod util;

use clap::Parser;
use cli::Cli;

fn main() {
    let cli = Cli::parse();
    let config_path = cli.config.as_deref();

    if let Err(e) = util::init_logging(config_path, cli.verbose, cli.quiet)
        && !cli.quiet
    {
        eprintln!("Warning: {e}");
    }

    let result = commands::dispatch(config_path, cli.command);

    if let Err(e) = result {
        if !cli.quiet {
            eprintln!("Error: {e}");
        }
        std::process::exit(e.exit_code());
    }
}
